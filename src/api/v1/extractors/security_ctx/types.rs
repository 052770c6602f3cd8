/*
 * Responsibility
 * - Handler から見える「リクエスト単位のセキュリティ状態」の型
 * - middleware が 1 回だけ書き込み、handler/gate は読むだけ
 *
 * Notes
 * - プロセス全体の singleton holder は置かない。コンテキストは request
 *   extensions に載せて明示的に引き回す (並行リクエストが互いの Principal を
 *   見ることはない)
 * - 検証系の失敗は例外でなく Rejected(reason) として値で残し、gate が後で
 *   401 に変換する (deferred failure)
 */
use std::fmt;

use crate::services::identity::Principal;
use crate::services::token::VerifyError;

/// Why verification or resolution left the request without an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingCredentials,
    TokenMalformed,
    TokenExpired,
    SignatureInvalid,
    PrincipalNotFound,
    ResolverFault,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            RejectReason::MissingCredentials => "missing credentials",
            RejectReason::TokenMalformed => "token is malformed",
            RejectReason::TokenExpired => "token has expired",
            RejectReason::SignatureInvalid => "token signature is invalid",
            RejectReason::PrincipalNotFound => "unknown principal",
            RejectReason::ResolverFault => "identity store unavailable",
        };
        f.write_str(msg)
    }
}

impl From<VerifyError> for RejectReason {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::Malformed => RejectReason::TokenMalformed,
            VerifyError::SignatureInvalid => RejectReason::SignatureInvalid,
            VerifyError::Expired => RejectReason::TokenExpired,
        }
    }
}

/// Result of the authentication stage, carried as a value instead of an
/// exception.
#[derive(Debug, Clone)]
pub enum AuthenticationOutcome {
    /// No credential presented (or wrong prefix) — not a failure yet.
    Anonymous,
    Authenticated(Principal),
    /// Credential presented but unusable; the reason is kept for the 401 body.
    Rejected(RejectReason),
}

/// Request-scoped security state. Created by the interceptor, read by the
/// gate and handlers, discarded with the request. Never persisted.
#[derive(Debug, Clone)]
pub struct SecurityContext {
    outcome: AuthenticationOutcome,
    request_id: Option<String>,
}

impl SecurityContext {
    pub fn new(outcome: AuthenticationOutcome, request_id: Option<String>) -> Self {
        Self {
            outcome,
            request_id,
        }
    }

    pub fn outcome(&self) -> &AuthenticationOutcome {
        &self.outcome
    }

    pub fn principal(&self) -> Option<&Principal> {
        match &self.outcome {
            AuthenticationOutcome::Authenticated(p) => Some(p),
            _ => None,
        }
    }

    /// The reason the context stayed empty, if verification got that far.
    pub fn reject_reason(&self) -> Option<RejectReason> {
        match &self.outcome {
            AuthenticationOutcome::Rejected(r) => Some(*r),
            _ => None,
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}
