//! Endpoint-declared capability checks, evaluated after the interceptor.
//!
//! The decision is a plain value: `Granted` runs the handler, the two failure
//! arms terminate the request through the envelope responders in `error.rs`.

use std::collections::HashSet;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::{AuthenticationOutcome, RejectReason, SecurityContext};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// Caller needs at least one of the named authorities.
    Any,
    /// Caller needs every named authority.
    All,
}

/// Capability set a route declares.
#[derive(Debug, Clone)]
pub struct RequiredAuthorities {
    names: Vec<String>,
    mode: Match,
}

impl RequiredAuthorities {
    pub fn any(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|s| s.to_string()).collect(),
            mode: Match::Any,
        }
    }

    pub fn all(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|s| s.to_string()).collect(),
            mode: Match::All,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn satisfied_by(&self, authorities: &HashSet<String>) -> bool {
        match self.mode {
            Match::Any => self.names.iter().any(|n| authorities.contains(n)),
            Match::All => self.names.iter().all(|n| authorities.contains(n)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    Unauthenticated(RejectReason),
    Forbidden,
}

/// Pure decision function. A missing or empty context is `Unauthenticated`;
/// a rejected credential carries its deferred reason into the 401.
pub fn evaluate(ctx: Option<&SecurityContext>, required: &RequiredAuthorities) -> AccessDecision {
    let Some(ctx) = ctx else {
        return AccessDecision::Unauthenticated(RejectReason::MissingCredentials);
    };

    match ctx.outcome() {
        AuthenticationOutcome::Anonymous => {
            AccessDecision::Unauthenticated(RejectReason::MissingCredentials)
        }
        AuthenticationOutcome::Rejected(reason) => AccessDecision::Unauthenticated(*reason),
        AuthenticationOutcome::Authenticated(principal) => {
            if required.satisfied_by(&principal.authorities) {
                AccessDecision::Granted
            } else {
                AccessDecision::Forbidden
            }
        }
    }
}

/// Gate `router` behind "at least one of `names`".
pub fn require_any(router: Router<AppState>, names: &[&str]) -> Router<AppState> {
    attach(router, RequiredAuthorities::any(names))
}

/// Gate `router` behind "every one of `names`".
pub fn require_all(router: Router<AppState>, names: &[&str]) -> Router<AppState> {
    attach(router, RequiredAuthorities::all(names))
}

fn attach(router: Router<AppState>, required: RequiredAuthorities) -> Router<AppState> {
    router.route_layer(middleware::from_fn(
        move |req: Request<Body>, next: Next| {
            let required = required.clone();
            async move { gate(required, req, next).await }
        },
    ))
}

async fn gate(
    required: RequiredAuthorities,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    match evaluate(req.extensions().get::<SecurityContext>(), &required) {
        AccessDecision::Granted => Ok(next.run(req).await),
        AccessDecision::Unauthenticated(reason) => Err(AppError::unauthorized(reason.to_string())),
        AccessDecision::Forbidden => Err(AppError::forbidden(required.names().to_vec())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::identity::Principal;

    fn ctx(outcome: AuthenticationOutcome) -> SecurityContext {
        SecurityContext::new(outcome, None)
    }

    fn user(authorities: &[&str]) -> Principal {
        Principal::new("macro", "hash", authorities.iter().copied())
    }

    #[test]
    fn missing_context_is_unauthenticated() {
        let required = RequiredAuthorities::any(&["ROLE_ADMIN"]);
        assert_eq!(
            evaluate(None, &required),
            AccessDecision::Unauthenticated(RejectReason::MissingCredentials)
        );
    }

    #[test]
    fn anonymous_context_is_unauthenticated() {
        let required = RequiredAuthorities::any(&["ROLE_ADMIN"]);
        let ctx = ctx(AuthenticationOutcome::Anonymous);
        assert_eq!(
            evaluate(Some(&ctx), &required),
            AccessDecision::Unauthenticated(RejectReason::MissingCredentials)
        );
    }

    #[test]
    fn rejected_context_keeps_its_reason() {
        let required = RequiredAuthorities::any(&["ROLE_ADMIN"]);
        let ctx = ctx(AuthenticationOutcome::Rejected(RejectReason::TokenExpired));
        assert_eq!(
            evaluate(Some(&ctx), &required),
            AccessDecision::Unauthenticated(RejectReason::TokenExpired)
        );
    }

    #[test]
    fn wrong_authority_is_forbidden() {
        let required = RequiredAuthorities::any(&["ROLE_ADMIN"]);
        let ctx = ctx(AuthenticationOutcome::Authenticated(user(&["ROLE_USER"])));
        assert_eq!(evaluate(Some(&ctx), &required), AccessDecision::Forbidden);
    }

    #[test]
    fn any_of_needs_only_one_match() {
        let required = RequiredAuthorities::any(&["ROLE_ADMIN", "ROLE_USER"]);
        let ctx = ctx(AuthenticationOutcome::Authenticated(user(&["ROLE_USER"])));
        assert_eq!(evaluate(Some(&ctx), &required), AccessDecision::Granted);
    }

    #[test]
    fn all_of_needs_every_match() {
        let required = RequiredAuthorities::all(&["ROLE_ADMIN", "ROLE_AUDIT"]);

        let partial = ctx(AuthenticationOutcome::Authenticated(user(&["ROLE_ADMIN"])));
        assert_eq!(evaluate(Some(&partial), &required), AccessDecision::Forbidden);

        let full = ctx(AuthenticationOutcome::Authenticated(user(&[
            "ROLE_ADMIN",
            "ROLE_AUDIT",
        ])));
        assert_eq!(evaluate(Some(&full), &required), AccessDecision::Granted);
    }
}
