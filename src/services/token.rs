//! Stateless signer/verifier for compact signed tokens (JWS, HS512).
//!
//! Pure function of (secret, ttl, claims): no shared mutable state, safe under
//! unlimited concurrent calls. The expiry comparison is done here with zero
//! leeway (`exp <= now` is expired); `jsonwebtoken`'s built-in check uses a
//! different boundary and a default leeway, so it is disabled.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::error::AppError;

pub type CustomClaims = serde_json::Map<String, serde_json::Value>;

/// Token payload. `iat`/`exp` are always set by the codec, never
/// client-supplied; `exp > iat` holds for every issued token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub custom: CustomClaims,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    SignatureInvalid,
    #[error("token has expired")]
    Expired,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        // exp is checked by verify_at with an exact, zero-leeway comparison.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Issue a token for `subject` with `iat = now`, `exp = now + ttl`.
    pub fn issue(&self, subject: &str, custom: CustomClaims) -> Result<String, AppError> {
        self.issue_at(subject, custom, Utc::now().timestamp())
    }

    pub fn issue_at(
        &self,
        subject: &str,
        custom: CustomClaims,
        now: i64,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + self.ttl_seconds as i64,
            custom,
        };

        let header = Header::new(Algorithm::HS512);
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            // Unreachable for HMAC unless claims fail to serialize.
            error!(error = %e, "failed to sign token");
            AppError::Internal
        })
    }

    /// Decode and verify. All three failure modes are explicit values; nothing
    /// escapes as a panic.
    pub fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, VerifyError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => VerifyError::SignatureInvalid,
                _ => VerifyError::Malformed,
            })?;

        if data.claims.exp <= now {
            return Err(VerifyError::Expired);
        }

        Ok(data.claims)
    }

    /// Re-issue for the same subject with fresh timestamps. Expired or invalid
    /// input is never refreshable and yields `Ok(None)`.
    pub fn refresh(&self, token: &str) -> Result<Option<String>, AppError> {
        self.refresh_at(token, Utc::now().timestamp())
    }

    pub fn refresh_at(&self, token: &str, now: i64) -> Result<Option<String>, AppError> {
        match self.verify_at(token, now) {
            Ok(claims) => self.issue_at(&claims.sub, claims.custom, now).map(Some),
            Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    const SECRET: &str = "s3cr3t";
    const NOW: i64 = 1_700_000_000;

    fn codec(ttl: u64) -> TokenCodec {
        TokenCodec::new(SECRET, ttl)
    }

    #[test]
    fn round_trip_returns_subject() {
        let codec = codec(60);
        assert_eq!(codec.ttl_seconds(), 60);
        let token = codec.issue_at("admin", CustomClaims::new(), NOW).unwrap();

        let claims = codec.verify_at(&token, NOW).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.iat, NOW);
        assert_eq!(claims.exp, NOW + 60);
    }

    #[test]
    fn custom_claims_survive_the_round_trip() {
        let codec = codec(60);
        let mut custom = CustomClaims::new();
        custom.insert("tenant".to_string(), serde_json::json!("acme"));

        let token = codec.issue_at("admin", custom, NOW).unwrap();
        let claims = codec.verify_at(&token, NOW).unwrap();
        assert_eq!(claims.custom["tenant"], "acme");
    }

    #[test]
    fn ttl_zero_expires_immediately() {
        let codec = codec(0);
        let token = codec.issue_at("admin", CustomClaims::new(), NOW).unwrap();

        assert_eq!(codec.verify_at(&token, NOW), Err(VerifyError::Expired));
    }

    #[test]
    fn expires_once_the_clock_passes_exp() {
        let codec = codec(60);
        let token = codec.issue_at("admin", CustomClaims::new(), NOW).unwrap();

        assert!(codec.verify_at(&token, NOW + 59).is_ok());
        // exp <= now is expired, boundary included
        assert_eq!(codec.verify_at(&token, NOW + 60), Err(VerifyError::Expired));
        assert_eq!(codec.verify_at(&token, NOW + 61), Err(VerifyError::Expired));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let codec = codec(60);
        let token = codec.issue_at("macro", CustomClaims::new(), NOW).unwrap();

        // Swap the subject inside the payload segment, keep the signature.
        let mut parts: Vec<&str> = token.split('.').collect();
        let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        let mut claims: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        claims["sub"] = serde_json::json!("admin");
        let forged = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        parts[1] = &forged;
        let forged_token = parts.join(".");

        assert_eq!(
            codec.verify_at(&forged_token, NOW),
            Err(VerifyError::SignatureInvalid)
        );
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let codec = codec(60);
        let token = codec.issue_at("admin", CustomClaims::new(), NOW).unwrap();

        // Flip one character in the middle of the signature segment.
        let sig_start = token.rfind('.').unwrap() + 1;
        let mut chars: Vec<char> = token.chars().collect();
        let i = sig_start + 10;
        chars[i] = if chars[i] == 'A' { 'B' } else { 'A' };
        let forged: String = chars.into_iter().collect();

        assert_eq!(
            codec.verify_at(&forged, NOW),
            Err(VerifyError::SignatureInvalid)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = codec(60);
        assert_eq!(
            codec.verify_at("not-a-token", NOW),
            Err(VerifyError::Malformed)
        );
        assert_eq!(
            codec.verify_at("only.twoparts", NOW),
            Err(VerifyError::Malformed)
        );
        assert_eq!(codec.verify_at("", NOW), Err(VerifyError::Malformed));
    }

    #[test]
    fn wrong_secret_is_signature_invalid() {
        let issue_codec = codec(60);
        let verify_codec = TokenCodec::new("other-secret", 60);

        let token = issue_codec
            .issue_at("admin", CustomClaims::new(), NOW)
            .unwrap();
        assert_eq!(
            verify_codec.verify_at(&token, NOW),
            Err(VerifyError::SignatureInvalid)
        );
    }

    #[test]
    fn refresh_extends_expiry_for_the_same_subject() {
        let codec = codec(60);
        let token = codec.issue_at("admin", CustomClaims::new(), NOW).unwrap();

        let refreshed = codec.refresh_at(&token, NOW + 30).unwrap().unwrap();
        let claims = codec.verify_at(&refreshed, NOW + 30).unwrap();

        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.iat, NOW + 30);
        assert_eq!(claims.exp, NOW + 90); // strictly later than the original
    }

    #[test]
    fn refresh_refuses_expired_tokens() {
        let codec = codec(60);
        let token = codec.issue_at("admin", CustomClaims::new(), NOW).unwrap();

        assert_eq!(codec.refresh_at(&token, NOW + 60).unwrap(), None);
    }

    #[test]
    fn refresh_refuses_garbage() {
        let codec = codec(60);
        assert_eq!(codec.refresh_at("not-a-token", NOW).unwrap(), None);
    }
}
