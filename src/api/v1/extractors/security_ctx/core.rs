use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::SecurityContext;

/// Extractor for handlers that read the request's security state.
/// The interceptor must have inserted a SecurityContext into the request
/// extensions; its absence means the middleware is not wired, answered with
/// the same 401 envelope as missing credentials.
pub struct SecurityCtx(pub SecurityContext);

impl<S> FromRequestParts<S> for SecurityCtx
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .map(SecurityCtx)
            .ok_or_else(|| AppError::unauthorized("missing credentials"))
    }
}
