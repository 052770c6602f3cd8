//! Once-per-request authentication: header → verify → resolve → context.
//!
//! The interceptor never rejects a request. Every failure mode collapses to
//! "the context stays without a principal" and the gate decides later whether
//! that matters for the route. The rejection reason is kept on the context so
//! the 401 body can say what actually went wrong.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::{self, Next},
    response::Response,
};
use tracing::{debug, warn};

use crate::api::v1::extractors::{AuthenticationOutcome, RejectReason, SecurityContext};
use crate::state::AppState;

/// Wrap `router` so every request passes the interceptor exactly once.
///
/// 例：
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::interceptor::apply(v1, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, intercept))
}

async fn intercept(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Run-once guard: an already populated context is never overwritten and
    // no verification work is repeated.
    if req.extensions().get::<SecurityContext>().is_none() {
        let request_id = req
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let outcome = authenticate(&state, req.headers()).await;
        match &outcome {
            AuthenticationOutcome::Authenticated(p) => {
                debug!(subject = %p.subject, "authenticated principal");
            }
            AuthenticationOutcome::Rejected(reason) => {
                debug!(%reason, "credential unusable, continuing without principal");
            }
            AuthenticationOutcome::Anonymous => {}
        }

        req.extensions_mut()
            .insert(SecurityContext::new(outcome, request_id));
    }

    next.run(req).await
}

/// Turn the request headers into an AuthenticationOutcome. Pure with respect
/// to the request; the only await point is the resolver call.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> AuthenticationOutcome {
    let header = headers
        .get(state.config.auth_header_name.as_str())
        .and_then(|v| v.to_str().ok());

    let Some(value) = header else {
        return AuthenticationOutcome::Anonymous;
    };

    // A wrong prefix is treated exactly like a missing header.
    let Some(token) = value.strip_prefix(state.config.auth_header_prefix.as_str()) else {
        return AuthenticationOutcome::Anonymous;
    };

    let claims = match state.codec.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!(error = %e, "token verification failed");
            return AuthenticationOutcome::Rejected(e.into());
        }
    };

    // Fail closed: any resolver outcome short of a principal leaves the
    // context empty, a resolver fault must not abort the pipeline.
    match state.resolver.resolve(&claims.sub).await {
        Ok(Some(principal)) => AuthenticationOutcome::Authenticated(principal),
        Ok(None) => {
            warn!(subject = %claims.sub, "principal not found");
            AuthenticationOutcome::Rejected(RejectReason::PrincipalNotFound)
        }
        Err(e) => {
            warn!(error = %e, "identity resolver failed");
            AuthenticationOutcome::Rejected(RejectReason::ResolverFault)
        }
    }
}
