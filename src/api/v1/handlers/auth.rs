/*
 * Responsibility
 * - login / refresh_token handler
 * - 資格情報の照合は resolver の credential hash に対して行う。トークンの
 *   発行/更新は TokenCodec に委譲
 */
use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use tracing::{info, warn};

use crate::api::v1::dto::auth::{LoginRequest, TokenResponse};
use crate::error::AppError;
use crate::response::ApiResponse;
use crate::services::token::CustomClaims;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, AppError> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::bad_request("username and password are required"));
    }

    let principal = state
        .resolver
        .resolve(&req.username)
        .await
        .map_err(|e| {
            warn!(error = %e, "identity resolver failed during login");
            AppError::Internal
        })?
        // Unknown user and bad password answer identically.
        .ok_or_else(|| AppError::unauthorized("invalid username or password"))?;

    if !principal.password_matches(&req.password) {
        warn!(subject = %principal.subject, "login with bad credentials");
        return Err(AppError::unauthorized("invalid username or password"));
    }

    let token = state.codec.issue(&principal.subject, CustomClaims::new())?;
    info!(subject = %principal.subject, "login succeeded");

    Ok(Json(ApiResponse::ok(TokenResponse {
        token,
        token_head: state.config.auth_header_prefix.clone(),
    })))
}

/// Re-issue the presented token. Reads the same configured header as the
/// interceptor; expired or invalid tokens are never refreshable.
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<TokenResponse>>, AppError> {
    let token = headers
        .get(state.config.auth_header_name.as_str())
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(state.config.auth_header_prefix.as_str()))
        .ok_or_else(|| AppError::unauthorized("missing credentials"))?;

    match state.codec.refresh(token)? {
        Some(refreshed) => Ok(Json(ApiResponse::ok(TokenResponse {
            token: refreshed,
            token_head: state.config.auth_header_prefix.clone(),
        }))),
        None => Err(AppError::unauthorized(
            "token expired or invalid, please login again",
        )),
    }
}
