/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / envelope body)
 * - 認証失敗 (401) と権限不足 (403) の terminal responder はここに集約
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    /// No usable identity on a route that requires one. `reason` is the
    /// human-readable trigger (missing header, expired/invalid token,
    /// resolver failure) — never the raw crypto detail.
    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// Valid identity, insufficient capability. The denial detail (which
    /// authorities the route required) travels in `data`, the message stays
    /// fixed.
    #[error("insufficient privilege")]
    Forbidden { required: Vec<String> },

    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    pub fn forbidden(required: Vec<String>) -> Self {
        Self::Forbidden { required }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::failed(400, message, None),
            ),
            AppError::Unauthorized { reason } => (
                StatusCode::UNAUTHORIZED,
                ApiResponse::failed(401, reason, None),
            ),
            AppError::Forbidden { required } => (
                StatusCode::FORBIDDEN,
                ApiResponse::failed(
                    403,
                    "insufficient privilege",
                    Some(serde_json::json!({ "required": required })),
                ),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::failed(500, "internal server error", None),
            ),
        };

        (status, Json(body)).into_response()
    }
}
