/*
 * Responsibility
 * - 認証済み principal を読むだけの handler (collaborator 向け surface の例)
 */
use axum::Json;

use crate::api::v1::dto::auth::PrincipalResponse;
use crate::api::v1::extractors::SecurityCtx;
use crate::error::AppError;
use crate::response::ApiResponse;

pub async fn admin_info(
    SecurityCtx(ctx): SecurityCtx,
) -> Result<Json<ApiResponse<PrincipalResponse>>, AppError> {
    // The gate runs before this handler; an empty context here means the
    // route was wired without one.
    let principal = ctx
        .principal()
        .ok_or_else(|| AppError::unauthorized("missing credentials"))?;

    let mut roles: Vec<String> = principal.authorities.iter().cloned().collect();
    roles.sort();

    Ok(Json(ApiResponse::ok(PrincipalResponse {
        username: principal.subject.clone(),
        roles,
    })))
}
