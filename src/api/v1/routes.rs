/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - login / refresh_token は匿名可、それ以外は gate を通す
 * - interceptor は v1 全体に 1 回だけ掛ける (gate より外側)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth::{gate, interceptor};
use crate::state::AppState;

use crate::api::v1::handlers::{
    admin::admin_info,
    auth::{login, refresh_token},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/admin/login", post(login))
        .route("/admin/refresh_token", get(refresh_token));

    let protected = gate::require_any(
        Router::new().route("/admin/info", get(admin_info)),
        &["ROLE_ADMIN", "ROLE_USER"],
    );

    interceptor::apply(public.merge(protected), state)
}
