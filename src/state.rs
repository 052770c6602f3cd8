/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)。起動後は不変
 */
use std::sync::Arc;

use crate::config::Config;
use crate::services::identity::IdentityResolver;
use crate::services::token::TokenCodec;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub codec: TokenCodec,
    pub resolver: Arc<dyn IdentityResolver>,
}

impl AppState {
    pub fn new(config: Config, resolver: Arc<dyn IdentityResolver>) -> Self {
        let codec = TokenCodec::new(&config.jwt_secret, config.jwt_ttl_seconds);
        Self {
            config: Arc::new(config),
            codec,
            resolver,
        }
    }
}
