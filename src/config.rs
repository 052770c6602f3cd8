/*
 * Responsibility
 * - 環境変数や設定の読み込み (JWT secret/TTL, ヘッダ名/プレフィックスなど)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    /// Process-wide HMAC secret. Loaded once, read-only afterwards.
    pub jwt_secret: String,
    /// Seconds from issuance until forced expiry. Must be > 0.
    pub jwt_ttl_seconds: u64,

    /// Header carrying the credential, e.g. `Authorization`.
    pub auth_header_name: String,
    /// Literal prefix in front of the token value, e.g. `"Bearer "`.
    pub auth_header_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let jwt_ttl_seconds = match std::env::var("JWT_TTL_SECONDS") {
            Ok(v) => v
                .parse::<u64>()
                .ok()
                .filter(|ttl| *ttl > 0)
                .ok_or(ConfigError::Invalid("JWT_TTL_SECONDS"))?,
            Err(_) => 3600,
        };

        let auth_header_name =
            std::env::var("AUTH_HEADER_NAME").unwrap_or_else(|_| "Authorization".to_string());

        let auth_header_prefix =
            std::env::var("AUTH_HEADER_PREFIX").unwrap_or_else(|_| "Bearer ".to_string());

        Ok(Self {
            addr,
            app_env,
            jwt_secret,
            jwt_ttl_seconds,
            auth_header_name,
            auth_header_prefix,
        })
    }
}

#[cfg(test)]
impl Config {
    /// Fixed config for tests; the header contract matches the defaults.
    pub fn for_tests(secret: &str, ttl_seconds: u64) -> Self {
        Self {
            addr: SocketAddr::from_str("127.0.0.1:0").unwrap(),
            app_env: AppEnv::Development,
            jwt_secret: secret.to_string(),
            jwt_ttl_seconds: ttl_seconds,
            auth_header_name: "Authorization".to_string(),
            auth_header_prefix: "Bearer ".to_string(),
        }
    }
}
