use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `token_head` is the configured bearer prefix so clients can rebuild the
/// header verbatim.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_head: String,
}

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub username: String,
    pub roles: Vec<String>,
}
