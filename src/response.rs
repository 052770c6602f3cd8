/*
 * Responsibility
 * - 共通レスポンス envelope ({code, message, data}) の定義
 * - 成功/失敗どちらも同じ形で返す (error.rs の IntoResponse もこれを使う)
 */
use serde::Serialize;

/// Uniform API envelope.
///
/// - `code` follows the HTTP status class (200 / 400 / 401 / 403 / 500)
/// - `data` is `null` when there is nothing to carry
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn failed(code: u16, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::ok("x")).unwrap();
        assert_eq!(body["code"], 200);
        assert_eq!(body["message"], "success");
        assert_eq!(body["data"], "x");
    }

    #[test]
    fn failed_envelope_keeps_null_data() {
        let body =
            serde_json::to_value(ApiResponse::<String>::failed(401, "no token", None)).unwrap();
        assert_eq!(body["code"], 401);
        assert!(body["data"].is_null());
    }
}
