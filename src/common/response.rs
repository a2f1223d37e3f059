// Uniform success envelope for handler payloads

use serde::Serialize;

/// Every successful handler response is wrapped in this envelope so clients
/// always see `{ "message": ..., "data": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            message: "Success".to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Success with a message but no payload (signup, logout, refresh).
    pub fn message_only() -> Self {
        Self {
            message: "Success".to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let resp = ApiResponse::success(serde_json::json!({"id": "U_K7NP3X"}));
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["message"], "Success");
        assert_eq!(json["data"]["id"], "U_K7NP3X");
    }

    #[test]
    fn test_message_only_envelope_has_null_data() {
        let resp = ApiResponse::message_only();
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["message"], "Success");
        assert!(json["data"].is_null());
    }
}
