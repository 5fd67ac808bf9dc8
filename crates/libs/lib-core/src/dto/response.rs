//! # Response Envelope
//!
//! Every successful response body has the shape:
//!
//! ```json
//! {
//!   "success": true,
//!   "message": "Carbon credits calculated and added",
//!   "data": { }
//! }
//! ```
//!
//! `message` is omitted when there is nothing to say.

use serde::Serialize;

/// Success envelope around a response payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_is_omitted_when_absent() {
        let body = serde_json::to_value(ApiResponse::ok(json!([1, 2]))).unwrap();
        assert_eq!(body, json!({ "success": true, "data": [1, 2] }));

        let body = serde_json::to_value(ApiResponse::with_message("done", 7)).unwrap();
        assert_eq!(body["message"], "done");
    }
}
