//! Uniform response envelope

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Every endpoint answers with this shape, on success and on failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseResponse<T> {
    pub data: Option<T>,
    pub message: String,
    pub status: u16,
    pub success: bool,
}

impl<T> BaseResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            message: message.into(),
            status: StatusCode::OK.as_u16(),
            success: true,
        }
    }

    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: message.into(),
            status: status.as_u16(),
            success: false,
        }
    }
}

impl BaseResponse<()> {
    /// Success without payload (`data` is serialized as null)
    pub fn empty(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: message.into(),
            status: status.as_u16(),
            success: true,
        }
    }
}
