use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

/// Canonical JSON payload for error responses.
#[derive(Debug, Serialize, Clone)]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct SavedFeedback {
    pub message: &'static str,
    pub id: Uuid,
}

impl SavedFeedback {
    pub fn new(id: Uuid) -> Self {
        Self {
            message: "Saved",
            id,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct LoginSuccess {
    pub message: &'static str,
    pub identity: String,
}

pub type JsonError = (StatusCode, Json<ApiMessage>);

/// Helper for controllers that need to return `(StatusCode, Json<ApiMessage>)`.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> JsonError {
    (status, Json(ApiMessage::new(message)))
}

/// Malformed or incomplete JSON bodies answer 400 in the same shape as other errors.
pub fn rejected_body(rejection: JsonRejection) -> JsonError {
    json_error(StatusCode::BAD_REQUEST, rejection.body_text())
}
