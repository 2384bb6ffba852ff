/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`; every failure becomes an [`ApiError`],
/// which renders the response clients see.
///
/// # Response Formats
///
/// Client errors are `400 Bad Request` with a JSON list of messages:
///
/// ```json
/// { "errors": [ { "type": "field", "msg": "Name is required", "path": "name", "location": "body" } ] }
/// ```
///
/// Server errors are `500` with the plain-text body `Server error`. The
/// cause is logged and never sent to the client.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use connector_shared::{
    auth::{jwt::JwtError, password::PasswordError},
    store::StoreError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Message returned when registering an email that is already taken
pub const USER_EXISTS_MESSAGE: &str = "User already exists";

/// Body of every 500 response
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Request body could not be read as the expected JSON (400)
    BadRequest(String),

    /// One or more fields failed validation (400)
    Validation(Vec<ErrorDetail>),

    /// Email already registered (400)
    UserExists,

    /// Anything else (500)
    Internal(String),
}

/// One entry in the `errors` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// `"field"` for per-field validation errors
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Human-readable message
    pub msg: String,

    /// Name of the offending field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Where the field was read from (always `"body"` here)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ErrorDetail {
    /// Error not tied to a particular field
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            kind: None,
            msg: msg.into(),
            path: None,
            location: None,
        }
    }

    /// Validation error for a body field
    pub fn body_field(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            kind: Some("field".to_string()),
            msg: msg.into(),
            path: Some(path.into()),
            location: Some("body".to_string()),
        }
    }
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorDetail>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::UserExists => write!(f, "{}", USER_EXISTS_MESSAGE),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let errors = match self {
            ApiError::BadRequest(msg) => vec![ErrorDetail::message(msg)],
            ApiError::Validation(errors) => errors,
            ApiError::UserExists => vec![ErrorDetail::message(USER_EXISTS_MESSAGE)],
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                return (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MESSAGE).into_response();
            }
        };

        (StatusCode::BAD_REQUEST, Json(ErrorResponse { errors })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => ApiError::UserExists,
            StoreError::Backend(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::Internal(format!("Token signing failed: {}", err))
    }
}
