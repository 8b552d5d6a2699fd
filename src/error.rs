// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::RoutineError;

/// Client message for a required query parameter that is absent or empty.
pub const MISSING_QUERY_PARAMETERS: &str = "Missing query parameters";

/// HTTP API error carrying a fixed, client-safe message.
///
/// The cause of a failure is logged where it happens; the client only ever
/// sees `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({ "error": self.message() })
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn missing_parameters() -> Self {
        ApiError::bad_request(MISSING_QUERY_PARAMETERS)
    }

    /// Error with the given status and message. Anything other than a 500
    /// or 404 is reported as a bad request.
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        match status {
            StatusCode::INTERNAL_SERVER_ERROR => ApiError::internal_server_error(message),
            StatusCode::NOT_FOUND => ApiError::not_found(message),
            _ => ApiError::bad_request(message),
        }
    }
}

/// Turns a routine failure into a client error with a fixed message,
/// logging the real cause.
pub trait RoutineResultExt<T> {
    fn or_fail(self, status: StatusCode, message: &str) -> Result<T, ApiError>;

    fn or_bad_request(self, message: &str) -> Result<T, ApiError>
    where
        Self: Sized,
    {
        self.or_fail(StatusCode::BAD_REQUEST, message)
    }

    fn or_internal(self, message: &str) -> Result<T, ApiError>
    where
        Self: Sized,
    {
        self.or_fail(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl<T> RoutineResultExt<T> for Result<T, RoutineError> {
    fn or_fail(self, status: StatusCode, message: &str) -> Result<T, ApiError> {
        self.map_err(|err| {
            tracing::error!("{}: {}", message, err);
            ApiError::with_status(status, message)
        })
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
