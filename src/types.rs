//! Shared types used across the codebase

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// JSON text produced by a database routine.
///
/// The API never parses or reshapes it; the text is written to the response
/// body byte for byte with `content-type: application/json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawJson(String);

impl RawJson {
    pub fn new(text: impl Into<String>) -> Self {
        RawJson(text.into())
    }
}

impl From<String> for RawJson {
    fn from(text: String) -> Self {
        RawJson(text)
    }
}

impl IntoResponse for RawJson {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            self.0,
        )
            .into_response()
    }
}
