use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, Json};
use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::form_urlencoded;

use crate::database::RoutineCall;
use crate::error::{ApiError, RoutineResultExt};
use crate::state::AppState;
use crate::types::RawJson;

pub const INVALID_INPUT: &str = "Invalid input";
pub const INVALID_INPUT_FORMAT: &str = "Invalid input format";

/// Id-bearing query parameters used across the API.
///
/// Values stay strings until a handler asks for them, so an empty value
/// counts as missing rather than as a decode failure. A repeated key keeps
/// its first value; unknown keys are ignored, so extraction never fails.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IdQuery {
    pub project_id: Option<String>,
    pub role_id: Option<String>,
    pub user_id: Option<String>,
    pub module_id: Option<String>,
    pub sub_module_id: Option<String>,
    pub work_id: Option<String>,
    pub bug_id: Option<String>,
}

impl IdQuery {
    pub fn parse(query: &str) -> Self {
        let mut ids = IdQuery::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "projectId" => &mut ids.project_id,
                "roleId" => &mut ids.role_id,
                "userId" => &mut ids.user_id,
                "moduleId" => &mut ids.module_id,
                "subModuleId" => &mut ids.sub_module_id,
                "workId" => &mut ids.work_id,
                "bugId" => &mut ids.bug_id,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        ids
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for IdQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(IdQuery::parse(parts.uri.query().unwrap_or_default()))
    }
}

/// 0001-01-01T00:00:00Z, bound for a date a create body leaves out.
pub fn zero_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Decode a JSON body regardless of its content type.
pub fn parse_body<T: DeserializeOwned>(body: &[u8], message: &str) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::error!("{}: {}", message, e);
        ApiError::bad_request(message)
    })
}

/// A required id parameter. Absent or empty → missing-parameter error;
/// present but not an integer → the endpoint's own failure message.
pub fn required_id(value: Option<&str>, failure: &str) -> Result<i32, ApiError> {
    match value.filter(|v| !v.is_empty()) {
        Some(raw) => parse_id(raw, failure),
        None => Err(ApiError::missing_parameters()),
    }
}

/// An optional id parameter; empty counts as absent.
pub fn optional_id(value: Option<&str>, failure: &str) -> Result<Option<i32>, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .map(|raw| parse_id(raw, failure))
        .transpose()
}

fn parse_id(raw: &str, failure: &str) -> Result<i32, ApiError> {
    raw.trim().parse::<i32>().map_err(|e| {
        tracing::error!("{}: invalid id {:?}: {}", failure, raw, e);
        ApiError::bad_request(failure)
    })
}

/// Run a read routine and relay its JSON untouched.
pub async fn fetch_raw(state: &AppState, call: RoutineCall, failure: &str) -> Result<RawJson, ApiError> {
    state.routines().fetch_json(&call).await.or_bad_request(failure)
}

/// `{"message": text}` success body.
pub fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}
