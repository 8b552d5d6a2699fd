use axum::{
    body::Bytes,
    extract::State,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::utils::{
    fetch_raw, message, parse_body, required_id, zero_timestamp, IdQuery, INVALID_INPUT, INVALID_INPUT_FORMAT,
};
use crate::database::RoutineCall;
use crate::error::{ApiError, RoutineResultExt};
use crate::state::AppState;
use crate::types::RawJson;

/// A bug is a work item tied to the work it affects and a defect cause.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBug {
    #[serde(default)]
    pub work_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "zero_timestamp")]
    pub start_date: DateTime<Utc>,
    #[serde(default = "zero_timestamp")]
    pub target_date: DateTime<Utc>,
    #[serde(default)]
    pub pic_id: Option<i32>,
    #[serde(default)]
    pub current_state: i32,
    #[serde(default)]
    pub created_by: i32,
    #[serde(default)]
    pub priority_id: i32,
    #[serde(default)]
    pub estimated_hours: i32,
    #[serde(default)]
    pub users_added: Option<Vec<i32>>,
    #[serde(default)]
    pub work_affected: i32,
    #[serde(default)]
    pub defect_cause: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlterBug {
    pub work_id: i32,
    pub work_name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub target_date: Option<DateTime<Utc>>,
    pub pic_id: Option<i32>,
    pub current_state: Option<i32>,
    pub priority_id: Option<i32>,
    pub estimated_hours: Option<i32>,
    pub work_affected: Option<i32>,
    pub defect_cause: Option<i32>,
    pub users_removed: Option<Vec<i32>>,
    pub users_added: Option<Vec<i32>>,
}

/// POST /api/postNewBug
pub async fn post_new_bug(State(state): State<AppState>, body: Bytes) -> Result<Json<&'static str>, ApiError> {
    let bug: NewBug = parse_body(&body, INVALID_INPUT)?;

    let call = RoutineCall::procedure("post_new_bug")
        .arg(bug.work_name)
        .arg(bug.priority_id)
        .arg(bug.pic_id)
        .arg(bug.description)
        .arg(bug.current_state)
        .arg(bug.created_by)
        .arg(bug.target_date)
        .arg(bug.start_date)
        .arg(bug.users_added)
        .arg(bug.estimated_hours)
        .arg(bug.defect_cause)
        .arg(bug.work_affected);
    state
        .routines()
        .execute(&call)
        .await
        .or_bad_request("Failed to create bug")?;

    Ok(Json("Bug created successfully"))
}

/// GET /api/getProjectBugs?projectId=
pub async fn get_project_bugs(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<RawJson, ApiError> {
    const FAILURE: &str = "Failed to get bug list";
    let project_id = required_id(query.project_id.as_deref(), FAILURE)?;
    fetch_raw(&state, RoutineCall::function("get_project_bugs").arg(project_id), FAILURE).await
}

/// PUT /api/putAlterBug
pub async fn put_alter_bug(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let alter: AlterBug = parse_body(&body, INVALID_INPUT_FORMAT)?;
    tracing::debug!("{:?}", alter);

    let call = RoutineCall::procedure("put_alter_bug")
        .arg(alter.work_id)
        .arg(alter.work_name)
        .arg(alter.description)
        .arg(alter.start_date)
        .arg(alter.target_date)
        .arg(alter.current_state)
        .arg(alter.pic_id)
        .arg(alter.priority_id)
        .arg(alter.estimated_hours)
        .arg(alter.defect_cause)
        .arg(alter.work_affected)
        .arg(alter.users_removed)
        .arg(alter.users_added);
    state
        .routines()
        .execute(&call)
        .await
        .or_internal("Failed to alter bug details")?;

    Ok(message("Successfully altered bug"))
}

/// GET /api/getBugDetails?bugId=
pub async fn get_bug_details(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<RawJson, ApiError> {
    const FAILURE: &str = "Failed to get bug details";
    let bug_id = required_id(query.bug_id.as_deref(), FAILURE)?;
    fetch_raw(&state, RoutineCall::function("get_bug_details").arg(bug_id), FAILURE).await
}
