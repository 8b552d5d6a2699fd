use axum::{
    body::Bytes,
    extract::State,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use super::utils::{
    fetch_raw, message, parse_body, required_id, zero_timestamp, IdQuery, INVALID_INPUT, INVALID_INPUT_FORMAT,
};
use crate::database::RoutineCall;
use crate::error::{ApiError, RoutineResultExt};
use crate::state::AppState;
use crate::types::RawJson;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWork {
    #[serde(default)]
    pub sub_module_id: i32,
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
    pub tracker_id: i32,
    #[serde(default)]
    pub activity_id: i32,
    #[serde(default)]
    pub users_added: Option<Vec<i32>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlterWork {
    pub work_id: i32,
    pub work_name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub target_date: Option<DateTime<Utc>>,
    pub pic_id: Option<i32>,
    pub current_state: Option<i32>,
    pub priority_id: Option<i32>,
    pub estimated_hours: Option<i32>,
    pub tracker_id: Option<i32>,
    pub activity_id: Option<i32>,
    pub users_removed: Option<Vec<i32>>,
    pub users_added: Option<Vec<i32>>,
}

/// POST /api/postNewWork - create a work item and return its id
pub async fn post_new_work(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let work: NewWork = parse_body(&body, INVALID_INPUT)?;

    let call = RoutineCall::function("post_new_work")
        .arg(work.work_name)
        .arg(work.priority_id)
        .arg(work.pic_id)
        .arg(work.description)
        .arg(work.current_state)
        .arg(work.created_by)
        .arg(work.target_date)
        .arg(work.start_date)
        .arg(work.users_added)
        .arg(work.estimated_hours)
        .arg(work.sub_module_id)
        .arg(work.tracker_id)
        .arg(work.activity_id);
    let work_id = state
        .routines()
        .fetch_id(&call)
        .await
        .or_bad_request("Failed to create work")?;

    Ok(Json(json!({
        "message": "Work created successfully",
        "workId": work_id,
    })))
}

/// GET /api/getSubModuleWorks?subModuleId=
pub async fn get_sub_module_works(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<RawJson, ApiError> {
    const FAILURE: &str = "Failed to get sub-module works";
    let sub_module_id = required_id(query.sub_module_id.as_deref(), FAILURE)?;
    fetch_raw(&state, RoutineCall::function("get_sub_module_works").arg(sub_module_id), FAILURE).await
}

/// GET /api/getWorkDetails?workId=
pub async fn get_work_details(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<RawJson, ApiError> {
    const FAILURE: &str = "Failed to get work details";
    let work_id = required_id(query.work_id.as_deref(), FAILURE)?;
    fetch_raw(&state, RoutineCall::function("get_work_details").arg(work_id), FAILURE).await
}

/// PUT /api/putAlterWork
///
/// Also applies the assignee delta; database failures answer 500.
pub async fn put_alter_work(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let alter: AlterWork = parse_body(&body, INVALID_INPUT_FORMAT)?;

    let call = RoutineCall::procedure("put_alter_work")
        .arg(alter.work_id)
        .arg(alter.work_name)
        .arg(alter.description)
        .arg(alter.start_date)
        .arg(alter.target_date)
        .arg(alter.current_state)
        .arg(alter.pic_id)
        .arg(alter.priority_id)
        .arg(alter.estimated_hours)
        .arg(alter.tracker_id)
        .arg(alter.activity_id)
        .arg(alter.users_removed)
        .arg(alter.users_added);
    state
        .routines()
        .execute(&call)
        .await
        .or_internal("Failed to alter work details")?;

    Ok(message("Successfully altered work assignment"))
}

/// DELETE /api/dropWork?workId=
pub async fn drop_work(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<Json<&'static str>, ApiError> {
    const FAILURE: &str = "Failed to drop work";
    let work_id = required_id(query.work_id.as_deref(), FAILURE)?;
    state
        .routines()
        .execute(&RoutineCall::procedure("drop_work").arg(work_id))
        .await
        .or_bad_request(FAILURE)?;
    Ok(Json("Work dropped successfully"))
}

/// GET /api/getUserTodoList?userId=
pub async fn get_user_todo_list(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<RawJson, ApiError> {
    const FAILURE: &str = "Failed to get user todo list";
    let user_id = required_id(query.user_id.as_deref(), FAILURE)?;
    fetch_raw(&state, RoutineCall::function("get_user_todo_list").arg(user_id), FAILURE).await
}

/// GET /api/getWorkNameListOfProjectDev?projectId=
pub async fn get_work_name_list_of_project_dev(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<RawJson, ApiError> {
    const FAILURE: &str = "Failed to get work name list of project";
    let project_id = required_id(query.project_id.as_deref(), FAILURE)?;
    fetch_raw(
        &state,
        RoutineCall::function("get_work_name_list_of_project_dev").arg(project_id),
        FAILURE,
    )
    .await
}
