use axum::{
    body::Bytes,
    extract::State,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::utils::{
    fetch_raw, message, parse_body, required_id, zero_timestamp, IdQuery, INVALID_INPUT,
};
use crate::database::RoutineCall;
use crate::error::{ApiError, RoutineResultExt};
use crate::state::AppState;
use crate::types::RawJson;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubModule {
    #[serde(default)]
    pub project_id: i32,
    #[serde(default)]
    pub sub_module_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "zero_timestamp")]
    pub start_date: DateTime<Utc>,
    #[serde(default = "zero_timestamp")]
    pub target_date: DateTime<Utc>,
    #[serde(default)]
    pub created_by: i32,
    #[serde(default)]
    pub pic_id: i32,
    #[serde(default)]
    pub priority_id: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlterSubModule {
    pub sub_module_id: i32,
    pub sub_module_name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub target_date: Option<DateTime<Utc>>,
    pub pic_id: Option<i32>,
    pub priority_id: Option<i32>,
}

/// GET /api/getProjectSubModules?projectId=
pub async fn get_project_sub_modules(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<RawJson, ApiError> {
    const FAILURE: &str = "Failed to get project sub-modules";
    let project_id = required_id(query.project_id.as_deref(), FAILURE)?;
    fetch_raw(&state, RoutineCall::function("get_project_sub_modules").arg(project_id), FAILURE).await
}

/// POST /api/postNewSubModule
pub async fn post_new_sub_module(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<&'static str>, ApiError> {
    let sub: NewSubModule = parse_body(&body, INVALID_INPUT)?;

    let call = RoutineCall::procedure("post_new_sub_module")
        .arg(sub.project_id)
        .arg(sub.sub_module_name)
        .arg(sub.description)
        .arg(sub.start_date)
        .arg(sub.target_date)
        .arg(sub.created_by)
        .arg(sub.pic_id)
        .arg(sub.priority_id);
    state
        .routines()
        .execute(&call)
        .await
        .or_bad_request("Failed to create sub-module")?;

    Ok(Json("Sub-module created successfully"))
}

/// PUT /api/putAlterSubModule
pub async fn put_alter_sub_module(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let alter: AlterSubModule = parse_body(&body, INVALID_INPUT)?;

    let call = RoutineCall::procedure("put_alter_sub_module")
        .arg(alter.sub_module_id)
        .arg(alter.sub_module_name)
        .arg(alter.description)
        .arg(alter.start_date)
        .arg(alter.target_date)
        .arg(alter.pic_id)
        .arg(alter.priority_id);
    state
        .routines()
        .execute(&call)
        .await
        .or_bad_request("Failed to update subModule")?;

    Ok(message("subModule updated successfully"))
}

/// DELETE /api/dropSubModule?subModuleId=
pub async fn drop_sub_module(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<Json<&'static str>, ApiError> {
    const FAILURE: &str = "Failed to drop subModule";
    let sub_module_id = required_id(query.sub_module_id.as_deref(), FAILURE)?;
    state
        .routines()
        .execute(&RoutineCall::procedure("drop_sub_module").arg(sub_module_id))
        .await
        .or_bad_request(FAILURE)?;
    Ok(Json("subModule dropped successfully"))
}
