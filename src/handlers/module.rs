use axum::{
    body::Bytes,
    extract::State,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::utils::{fetch_raw, message, parse_body, required_id, IdQuery, INVALID_INPUT};
use crate::database::RoutineCall;
use crate::error::{ApiError, RoutineResultExt};
use crate::state::AppState;
use crate::types::RawJson;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewModule {
    pub project_id: i32,
    pub module_name: String,
    pub description: String,
    pub created_by: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlterModule {
    pub module_id: i32,
    pub module_name: Option<String>,
    pub description: Option<String>,
}

/// GET /api/getModulesOfProject?projectId=
pub async fn get_modules_of_project(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<RawJson, ApiError> {
    const FAILURE: &str = "Failed to get modules of project";
    let project_id = required_id(query.project_id.as_deref(), FAILURE)?;
    fetch_raw(&state, RoutineCall::function("get_modules_of_project").arg(project_id), FAILURE).await
}

/// GET /api/getModuleDetails?moduleId=
pub async fn get_module_details(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<RawJson, ApiError> {
    const FAILURE: &str = "Failed to get module details";
    let module_id = required_id(query.module_id.as_deref(), FAILURE)?;
    fetch_raw(&state, RoutineCall::function("get_module_details").arg(module_id), FAILURE).await
}

/// POST /api/postNewModule
pub async fn post_new_module(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let module: NewModule = parse_body(&body, INVALID_INPUT)?;

    let call = RoutineCall::procedure("post_new_module")
        .arg(module.project_id)
        .arg(module.module_name)
        .arg(module.description)
        .arg(module.created_by);
    state
        .routines()
        .execute(&call)
        .await
        .or_bad_request("Failed to create module")?;

    Ok(message("Module created successfully"))
}

/// PUT /api/putAlterModule
pub async fn put_alter_module(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let alter: AlterModule = parse_body(&body, INVALID_INPUT)?;
    tracing::info!(
        "Updating module: {} name={:?} description={:?}",
        alter.module_id,
        alter.module_name,
        alter.description
    );

    let call = RoutineCall::procedure("put_alter_module")
        .arg(alter.module_id)
        .arg(alter.module_name)
        .arg(alter.description);
    state
        .routines()
        .execute(&call)
        .await
        .or_bad_request("Failed to create module")?;

    Ok(message("Module updated successfully"))
}
