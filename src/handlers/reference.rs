// Lookup data the frontend loads for pickers and dropdowns.

use axum::extract::State;

use super::utils::{fetch_raw, optional_id, required_id, IdQuery};
use crate::database::RoutineCall;
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::RawJson;

/// GET /api/getUsernames
pub async fn get_usernames(State(state): State<AppState>) -> Result<RawJson, ApiError> {
    fetch_raw(&state, RoutineCall::function("get_usernames"), "Failed to get usernames").await
}

/// GET /api/getProjectAssignedUsernames?projectId=[&roleId=]
///
/// Without `roleId` the one-argument overload runs; with it, the
/// role-filtered overload.
pub async fn get_project_assigned_usernames(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<RawJson, ApiError> {
    const FAILURE: &str = "Failed to get project usernames";
    let project_id = required_id(query.project_id.as_deref(), FAILURE)?;
    let role_id = optional_id(query.role_id.as_deref(), FAILURE)?;

    let mut call = RoutineCall::function("get_project_assigned_usernames").arg(project_id);
    if let Some(role_id) = role_id {
        call = call.arg(role_id);
    }
    fetch_raw(&state, call, FAILURE).await
}

/// GET /api/getStartBundle - trackers, activities, priorities and states
pub async fn get_start_bundle(State(state): State<AppState>) -> Result<RawJson, ApiError> {
    let call = RoutineCall::function("get_tracker_activity_priority_state_list");
    fetch_raw(&state, call, "Failed to get start data").await
}

/// GET /api/getProjectAndWorkNames?userId=
pub async fn get_project_and_work_names(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<RawJson, ApiError> {
    const FAILURE: &str = "Failed to get project and work names";
    let user_id = required_id(query.user_id.as_deref(), FAILURE)?;
    fetch_raw(&state, RoutineCall::function("get_project_and_work_names").arg(user_id), FAILURE).await
}

/// GET /api/getDefectCauseList
pub async fn get_defect_cause_list(State(state): State<AppState>) -> Result<RawJson, ApiError> {
    fetch_raw(&state, RoutineCall::function("get_defect_cause_list"), "Failed to get start data").await
}
