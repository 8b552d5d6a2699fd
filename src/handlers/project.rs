use axum::{
    body::Bytes,
    extract::State,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::role::{alter_user_project_role, UserRoleChange};
use super::utils::{fetch_raw, parse_body, required_id, zero_timestamp, IdQuery, INVALID_INPUT};
use crate::database::RoutineCall;
use crate::error::{ApiError, RoutineResultExt};
use crate::state::AppState;
use crate::types::RawJson;

const ROLE_ASSIGNMENT_FAILED: &str = "Project created successfully but Failed to set user project role";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_by: i32,
    /// Accepted for compatibility; the create routine does not take it.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default = "zero_timestamp")]
    pub target_date: DateTime<Utc>,
    #[serde(default)]
    pub pic_id: i32,
    #[serde(default)]
    pub user_roles: Vec<UserRoleChange>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlterProject {
    pub project_id: Option<i32>,
    pub project_name: Option<String>,
    pub description: Option<String>,
    /// Accepted for compatibility; the alter routine does not take it.
    pub start_date: Option<DateTime<Utc>>,
    pub target_date: Option<DateTime<Utc>>,
    pub pic_id: Option<i32>,
    pub user_roles: Vec<UserRoleChange>,
    pub project_done: Option<bool>,
}

/// Apply every addition-only role change to `project_id`, in order.
///
/// Not transactional: the project write before this has already committed,
/// and the first failing change stops the loop.
async fn apply_role_additions(
    state: &AppState,
    project_id: Option<i32>,
    user_roles: Vec<UserRoleChange>,
) -> Result<(), ApiError> {
    for mut change in user_roles.into_iter().filter(UserRoleChange::is_addition_only) {
        let Some(project_id) = project_id else {
            tracing::error!("{}: no projectId to assign roles to", ROLE_ASSIGNMENT_FAILED);
            return Err(ApiError::bad_request(ROLE_ASSIGNMENT_FAILED));
        };
        change.project_id = project_id;
        alter_user_project_role(state, change)
            .await
            .or_bad_request(ROLE_ASSIGNMENT_FAILED)?;
    }
    Ok(())
}

/// GET /api/getAllProjects
pub async fn get_all_projects(State(state): State<AppState>) -> Result<RawJson, ApiError> {
    fetch_raw(&state, RoutineCall::function("get_projects"), "Failed to get projects").await
}

/// GET /api/getUserProjects?userId=
pub async fn get_user_projects(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<RawJson, ApiError> {
    const FAILURE: &str = "Failed to get projects";
    let user_id = required_id(query.user_id.as_deref(), FAILURE)?;
    fetch_raw(&state, RoutineCall::function("get_projects").arg(user_id), FAILURE).await
}

/// GET /api/getProjectDetails?projectId=
pub async fn get_project_details(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<RawJson, ApiError> {
    const FAILURE: &str = "Failed to get project details";
    let project_id = required_id(query.project_id.as_deref(), FAILURE)?;
    fetch_raw(&state, RoutineCall::function("get_project_details").arg(project_id), FAILURE).await
}

/// GET /api/getGanttDataOfProject?projectId=
pub async fn get_gantt_data_of_project(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<RawJson, ApiError> {
    const FAILURE: &str = "Failed to get gantt data";
    let project_id = required_id(query.project_id.as_deref(), FAILURE)?;
    fetch_raw(&state, RoutineCall::function("get_gantt_data_of_project").arg(project_id), FAILURE).await
}

/// POST /api/postNewProject
///
/// Creates the project, then assigns the requested roles to the new id.
pub async fn post_new_project(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<&'static str>, ApiError> {
    let project: NewProject = parse_body(&body, INVALID_INPUT)?;

    let call = RoutineCall::function("post_new_project")
        .arg(project.project_name)
        .arg(project.description)
        .arg(project.created_by)
        .arg(project.target_date)
        .arg(project.pic_id);
    let new_id = state
        .routines()
        .fetch_id(&call)
        .await
        .or_bad_request("Failed to create project")?;
    tracing::info!("Project created with ID: {}", new_id);

    let project_id = i32::try_from(new_id).ok();
    apply_role_additions(&state, project_id, project.user_roles).await?;

    Ok(Json("Project created successfully"))
}

/// PUT /api/putAlterProject
pub async fn put_alter_project(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<&'static str>, ApiError> {
    let alter: AlterProject = parse_body(&body, INVALID_INPUT)?;

    let call = RoutineCall::procedure("put_alter_project")
        .arg(alter.project_id)
        .arg(alter.project_name)
        .arg(alter.description)
        .arg(alter.target_date)
        .arg(alter.pic_id)
        .arg(alter.project_done);
    state
        .routines()
        .execute(&call)
        .await
        .or_bad_request("Failed to update project")?;

    apply_role_additions(&state, alter.project_id, alter.user_roles).await?;

    Ok(Json("Project created successfully"))
}

/// DELETE /api/dropProject?projectId=
pub async fn drop_project(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<Json<&'static str>, ApiError> {
    const FAILURE: &str = "Failed to drop project";
    let project_id = required_id(query.project_id.as_deref(), FAILURE)?;
    state
        .routines()
        .execute(&RoutineCall::procedure("drop_project").arg(project_id))
        .await
        .or_bad_request(FAILURE)?;
    Ok(Json("Project dropped successfully"))
}
