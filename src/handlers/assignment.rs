use axum::{
    body::Bytes,
    extract::State,
    Json,
};
use serde::Deserialize;

use super::utils::{fetch_raw, parse_body, required_id, IdQuery, INVALID_INPUT};
use crate::database::RoutineCall;
use crate::error::{ApiError, RoutineResultExt};
use crate::state::AppState;
use crate::types::RawJson;

/// Users added to and removed from one work item.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserWorkChange {
    pub work_id: i32,
    pub users_added: Option<Vec<i32>>,
    pub users_removed: Option<Vec<i32>>,
}

/// GET /api/getUserWorkAssignment?workId=
pub async fn get_user_work_assignment(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<RawJson, ApiError> {
    const FAILURE: &str = "Failed to get user work assignment";
    let work_id = required_id(query.work_id.as_deref(), FAILURE)?;
    fetch_raw(&state, RoutineCall::function("get_user_work_assignment").arg(work_id), FAILURE).await
}

/// PUT /api/putAlterUserWorkAssignment
pub async fn put_alter_user_work_assignment(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<&'static str>, ApiError> {
    let change: UserWorkChange = parse_body(&body, INVALID_INPUT)?;

    let call = RoutineCall::procedure("alter_user_work_assignment")
        .arg(change.work_id)
        .arg(change.users_removed)
        .arg(change.users_added);
    state
        .routines()
        .execute(&call)
        .await
        .or_bad_request("Failed to alter user work assignment")?;

    Ok(Json("Succesfully altered user work assignment"))
}
