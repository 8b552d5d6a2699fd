use axum::{
    body::Bytes,
    extract::State,
    Json,
};
use serde::Deserialize;

use super::utils::{fetch_raw, parse_body, required_id, IdQuery, INVALID_INPUT};
use crate::database::{RoutineCall, RoutineError};
use crate::error::{ApiError, RoutineResultExt};
use crate::state::AppState;
use crate::types::RawJson;

/// Users added to and removed from one role within a project.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserRoleChange {
    pub role_id: i32,
    pub project_id: i32,
    pub users_added: Option<Vec<i32>>,
    pub users_removed: Option<Vec<i32>>,
}

impl UserRoleChange {
    /// Only pure additions are applied after a project create or alter.
    pub fn is_addition_only(&self) -> bool {
        let added = self.users_added.as_ref().map_or(0, Vec::len);
        let removed = self.users_removed.as_ref().map_or(0, Vec::len);
        added != 0 && removed == 0
    }
}

/// CALL alter_user_project_role(project, role, removed, added)
pub async fn alter_user_project_role(state: &AppState, change: UserRoleChange) -> Result<(), RoutineError> {
    let call = RoutineCall::procedure("alter_user_project_role")
        .arg(change.project_id)
        .arg(change.role_id)
        .arg(change.users_removed)
        .arg(change.users_added);
    state.routines().execute(&call).await
}

/// GET /api/getUserProjectRoles?projectId=
pub async fn get_user_project_roles(
    State(state): State<AppState>,
    query: IdQuery,
) -> Result<RawJson, ApiError> {
    const FAILURE: &str = "Failed to get user project roles";
    let project_id = required_id(query.project_id.as_deref(), FAILURE)?;
    fetch_raw(&state, RoutineCall::function("get_user_project_roles").arg(project_id), FAILURE).await
}

/// PUT /api/putUserProjectRole
pub async fn put_user_project_role(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<&'static str>, ApiError> {
    let change: UserRoleChange = parse_body(&body, INVALID_INPUT)?;
    alter_user_project_role(&state, change)
        .await
        .or_bad_request("Failed to alter user project role")?;
    Ok(Json("Succesfully altered user project role"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(added: Option<Vec<i32>>, removed: Option<Vec<i32>>) -> UserRoleChange {
        UserRoleChange {
            role_id: 1,
            project_id: 1,
            users_added: added,
            users_removed: removed,
        }
    }

    #[test]
    fn addition_only_requires_additions_and_no_removals() {
        assert!(change(Some(vec![1]), None).is_addition_only());
        assert!(change(Some(vec![1]), Some(vec![])).is_addition_only());
        assert!(!change(Some(vec![1]), Some(vec![2])).is_addition_only());
        assert!(!change(Some(vec![]), None).is_addition_only());
        assert!(!change(None, None).is_addition_only());
    }

    #[test]
    fn decodes_camel_case_fields() {
        let c: UserRoleChange =
            serde_json::from_str(r#"{"roleId":2,"projectId":5,"usersAdded":[7,8]}"#).unwrap();
        assert_eq!(c.role_id, 2);
        assert_eq!(c.project_id, 5);
        assert_eq!(c.users_added, Some(vec![7, 8]));
        assert_eq!(c.users_removed, None);
    }
}
