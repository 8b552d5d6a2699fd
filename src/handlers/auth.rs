use axum::{body::Bytes, extract::State};
use serde::Deserialize;

use super::utils::{fetch_raw, parse_body, INVALID_INPUT};
use crate::database::RoutineCall;
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::RawJson;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// POST /api/login - check a username/password pair
///
/// Both values go to the database as-is; the returned JSON is relayed
/// without inspection.
pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<RawJson, ApiError> {
    let credentials: Credentials = parse_body(&body, INVALID_INPUT)?;
    tracing::info!("Login attempt for user: {}", credentials.username);

    let call = RoutineCall::function("get_user_id_by_credentials")
        .arg(credentials.username)
        .arg(credentials.password);
    fetch_raw(&state, call, "Failed to get user ID").await
}
