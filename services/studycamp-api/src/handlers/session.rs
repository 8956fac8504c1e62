//! Session token issuance

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{error::ApiError, extract::JsonBody, state::AppState};

/// Response for `POST /jwt`
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Sign the posted object into a session token
pub async fn issue_token(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.tokens.issue(payload)?;

    debug!("Issued session token valid for {}h", state.tokens.ttl().num_hours());
    Ok(Json(TokenResponse { token }))
}
