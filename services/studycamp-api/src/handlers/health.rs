//! Liveness and readiness endpoints
//!
//! - `/` - plain-text liveness string, always 200 while the process serves
//! - `/health` - readiness: pings the document store, 503 when unreachable

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use studycamp_storage::StoreStatus;
use tracing::{debug, warn};

use crate::state::AppState;

/// Body returned by `GET /`.
pub const LIVENESS_MESSAGE: &str = "StudyCamp server is running";

/// Readiness status of a component or the whole service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unavailable,
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub storage: HealthStatus,
}

/// Liveness handler
pub async fn root_handler() -> &'static str {
    LIVENESS_MESSAGE
}

/// Readiness handler
pub async fn readiness_handler(State(state): State<AppState>) -> Response {
    debug!("Readiness check requested");

    let storage = match state.store.status().await {
        Ok(StoreStatus::Healthy) => HealthStatus::Healthy,
        Ok(StoreStatus::Unavailable) => {
            warn!("Document store is unavailable");
            HealthStatus::Unavailable
        }
        Err(e) => {
            warn!("Document store status check failed: {}", e);
            HealthStatus::Unavailable
        }
    };

    let code = match storage {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    };

    (
        code,
        Json(HealthResponse {
            status: storage,
            version: env!("CARGO_PKG_VERSION").to_string(),
            storage,
        }),
    )
        .into_response()
}
