//! College catalogue handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use studycamp_core::{College, CoreError, Document, COLLEGES};
use studycamp_storage::DEFAULT_LIST_LIMIT;
use tracing::{debug, error, info};

use crate::{error::ApiError, state::AppState};

/// Query string of `GET /best-colleges`
#[derive(Debug, Default, Deserialize)]
pub struct BestCollegesQuery {
    pub limit: Option<String>,
}

impl BestCollegesQuery {
    /// Requested limit; absent, non-numeric or non-positive values fall back to 3.
    pub fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_LIST_LIMIT)
    }
}

fn render(documents: Vec<Document>) -> Vec<Value> {
    documents
        .into_iter()
        .map(|doc| College::from(doc).into_json())
        .collect()
}

/// List every college
pub async fn list_colleges(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let documents = state.store.list_all(COLLEGES).await?;

    debug!("Found {} colleges", documents.len());
    Ok(Json(render(documents)))
}

/// List the first `limit` colleges
pub async fn best_colleges(
    State(state): State<AppState>,
    Query(query): Query<BestCollegesQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let limit = query.limit();
    let documents = state.store.list_limited(COLLEGES, limit).await?;

    debug!("Returning {} of at most {} best colleges", documents.len(), limit);
    Ok(Json(render(documents)))
}

/// Get one college by id
///
/// A malformed id is reported as a server error rather than 404.
pub async fn get_college(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    info!("Getting college: {}", id);

    let document = state.store.get_by_id(COLLEGES, &id).await.map_err(|e| match e {
        CoreError::NotFound { .. } => ApiError::NotFound("colleges not found".to_string()),
        other => {
            error!("Failed to fetch college {}: {}", id, other);
            ApiError::Internal(other)
        }
    })?;

    Ok(Json(College::from(document).into_json()))
}
