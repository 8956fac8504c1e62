//! Candidate submission handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use studycamp_core::{bson_to_json, CandidateSubmission, CANDIDATE_COLLECTION};
use tracing::{debug, info};

use crate::{error::ApiError, extract::JsonBody, state::AppState};

/// Acknowledgement for `POST /candidate`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    pub acknowledged: bool,
    pub inserted_id: Value,
}

/// Query string of `GET /mycollege`
#[derive(Debug, Default, Deserialize)]
pub struct MyCollegeQuery {
    pub email: Option<String>,
}

/// Store a candidate's application as submitted
pub async fn submit_candidate(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> Result<Json<InsertResponse>, ApiError> {
    info!(?payload, "Candidate submission received");

    let submission = CandidateSubmission::from_payload(&payload)?;
    let result = state
        .store
        .insert_one(CANDIDATE_COLLECTION, submission.into_document())
        .await?;

    Ok(Json(InsertResponse {
        acknowledged: result.acknowledged,
        inserted_id: bson_to_json(result.inserted_id),
    }))
}

/// List submissions for `?email=`, or every submission without it
pub async fn my_college(
    State(state): State<AppState>,
    Query(query): Query<MyCollegeQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let email = query.email.as_deref().filter(|email| !email.is_empty());
    let filter = CandidateSubmission::email_filter(email);

    let documents = state
        .store
        .find_by_filter(CANDIDATE_COLLECTION, filter)
        .await?;

    debug!("Found {} submission(s)", documents.len());
    Ok(Json(
        documents
            .into_iter()
            .map(|doc| CandidateSubmission::from(doc).into_json())
            .collect(),
    ))
}
