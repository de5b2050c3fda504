//! HTTP request handlers

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::state::AppState;
use super::{ApiResponse, HealthResponse};

/// Generate a request ID
fn request_id() -> String {
    format!("req-{:016x}", rand::random::<u64>())
}

/// Scoring request: one named-feature map per row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub records: Vec<HashMap<String, f64>>,
}

/// Scoring response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub probabilities: Vec<f64>,
    pub predictions: Vec<u8>,
    pub threshold: f64,
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let health = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_name: state.record().name.clone(),
        model_version: state.record().version.clone(),
        family: state.family().to_string(),
        threshold: state.threshold(),
        uptime_secs: state.uptime_secs(),
        scored_rows: state.scored_rows(),
    };
    (StatusCode::OK, Json(health))
}

/// Score a batch of records
pub async fn score(
    State(state): State<AppState>,
    Json(payload): Json<ScoreRequest>,
) -> (StatusCode, Json<ApiResponse<ScoreResponse>>) {
    let req_id = request_id();

    if payload.records.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("no records to score", &req_id)),
        );
    }

    match state.score_records(&payload.records) {
        Ok((probabilities, predictions)) => {
            tracing::info!(rows = predictions.len(), request_id = %req_id, "scored batch");
            let response = ScoreResponse {
                probabilities,
                predictions,
                threshold: state.threshold(),
            };
            (StatusCode::OK, Json(ApiResponse::success(response, &req_id)))
        }
        Err(e) => {
            tracing::warn!(request_id = %req_id, "rejected scoring request: {e}");
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(&e.to_string(), &req_id)),
            )
        }
    }
}
