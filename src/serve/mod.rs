//! HTTP scoring service
//!
//! Axum endpoint backed by a registered model version: `GET /health` and
//! `POST /score`. Incoming records are validated against the training
//! feature schema before the model is touched; responses use a uniform
//! envelope with a request id.

mod handlers;
mod state;

pub use handlers::{health, score, ScoreRequest, ScoreResponse};
pub use state::AppState;

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::FiarError;
use crate::registry::{ModelRegistry, RegistryError};

/// Errors from the scoring service.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("bind error: {0}")]
    Bind(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Artifact(#[from] FiarError),
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServeError>;

/// Scoring service configuration.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub address: SocketAddr,
    pub model_name: String,
    /// Specific version, or None for the latest registered one.
    pub version: Option<String>,
    /// Override of the bundle's tuned threshold.
    pub threshold_override: Option<f64>,
}

/// API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    /// Request ID for tracing
    pub request_id: String,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T, request_id: &str) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            request_id: request_id.to_string(),
        }
    }

    /// Create error response
    pub fn error(message: &str, request_id: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.to_string()),
            request_id: request_id.to_string(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_name: String,
    pub model_version: String,
    pub family: String,
    pub threshold: f64,
    pub uptime_secs: u64,
    pub scored_rows: u64,
}

/// Build the router for a loaded state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/score", post(score))
        .with_state(state)
}

/// Resolve the model from the registry and serve until shutdown.
pub async fn run(config: ServeConfig, registry: &ModelRegistry) -> Result<()> {
    let state = AppState::from_registry(registry, &config)?;
    tracing::info!(
        model = %state.record().name,
        version = %state.record().version,
        threshold = state.threshold(),
        "scoring endpoint starting on {}",
        config.address
    );

    let listener = tokio::net::TcpListener::bind(config.address)
        .await
        .map_err(|e| ServeError::Bind(format!("{}: {e}", config.address)))?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
