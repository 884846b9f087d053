//! Health check handlers

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::{
    entries::{Entry, EntryDto},
    state::AppState,
};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses
    pub dependencies: HashMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dependency is healthy
    pub healthy: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Simple health check (liveness probe)
///
/// Always returns 200 OK if the service is running.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check (readiness probe)
///
/// Returns 503 when a resource's sort mappings are missing, since every
/// list request for it would fail.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let mut dependencies = HashMap::new();

    let sort_mappings = match state.sort_mappings().mappings::<EntryDto, Entry>() {
        Ok(definition) => DependencyStatus {
            healthy: true,
            message: Some(format!("{} sortable fields", definition.mappings().len())),
        },
        Err(e) => {
            tracing::error!("Readiness check failed: {}", e);
            DependencyStatus {
                healthy: false,
                message: Some(e.to_string()),
            }
        }
    };
    dependencies.insert("sort_mappings".to_string(), sort_mappings);

    dependencies.insert(
        "entries".to_string(),
        DependencyStatus {
            healthy: true,
            message: Some(format!("{} records in memory", state.entries().len().await)),
        },
    );

    let ready = dependencies.values().all(|d| d.healthy);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = ReadinessResponse {
        ready,
        service: state.config().service.name.clone(),
        dependencies,
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{body::to_bytes, body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::new(Config::default()).unwrap();
        Router::new()
            .route("/health", get(health))
            .route("/ready", get(readiness))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.service, "habit-api");
    }

    #[tokio::test]
    async fn test_readiness() {
        let response = app()
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let ready: ReadinessResponse = serde_json::from_slice(&body).unwrap();
        assert!(ready.ready);
        assert!(ready.dependencies["sort_mappings"].healthy);
    }
}
