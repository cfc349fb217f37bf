//! Probe handlers for the orchestrator's HTTP surface.
//!
//! The business API lives with the external collaborator; this service only
//! exposes liveness/readiness with a uniform response envelope.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;

use outdial_core::{DependencyStatus, HealthStatus, ReadinessStatus};

use crate::provider::CallProvider;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Shared state for the probe routes.
#[derive(Clone)]
pub struct AppState {
    pub service_id: &'static str,
    pub version: &'static str,
    pub started_at: Instant,
    pub provider: Arc<dyn CallProvider>,
}

/// Liveness probe.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let status = HealthStatus {
        healthy: true,
        service_id: state.service_id.to_string(),
        version: state.version.to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    };
    (StatusCode::OK, Json(ApiResponse::success(status)))
}

/// Readiness probe: pings the call provider's own health endpoint.
pub async fn ready_check(State(state): State<AppState>) -> Response {
    let status = readiness(state.provider.as_ref()).await;
    if status.ready {
        (StatusCode::OK, Json(ApiResponse::success(status))).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::error("call provider unreachable")),
        )
            .into_response()
    }
}

pub async fn readiness(provider: &dyn CallProvider) -> ReadinessStatus {
    let started = Instant::now();
    let available = provider.health().await.is_ok();

    ReadinessStatus {
        ready: available,
        dependencies: vec![DependencyStatus {
            name: "call-provider".to_string(),
            available,
            latency_ms: Some(started.elapsed().as_millis() as u64),
        }],
    }
}
