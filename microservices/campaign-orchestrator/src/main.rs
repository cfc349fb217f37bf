//! Campaign Orchestrator Microservice
//!
//! Bulk outbound IVR call campaigns driven through an external call
//! provider:
//! - Contact list ingestion (CSV)
//! - Phone number validation (E.164, all-or-nothing batches)
//! - Campaign management with digit-keyed IVR actions
//! - One-shot bulk call dispatch
//! - Call status tracking via polling views
//! - Cross-campaign dashboard aggregation

#![allow(dead_code)]

use outdial_core::{HealthStatus, MicroserviceRuntime, OutdialService, ReadinessStatus, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod calls;
mod campaign;
mod contacts;
mod dashboard;
mod dispatch;
mod handlers;
mod language;
mod provider;
mod tracker;
mod validation;


pub use campaign::CampaignService;
pub use dispatch::BulkDispatcher;
pub use provider::{CallProvider, HttpCallProvider};
pub use tracker::CallStatusTracker;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    info!("Starting Campaign Orchestrator");

    let config = OrchestratorConfig::from_env()?;
    let service = Arc::new(CampaignOrchestratorService::new(config));
    MicroserviceRuntime::run(service).await
}

/// Campaign orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub api_base_url: String,
    pub http_bind: String,
    pub campaign_poll_secs: u64,
    pub dashboard_poll_secs: u64,
}

impl OrchestratorConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080/api".to_string()),
            http_bind: std::env::var("HTTP_BIND").unwrap_or_else(|_| "0.0.0.0:8081".to_string()),
            campaign_poll_secs: std::env::var("POLL_CAMPAIGN_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|e| {
                    outdial_core::OutdialError::Config(format!("Invalid POLL_CAMPAIGN_SECS: {}", e))
                })?,
            dashboard_poll_secs: std::env::var("POLL_DASHBOARD_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|e| {
                    outdial_core::OutdialError::Config(format!("Invalid POLL_DASHBOARD_SECS: {}", e))
                })?,
        })
    }

    pub fn tracker_config(&self) -> tracker::TrackerConfig {
        tracker::TrackerConfig {
            campaign_poll: Duration::from_secs(self.campaign_poll_secs),
            dashboard_poll: Duration::from_secs(self.dashboard_poll_secs),
        }
    }
}

/// Campaign orchestrator service
pub struct CampaignOrchestratorService {
    config: OrchestratorConfig,
    provider: Arc<dyn CallProvider>,
    campaigns: CampaignService,
    dispatcher: BulkDispatcher,
    tracker: CallStatusTracker,
    start_time: std::time::Instant,
}

impl CampaignOrchestratorService {
    pub fn new(config: OrchestratorConfig) -> Self {
        let provider: Arc<dyn CallProvider> =
            Arc::new(HttpCallProvider::new(&config.api_base_url));
        let campaigns = CampaignService::new(provider.clone());
        let dispatcher = BulkDispatcher::new(provider.clone());
        let tracker = CallStatusTracker::new(provider.clone(), config.tracker_config());

        Self {
            config,
            provider,
            campaigns,
            dispatcher,
            tracker,
            start_time: std::time::Instant::now(),
        }
    }
}

#[async_trait::async_trait]
impl OutdialService for CampaignOrchestratorService {
    fn service_id(&self) -> &'static str {
        "campaign-orchestrator"
    }

    async fn health(&self) -> HealthStatus {
        HealthStatus {
            healthy: true,
            service_id: self.service_id().to_string(),
            version: self.version().to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    async fn ready(&self) -> ReadinessStatus {
        handlers::readiness(self.provider.as_ref()).await
    }

    async fn shutdown(&self) -> Result<()> {
        info!(api_base_url = %self.config.api_base_url, "Shutting down campaign orchestrator");
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        info!(
            bind = %self.config.http_bind,
            api_base_url = %self.config.api_base_url,
            "Starting campaign orchestrator"
        );

        let state = handlers::AppState {
            service_id: self.service_id(),
            version: self.version(),
            started_at: self.start_time,
            provider: self.provider.clone(),
        };

        let app = axum::Router::new()
            .route("/health", axum::routing::get(handlers::health_check))
            .route("/ready", axum::routing::get(handlers::ready_check))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind(&self.config.http_bind).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
