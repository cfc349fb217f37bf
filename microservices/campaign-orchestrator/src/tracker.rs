//! Call status tracker.
//!
//! Owns the read side after a batch is dispatched: one cooperative polling
//! loop per active view keeps that view's snapshot of provider state fresh.
//! Ticks fire on a fixed schedule regardless of in-flight completion; each
//! poll carries an issue generation and only the most-recently-issued result
//! is ever applied, so a slow poll can never overwrite a newer one.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::calls::{Call, CallDetail, CallStats};
use crate::campaign::Campaign;
use crate::provider::{CallProvider, ProviderError};

/// Poll periods per view kind. The original cadence is 5s for a campaign
/// detail view and 10s for the dashboard.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub campaign_poll: Duration,
    pub dashboard_poll: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            campaign_poll: Duration::from_secs(5),
            dashboard_poll: Duration::from_secs(10),
        }
    }
}

/// One campaign's calls + stats as of a completed poll.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignSnapshot {
    pub campaign: Campaign,
    pub calls: Vec<Call>,
    pub stats: CallStats,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Default)]
struct ViewState {
    issued: AtomicU64,
    applied: AtomicU64,
    closed: AtomicBool,
    snapshots: DashMap<String, CampaignSnapshot>,
}

impl ViewState {
    /// Replace the view's snapshots wholesale, but only while `generation`
    /// is still the newest applied issue. Returns whether the result was
    /// taken.
    fn apply(&self, generation: u64, snapshots: Vec<CampaignSnapshot>) -> bool {
        if self.closed.load(Ordering::SeqCst) {
            return false;
        }

        let mut current = self.applied.load(Ordering::SeqCst);
        loop {
            if generation <= current {
                // A later-issued poll already landed; this result is stale.
                return false;
            }
            match self
                .applied
                .compare_exchange(current, generation, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }

        for snapshot in &snapshots {
            if let Some(previous) = self.snapshots.get(&snapshot.campaign.id) {
                warn_on_regressions(&previous, snapshot);
            }
        }

        self.snapshots.clear();
        for snapshot in snapshots {
            self.snapshots.insert(snapshot.campaign.id.clone(), snapshot);
        }
        true
    }
}

/// Call statuses only move forward; a backward report from the provider is
/// logged, not silently accepted as normal.
fn warn_on_regressions(previous: &CampaignSnapshot, next: &CampaignSnapshot) {
    for call in &next.calls {
        if let Some(before) = previous.calls.iter().find(|c| c.id == call.id) {
            if !before.status.can_advance_to(call.status) {
                warn!(
                    call_id = %call.id,
                    from = ?before.status,
                    to = ?call.status,
                    "Provider reported a backward call status transition"
                );
            }
        }
    }
}

#[derive(Clone)]
enum ViewTarget {
    Campaign(String),
    AllCampaigns,
}

/// Handle to an active view's polling loop. Dropping the handle stops the
/// loop and discards any poll still in flight.
pub struct ViewHandle {
    view_id: String,
    task: tokio::task::JoinHandle<()>,
    state: Arc<ViewState>,
}

impl ViewHandle {
    pub fn view_id(&self) -> &str {
        &self.view_id
    }

    pub fn snapshot(&self, campaign_id: &str) -> Option<CampaignSnapshot> {
        self.state.snapshots.get(campaign_id).map(|s| s.clone())
    }

    pub fn snapshots(&self) -> Vec<CampaignSnapshot> {
        self.state.snapshots.iter().map(|s| s.clone()).collect()
    }

    /// Generation of the newest applied poll; 0 before the first result.
    pub fn last_applied_generation(&self) -> u64 {
        self.state.applied.load(Ordering::SeqCst)
    }
}

impl Drop for ViewHandle {
    fn drop(&mut self) {
        self.state.closed.store(true, Ordering::SeqCst);
        self.task.abort();
        debug!(view_id = %self.view_id, "View polling stopped");
    }
}

/// Periodic reconciliation of provider call state into per-view snapshots.
pub struct CallStatusTracker {
    provider: Arc<dyn CallProvider>,
    config: TrackerConfig,
}

impl CallStatusTracker {
    pub fn new(provider: Arc<dyn CallProvider>, config: TrackerConfig) -> Self {
        Self { provider, config }
    }

    /// Start polling a single campaign's calls (detail view).
    pub fn watch_campaign(&self, campaign_id: &str) -> ViewHandle {
        self.spawn_view(
            ViewTarget::Campaign(campaign_id.to_string()),
            self.config.campaign_poll,
        )
    }

    /// Start polling all campaigns (dashboard view).
    pub fn watch_dashboard(&self) -> ViewHandle {
        self.spawn_view(ViewTarget::AllCampaigns, self.config.dashboard_poll)
    }

    /// On-demand single-shot fetch of full call detail (event log included).
    /// Failures here are transient and do not disturb any polling loop.
    pub async fn call_detail(&self, call_id: &str) -> Result<CallDetail, ProviderError> {
        self.provider.call_detail(call_id).await
    }

    fn spawn_view(&self, target: ViewTarget, period: Duration) -> ViewHandle {
        let view_id = Uuid::new_v4().to_string();
        let state = Arc::new(ViewState::default());

        let provider = self.provider.clone();
        let loop_state = state.clone();
        let loop_view = view_id.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let generation = loop_state.issued.fetch_add(1, Ordering::SeqCst) + 1;
                let provider = provider.clone();
                let state = loop_state.clone();
                let target = target.clone();
                let view_id = loop_view.clone();

                tokio::spawn(async move {
                    match fetch_target(provider.as_ref(), &target).await {
                        Ok(snapshots) => {
                            if state.apply(generation, snapshots) {
                                debug!(view_id = %view_id, generation, "Applied poll snapshot");
                            }
                        }
                        Err(e) => {
                            // Last-known-good: the previous snapshot stays
                            // in place until a poll succeeds.
                            warn!(view_id = %view_id, error = %e, "Poll failed; keeping last snapshot");
                        }
                    }
                });
            }
        });

        ViewHandle {
            view_id,
            task,
            state,
        }
    }
}

async fn fetch_target(
    provider: &dyn CallProvider,
    target: &ViewTarget,
) -> Result<Vec<CampaignSnapshot>, ProviderError> {
    match target {
        ViewTarget::Campaign(id) => {
            let campaign = provider.get_campaign(id).await?;
            let page = provider.campaign_calls(id).await?;
            Ok(vec![CampaignSnapshot {
                campaign,
                calls: page.calls,
                stats: page.stats,
                fetched_at: Utc::now(),
            }])
        }
        ViewTarget::AllCampaigns => {
            let campaigns = provider.list_campaigns().await?;
            let mut snapshots = Vec::with_capacity(campaigns.len());
            for campaign in campaigns {
                match provider.campaign_calls(&campaign.id).await {
                    Ok(page) => snapshots.push(CampaignSnapshot {
                        campaign,
                        calls: page.calls,
                        stats: page.stats,
                        fetched_at: Utc::now(),
                    }),
                    Err(e) => {
                        warn!(
                            campaign_id = %campaign.id,
                            error = %e,
                            "Skipping campaign in dashboard poll"
                        );
                    }
                }
            }
            Ok(snapshots)
        }
    }
}
