//! Cross-campaign dashboard aggregation.
//!
//! A pure reducer over the tracker's current snapshots; safe to recompute on
//! every poll tick.

use serde::Serialize;

use crate::calls::Call;
use crate::tracker::CampaignSnapshot;

/// Dashboard shows the five most recent calls across all campaigns.
pub const RECENT_CALLS_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_campaigns: usize,
    pub active_campaigns: usize,
    pub total_calls: u64,
    pub pending_calls: u64,
    /// Initiated and in-progress statuses merged: calls the provider is
    /// actively working.
    pub in_progress_calls: u64,
    pub completed_calls: u64,
    pub failed_calls: u64,
    /// completed / total, 0.0 when there are no calls.
    pub success_rate: f64,
    pub recent_calls: Vec<Call>,
}

impl DashboardStats {
    pub fn aggregate(snapshots: &[CampaignSnapshot]) -> Self {
        let mut total_calls = 0u64;
        let mut pending_calls = 0u64;
        let mut in_progress_calls = 0u64;
        let mut completed_calls = 0u64;
        let mut failed_calls = 0u64;
        let mut all_calls: Vec<Call> = Vec::new();

        for snapshot in snapshots {
            total_calls += snapshot.stats.total;
            pending_calls += snapshot.stats.pending;
            in_progress_calls += snapshot.stats.initiated + snapshot.stats.in_progress;
            completed_calls += snapshot.stats.completed;
            failed_calls += snapshot.stats.failed;
            all_calls.extend(snapshot.calls.iter().cloned());
        }

        all_calls.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all_calls.truncate(RECENT_CALLS_LIMIT);

        let success_rate = if total_calls > 0 {
            completed_calls as f64 / total_calls as f64
        } else {
            0.0
        };

        Self {
            total_campaigns: snapshots.len(),
            active_campaigns: snapshots.iter().filter(|s| s.campaign.is_active).count(),
            total_calls,
            pending_calls,
            in_progress_calls,
            completed_calls,
            failed_calls,
            success_rate,
            recent_calls: all_calls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::{CallStats, CallStatus};
    use crate::campaign::Campaign;
    use chrono::{Duration, Utc};

    fn snapshot(id: &str, active: bool, stats: CallStats, call_count: usize) -> CampaignSnapshot {
        let now = Utc::now();
        CampaignSnapshot {
            campaign: Campaign {
                id: id.to_string(),
                name: format!("campaign {id}"),
                description: "d".to_string(),
                language: "en".to_string(),
                intro_text: "hello".to_string(),
                actions: vec![],
                is_active: active,
                created_at: now,
                updated_at: now,
            },
            calls: (0..call_count)
                .map(|i| Call {
                    id: format!("{id}-{i}"),
                    campaign_id: id.to_string(),
                    phone_number: "+14155550100".to_string(),
                    customer_name: String::new(),
                    language: "en".to_string(),
                    status: CallStatus::Completed,
                    duration: Some(30),
                    error_message: None,
                    provider_call_sid: None,
                    created_at: now - Duration::seconds(i as i64),
                    updated_at: now,
                })
                .collect(),
            stats,
            fetched_at: now,
        }
    }

    #[test]
    fn totals_sum_across_campaigns_and_merge_in_progress() {
        let snapshots = vec![
            snapshot(
                "a",
                true,
                CallStats {
                    total: 4,
                    pending: 1,
                    initiated: 1,
                    in_progress: 1,
                    completed: 1,
                    failed: 0,
                },
                0,
            ),
            snapshot(
                "b",
                false,
                CallStats {
                    total: 6,
                    pending: 0,
                    initiated: 2,
                    in_progress: 0,
                    completed: 2,
                    failed: 2,
                },
                0,
            ),
        ];

        let stats = DashboardStats::aggregate(&snapshots);
        assert_eq!(stats.total_campaigns, 2);
        assert_eq!(stats.active_campaigns, 1);
        assert_eq!(stats.total_calls, 10);
        assert_eq!(stats.pending_calls, 1);
        assert_eq!(stats.in_progress_calls, 4);
        assert_eq!(stats.completed_calls, 3);
        assert_eq!(stats.failed_calls, 2);
    }

    #[test]
    fn success_rate_never_divides_by_zero() {
        let zero_completed = vec![snapshot(
            "a",
            true,
            CallStats {
                total: 10,
                completed: 0,
                ..CallStats::default()
            },
            0,
        )];
        assert_eq!(DashboardStats::aggregate(&zero_completed).success_rate, 0.0);

        let three_of_four = vec![snapshot(
            "a",
            true,
            CallStats {
                total: 4,
                completed: 3,
                ..CallStats::default()
            },
            0,
        )];
        assert_eq!(DashboardStats::aggregate(&three_of_four).success_rate, 0.75);

        assert_eq!(DashboardStats::aggregate(&[]).success_rate, 0.0);
    }

    #[test]
    fn recent_calls_are_newest_first_and_bounded() {
        let snapshots = vec![snapshot("a", true, CallStats::default(), 8)];
        let stats = DashboardStats::aggregate(&snapshots);

        assert_eq!(stats.recent_calls.len(), RECENT_CALLS_LIMIT);
        // Newest first: ids a-0, a-1, ... were created newest to oldest.
        let ids: Vec<&str> = stats.recent_calls.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a-0", "a-1", "a-2", "a-3", "a-4"]);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let snapshots = vec![
            snapshot(
                "a",
                true,
                CallStats {
                    total: 5,
                    pending: 2,
                    initiated: 1,
                    in_progress: 0,
                    completed: 1,
                    failed: 1,
                },
                3,
            ),
            snapshot("b", false, CallStats::default(), 2),
        ];

        let first = DashboardStats::aggregate(&snapshots);
        let second = DashboardStats::aggregate(&snapshots);
        assert_eq!(first, second);
    }
}
