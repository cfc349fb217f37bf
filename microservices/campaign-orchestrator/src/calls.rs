//! Call and call-log models.
//!
//! Calls are created by the dispatcher but owned by the external call
//! provider afterwards: status and field mutations originate there and are
//! only observed by this service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider-driven call lifecycle. Progression is strictly forward:
/// `pending -> initiated -> in-progress -> {completed | failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Pending,
    Initiated,
    #[serde(rename = "in-progress")]
    InProgress,
    Completed,
    Failed,
}

impl CallStatus {
    /// Position along the forward progression. `Completed` and `Failed`
    /// share the terminal rank.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Initiated => 1,
            Self::InProgress => 2,
            Self::Completed | Self::Failed => 3,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether observing `next` after `self` respects the monotonic
    /// progression. Staying put is always allowed; terminal states never
    /// advance.
    pub fn can_advance_to(&self, next: CallStatus) -> bool {
        *self == next || (!self.is_terminal() && next.rank() > self.rank())
    }
}

/// An individual outbound call, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub id: String,
    pub campaign_id: String,
    pub phone_number: String,
    #[serde(default)]
    pub customer_name: String,
    pub language: String,
    pub status: CallStatus,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_call_sid: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Append-only event timeline entry for a call (digit presses, forwards,
/// provider errors).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallLog {
    pub id: String,
    pub call_id: String,
    pub event: String,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_input: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-campaign call counters as reported by `GET /campaigns/{id}/calls`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStats {
    pub total: u64,
    pub pending: u64,
    pub initiated: u64,
    #[serde(default)]
    pub in_progress: u64,
    pub completed: u64,
    pub failed: u64,
}

/// The `GET /campaigns/{id}/calls` response shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignCalls {
    pub calls: Vec<Call>,
    pub stats: CallStats,
}

/// Full call detail including its event log (`GET /calls/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallDetail {
    #[serde(flatten)]
    pub call: Call,
    #[serde(default)]
    pub call_logs: Vec<CallLog>,
}

/// Per-batch acknowledgement returned by `POST /calls/bulk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCallAck {
    pub message: String,
    pub success_count: u32,
    pub fail_count: u32,
    #[serde(default)]
    pub call_ids: Vec<String>,
}
