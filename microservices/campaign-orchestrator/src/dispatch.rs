//! Bulk dispatch orchestrator.
//!
//! Takes a validated contact batch plus a campaign/language selection and
//! issues exactly one bulk-call request to the provider. Submission is
//! fire-and-forget: no retry, no backoff; downstream call state is observed
//! later by the tracker.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::calls::BulkCallAck;
use crate::campaign::CampaignService;
use crate::contacts::Contact;
use crate::provider::{CallProvider, ProviderError};
use crate::validation::{validate_batch, BatchError};

/// The `POST /calls/bulk` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCallRequest {
    pub campaign_id: String,
    pub language: String,
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("Campaign {0} is not active")]
    CampaignInactive(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Provider rejections and transport failures, surfaced unchanged. The
    /// operator re-submits; nothing is retried here.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub struct BulkDispatcher {
    provider: Arc<dyn CallProvider>,
    campaigns: CampaignService,
}

impl BulkDispatcher {
    pub fn new(provider: Arc<dyn CallProvider>) -> Self {
        let campaigns = CampaignService::new(provider.clone());
        Self { provider, campaigns }
    }

    /// Submit a contact batch against a campaign.
    ///
    /// The batch must pass validation in full (all-or-nothing); the language
    /// defaults to the campaign's configured one when not supplied. Exactly
    /// one provider request is issued per call to this method.
    pub async fn submit(
        &self,
        campaign_id: &str,
        language: Option<&str>,
        contacts: &[Contact],
    ) -> Result<BulkCallAck, DispatchError> {
        let batch = validate_batch(contacts)?;

        let campaign = self.provider.get_campaign(campaign_id).await?;
        if !campaign.is_active {
            return Err(DispatchError::CampaignInactive(campaign_id.to_string()));
        }

        let language = match language {
            Some(l) if !l.trim().is_empty() => l.trim().to_string(),
            _ => campaign.language.clone(),
        };
        let supported = self.campaigns.supported_languages().await;
        if !supported.iter().any(|l| l == &language) {
            return Err(DispatchError::UnsupportedLanguage(language));
        }

        let request = BulkCallRequest {
            campaign_id: campaign_id.to_string(),
            language,
            contacts: batch,
        };

        info!(
            campaign_id = %request.campaign_id,
            language = %request.language,
            contacts = request.contacts.len(),
            "Submitting bulk call batch"
        );

        let ack = self.provider.initiate_bulk_calls(&request).await?;

        info!(
            campaign_id = %request.campaign_id,
            success_count = ack.success_count,
            fail_count = ack.fail_count,
            "Bulk call batch acknowledged"
        );

        Ok(ack)
    }
}
