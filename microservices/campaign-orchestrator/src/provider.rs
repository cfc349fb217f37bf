//! External call-provider boundary.
//!
//! Everything the orchestrator needs from the outside world (campaign
//! storage, call initiation, status reads) is reached through the
//! [`CallProvider`] trait. The HTTP implementation is an explicitly
//! constructed value with its own base URL and client, so lifetimes are
//! bounded and tests can substitute a double.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::calls::{BulkCallAck, CallDetail, CampaignCalls};
use crate::campaign::{Campaign, CreateCampaignRequest, UpdateCampaignRequest};
use crate::dispatch::BulkCallRequest;

/// Provider-side failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider rejected the request; the message is the provider's own
    /// error text, surfaced verbatim.
    #[error("{0}")]
    Rejected(String),

    /// The provider could not be reached at all.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// The collaborator contract consumed by the orchestration core.
#[async_trait]
pub trait CallProvider: Send + Sync + 'static {
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, ProviderError>;
    async fn get_campaign(&self, id: &str) -> Result<Campaign, ProviderError>;
    async fn create_campaign(&self, request: &CreateCampaignRequest) -> Result<Campaign, ProviderError>;
    async fn update_campaign(
        &self,
        id: &str,
        request: &UpdateCampaignRequest,
    ) -> Result<Campaign, ProviderError>;
    async fn delete_campaign(&self, id: &str) -> Result<(), ProviderError>;

    /// Current call list + statistics for a campaign.
    async fn campaign_calls(&self, id: &str) -> Result<CampaignCalls, ProviderError>;

    /// One bulk-call request per submission, carrying the whole batch.
    async fn initiate_bulk_calls(&self, request: &BulkCallRequest) -> Result<BulkCallAck, ProviderError>;

    /// Full call detail including its event log.
    async fn call_detail(&self, id: &str) -> Result<CallDetail, ProviderError>;

    async fn languages(&self) -> Result<Vec<String>, ProviderError>;

    /// Liveness probe; no business semantics.
    async fn health(&self) -> Result<(), ProviderError>;
}

/// HTTP implementation of [`CallProvider`] against the collaborator's REST
/// API.
pub struct HttpCallProvider {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct LanguagesBody {
    languages: Vec<String>,
}

impl HttpCallProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ProviderError> {
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ProviderError::Transport(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        // Collaborator errors arrive as {"error": "..."}; anything else is
        // passed through as-is.
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.error,
            Err(_) if !body.is_empty() => body,
            Err(_) => status.to_string(),
        };
        Err(ProviderError::Rejected(message))
    }
}

#[async_trait]
impl CallProvider for HttpCallProvider {
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, ProviderError> {
        self.send(self.client.get(self.url("/campaigns"))).await
    }

    async fn get_campaign(&self, id: &str) -> Result<Campaign, ProviderError> {
        self.send(self.client.get(self.url(&format!("/campaigns/{id}"))))
            .await
    }

    async fn create_campaign(&self, request: &CreateCampaignRequest) -> Result<Campaign, ProviderError> {
        self.send(self.client.post(self.url("/campaigns")).json(request))
            .await
    }

    async fn update_campaign(
        &self,
        id: &str,
        request: &UpdateCampaignRequest,
    ) -> Result<Campaign, ProviderError> {
        self.send(
            self.client
                .put(self.url(&format!("/campaigns/{id}")))
                .json(request),
        )
        .await
    }

    async fn delete_campaign(&self, id: &str) -> Result<(), ProviderError> {
        let _: serde_json::Value = self
            .send(self.client.delete(self.url(&format!("/campaigns/{id}"))))
            .await?;
        Ok(())
    }

    async fn campaign_calls(&self, id: &str) -> Result<CampaignCalls, ProviderError> {
        self.send(self.client.get(self.url(&format!("/campaigns/{id}/calls"))))
            .await
    }

    async fn initiate_bulk_calls(&self, request: &BulkCallRequest) -> Result<BulkCallAck, ProviderError> {
        self.send(self.client.post(self.url("/calls/bulk")).json(request))
            .await
    }

    async fn call_detail(&self, id: &str) -> Result<CallDetail, ProviderError> {
        self.send(self.client.get(self.url(&format!("/calls/{id}"))))
            .await
    }

    async fn languages(&self) -> Result<Vec<String>, ProviderError> {
        let body: LanguagesBody = self.send(self.client.get(self.url("/languages"))).await?;
        Ok(body.languages)
    }

    async fn health(&self) -> Result<(), ProviderError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::Rejected(response.status().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let provider = HttpCallProvider::new("http://localhost:8080/api/");
        assert_eq!(provider.base_url(), "http://localhost:8080/api");
        assert_eq!(provider.url("/campaigns"), "http://localhost:8080/api/campaigns");
    }
}
