//! Campaign configuration model and service.
//!
//! A campaign holds the static IVR configuration: language, intro text and
//! an ordered digit-keyed menu. Persistence lives with the external
//! collaborator; this service validates configuration before it leaves the
//! process.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::language::{self, strings_for};
use crate::provider::{CallProvider, ProviderError};
use crate::validation::{is_valid_action_key, is_valid_e164, normalize_phone};

/// A digit-keyed IVR menu action. Tagged so that an action is either an
/// information playback or a forward, never an ambiguous mix of both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action_type", rename_all = "lowercase")]
pub enum IvrAction {
    /// Play information: literal text to speak, or a URL to a pre-recorded
    /// audio asset.
    Information {
        action_input: String,
        message: String,
    },
    /// Forward the call to a destination number.
    Forward {
        action_input: String,
        forward_phone: String,
    },
}

impl IvrAction {
    /// The single digit that selects this action.
    pub fn action_input(&self) -> &str {
        match self {
            Self::Information { action_input, .. } => action_input,
            Self::Forward { action_input, .. } => action_input,
        }
    }

    /// Information messages with a URL scheme prefix reference a
    /// pre-recorded audio asset rather than text to speak.
    pub fn is_audio_url(&self) -> bool {
        match self {
            Self::Information { message, .. } => {
                message.starts_with("http://") || message.starts_with("https://")
            }
            Self::Forward { .. } => false,
        }
    }
}

/// A marketing campaign with its IVR menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub description: String,
    pub language: String,
    pub intro_text: String,
    #[serde(default)]
    pub actions: Vec<IvrAction>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCampaignRequest {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub language: Option<String>,
    pub intro_text: String,
    #[serde(default)]
    pub actions: Vec<IvrAction>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Partial update: only supplied fields are sent to the collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCampaignRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<IvrAction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("IVR action key must be a single digit, got {0:?}")]
    InvalidActionKey(String),

    #[error("Duplicate IVR action key: {0}")]
    DuplicateActionKey(String),

    #[error("Information action for key {0} has no message")]
    MissingMessage(String),

    #[error("Forward action for key {key} has an invalid destination: {phone}")]
    InvalidForwardNumber { key: String, phone: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

const DEFAULT_LANGUAGE: &str = "en";

/// Campaign configuration service over the injected provider.
pub struct CampaignService {
    provider: Arc<dyn CallProvider>,
}

impl CampaignService {
    pub fn new(provider: Arc<dyn CallProvider>) -> Self {
        Self { provider }
    }

    /// Supported language codes, falling back to the built-in catalog when
    /// the provider cannot be reached.
    pub async fn supported_languages(&self) -> Vec<String> {
        match self.provider.languages().await {
            Ok(languages) => languages,
            Err(e) => {
                warn!(error = %e, "Failed to fetch supported languages, using built-in catalog");
                language::fallback_languages()
            }
        }
    }

    pub async fn create(&self, mut request: CreateCampaignRequest) -> Result<Campaign, CampaignError> {
        require_non_empty(&request.name, "name")?;
        require_non_empty(&request.description, "description")?;
        require_non_empty(&request.intro_text, "intro_text")?;

        let language = request
            .language
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        self.check_language(&language).await?;

        validate_actions(&request.actions)?;

        request.language = Some(language);
        request.is_active = Some(request.is_active.unwrap_or(true));

        Ok(self.provider.create_campaign(&request).await?)
    }

    pub async fn update(&self, id: &str, request: UpdateCampaignRequest) -> Result<Campaign, CampaignError> {
        if let Some(name) = &request.name {
            require_non_empty(name, "name")?;
        }
        if let Some(description) = &request.description {
            require_non_empty(description, "description")?;
        }
        if let Some(intro_text) = &request.intro_text {
            require_non_empty(intro_text, "intro_text")?;
        }
        if let Some(language) = &request.language {
            self.check_language(language).await?;
        }
        if let Some(actions) = &request.actions {
            validate_actions(actions)?;
        }

        Ok(self.provider.update_campaign(id, &request).await?)
    }

    /// Single-field activation toggle; never touches the action list.
    pub async fn set_active(&self, id: &str, active: bool) -> Result<Campaign, CampaignError> {
        let request = UpdateCampaignRequest {
            is_active: Some(active),
            ..UpdateCampaignRequest::default()
        };
        Ok(self.provider.update_campaign(id, &request).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Campaign, CampaignError> {
        Ok(self.provider.get_campaign(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<Campaign>, CampaignError> {
        Ok(self.provider.list_campaigns().await?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), CampaignError> {
        Ok(self.provider.delete_campaign(id).await?)
    }

    async fn check_language(&self, language: &str) -> Result<(), CampaignError> {
        let supported = self.supported_languages().await;
        if supported.iter().any(|l| l == language) {
            Ok(())
        } else {
            Err(CampaignError::UnsupportedLanguage(language.to_string()))
        }
    }
}

fn require_non_empty(value: &str, field: &'static str) -> Result<(), CampaignError> {
    if value.trim().is_empty() {
        Err(CampaignError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Validate an IVR action list: single-digit keys, unique within the
/// campaign, information actions carry a message, forward destinations are
/// E.164.
pub fn validate_actions(actions: &[IvrAction]) -> Result<(), CampaignError> {
    let mut seen: HashSet<&str> = HashSet::new();

    for action in actions {
        let key = action.action_input();
        if !is_valid_action_key(key) {
            return Err(CampaignError::InvalidActionKey(key.to_string()));
        }
        if !seen.insert(key) {
            return Err(CampaignError::DuplicateActionKey(key.to_string()));
        }

        match action {
            IvrAction::Information { message, .. } => {
                if message.trim().is_empty() {
                    return Err(CampaignError::MissingMessage(key.to_string()));
                }
            }
            IvrAction::Forward { forward_phone, .. } => {
                if !is_valid_e164(&normalize_phone(forward_phone)) {
                    return Err(CampaignError::InvalidForwardNumber {
                        key: key.to_string(),
                        phone: forward_phone.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

/// Render the spoken menu for a campaign, for operator preview: intro text
/// followed by one prompt per action in menu order.
pub fn menu_script(campaign: &Campaign) -> String {
    let strings = strings_for(&campaign.language);
    let mut parts = vec![campaign.intro_text.trim().to_string()];

    for action in &campaign.actions {
        let key = action.action_input();
        let prompt = match action {
            IvrAction::Forward { .. } => {
                format!("{} {} {}", strings.press, key, strings.to_speak_with_agent)
            }
            IvrAction::Information { message, .. } => {
                if action.is_audio_url() || message.trim().is_empty() {
                    format!("{} {} {}", strings.press, key, strings.for_info)
                } else {
                    // First few words of the message serve as the description.
                    let words: Vec<&str> = message.split_whitespace().take(5).collect();
                    let ellipsis = if message.split_whitespace().count() > 5 {
                        "..."
                    } else {
                        ""
                    };
                    format!("{} {} - {}{}", strings.press, key, words.join(" "), ellipsis)
                }
            }
        };
        parts.push(prompt);
    }

    parts.join(". ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(key: &str, message: &str) -> IvrAction {
        IvrAction::Information {
            action_input: key.to_string(),
            message: message.to_string(),
        }
    }

    fn forward(key: &str, phone: &str) -> IvrAction {
        IvrAction::Forward {
            action_input: key.to_string(),
            forward_phone: phone.to_string(),
        }
    }

    fn campaign_with(actions: Vec<IvrAction>) -> Campaign {
        Campaign {
            id: "c1".to_string(),
            name: "Spring promo".to_string(),
            description: "Spring promotion".to_string(),
            language: "en".to_string(),
            intro_text: "Welcome to the spring promotion.".to_string(),
            actions,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn duplicate_action_keys_are_rejected() {
        let actions = vec![info("5", "About the offer"), forward("5", "+14155550100")];
        assert!(matches!(
            validate_actions(&actions),
            Err(CampaignError::DuplicateActionKey(k)) if k == "5"
        ));
    }

    #[test]
    fn action_keys_must_be_single_digits() {
        assert!(matches!(
            validate_actions(&[info("12", "x")]),
            Err(CampaignError::InvalidActionKey(_))
        ));
        assert!(matches!(
            validate_actions(&[info("", "x")]),
            Err(CampaignError::InvalidActionKey(_))
        ));
    }

    #[test]
    fn information_actions_need_a_message() {
        assert!(matches!(
            validate_actions(&[info("1", "  ")]),
            Err(CampaignError::MissingMessage(k)) if k == "1"
        ));
    }

    #[test]
    fn forward_destinations_must_be_e164() {
        assert!(matches!(
            validate_actions(&[forward("2", "555-0100")]),
            Err(CampaignError::InvalidForwardNumber { key, .. }) if key == "2"
        ));
        assert!(validate_actions(&[forward("2", "+1 (415) 555-0100")]).is_ok());
    }

    #[test]
    fn valid_action_lists_pass() {
        let actions = vec![
            info("1", "Our product details"),
            info("2", "https://cdn.example.com/offer.mp3"),
            forward("3", "+14155550100"),
        ];
        assert!(validate_actions(&actions).is_ok());
        assert!(actions[1].is_audio_url());
        assert!(!actions[0].is_audio_url());
    }

    #[test]
    fn action_wire_format_is_tagged() {
        let action = forward("3", "+14155550100");
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["action_type"], "forward");
        assert_eq!(json["action_input"], "3");
        assert_eq!(json["forward_phone"], "+14155550100");

        let parsed: IvrAction = serde_json::from_value(serde_json::json!({
            "action_type": "information",
            "action_input": "1",
            "message": "Hello"
        }))
        .unwrap();
        assert_eq!(parsed, info("1", "Hello"));
    }

    #[test]
    fn menu_script_renders_intro_and_prompts() {
        let campaign = campaign_with(vec![
            info("1", "our brand new product lineup for spring"),
            forward("2", "+14155550100"),
        ]);
        let script = menu_script(&campaign);
        assert!(script.starts_with("Welcome to the spring promotion."));
        assert!(script.contains("Press 1 - our brand new product lineup..."));
        assert!(script.contains("Press 2 to speak with an agent"));
    }

    #[test]
    fn menu_script_uses_generic_prompt_for_audio_urls() {
        let campaign = campaign_with(vec![info("1", "https://cdn.example.com/promo.mp3")]);
        let script = menu_script(&campaign);
        assert!(script.contains("Press 1 for more information"));
    }

    #[test]
    fn menu_script_falls_back_to_english_for_unknown_language() {
        let mut campaign = campaign_with(vec![forward("2", "+14155550100")]);
        campaign.language = "xx".to_string();
        assert!(menu_script(&campaign).contains("Press 2 to speak with an agent"));
    }
}
