use serde::{Deserialize, Serialize};
use std::env;

use crate::defaults::MessageDefaults;
use crate::error::{Result, WebhookError};

/// Everything needed to build a [`crate::Client`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub webhook: String,
    #[serde(default)]
    pub message_defaults: MessageDefaults,
}

impl ClientConfig {
    pub const WEBHOOK_VAR: &'static str = "BEARYCHAT_WEBHOOK";
    pub const DEFAULTS_VAR: &'static str = "BEARYCHAT_MESSAGE_DEFAULTS";

    /// Reads the webhook and an optional JSON object of message defaults,
    /// preferring values baked in at compile time.
    pub fn from_env() -> Result<Self> {
        let webhook = option_env!("BEARYCHAT_WEBHOOK")
            .map(String::from)
            .or_else(|| env::var(Self::WEBHOOK_VAR).ok())
            .ok_or_else(|| {
                WebhookError::new("missing_webhook").push_str(format!(
                    "{} not set at compile time or runtime",
                    Self::WEBHOOK_VAR
                ))
            })?;

        let message_defaults = match option_env!("BEARYCHAT_MESSAGE_DEFAULTS")
            .map(String::from)
            .or_else(|| env::var(Self::DEFAULTS_VAR).ok())
        {
            Some(raw) if !raw.trim().is_empty() => Self::parse_defaults(&raw)?,
            _ => MessageDefaults::default(),
        };

        Ok(Self {
            webhook,
            message_defaults,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    fn parse_defaults(raw: &str) -> Result<MessageDefaults> {
        serde_json::from_str(raw).map_err(|e| {
            WebhookError::new("invalid_message_defaults")
                .push_str(format!("{} must be a JSON object", Self::DEFAULTS_VAR))
                .push_std(e)
        })
    }
}
