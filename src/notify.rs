//! Telegram operator notifications
//!
//! Reports order outcomes to a Telegram chat via the plain Bot API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{Result, TradehookError};
use crate::signing::credentials::require_env;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Outbound operator notifications.
///
/// Delivery is fire-and-forget: `notify` never fails the caller, whatever
/// happens on the wire.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str);
}

/// Telegram notification client
#[derive(Clone, Debug)]
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Self {
        Self {
            client: Client::new(),
            api_base: TELEGRAM_API_BASE.to_string(),
            token,
            chat_id,
        }
    }

    /// Load the bot token and chat id from environment variables, reporting
    /// every missing variable at once.
    pub fn from_env() -> Result<Self> {
        let mut missing = Vec::new();
        let token = require_env("TELEGRAM_TOKEN", &mut missing);
        let chat_id = require_env("TELEGRAM_CHAT_ID", &mut missing);

        if !missing.is_empty() {
            return Err(TradehookError::Config(config::ConfigError::Message(
                format!("missing environment variables: {}", missing.join(", ")),
            )));
        }

        Ok(Self::new(token, chat_id))
    }

    fn send_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }

    /// Send a text message to the configured chat
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let resp = self
            .client
            .get(self.send_url())
            .query(&[("chat_id", self.chat_id.as_str()), ("text", text)])
            .send()
            .await
            .map_err(|e| {
                // The URL embeds the bot token, keep it out of the error.
                TradehookError::TransportFailure(format!(
                    "Telegram request failed: {}",
                    e.without_url()
                ))
            })?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let ok = status.is_success()
            && serde_json::from_str::<Value>(&body)
                .map(|v| v.get("ok").and_then(Value::as_bool).unwrap_or(false))
                .unwrap_or(false);

        if ok {
            debug!("Telegram notification sent successfully");
            Ok(())
        } else {
            Err(TradehookError::TransportFailure(format!(
                "Telegram API returned {status}: {body}"
            )))
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) {
        if let Err(e) = self.send_message(text).await {
            error!("Failed to send Telegram notification: {e}");
        }
    }
}
