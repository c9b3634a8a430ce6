//! Telegram Bot API client.
//!
//! `sendMessage` is the delivery call the fanout depends on (behind the
//! [`MessageSender`] trait); `getUpdates` long-polling feeds the command
//! surface in the `bot` module.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

const BOT_API_BASE: &str = "https://api.telegram.org";

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("delivery request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("telegram api error: {0}")]
    Api(String),
}

/// One per-recipient send. Failure for one recipient carries no meaning for
/// any other; callers decide how to aggregate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError>;
}

/// Bot API response envelope. `result` is only trusted when `ok` is true.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    retry_after: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    bot_token: String,
    base_url: String,
}

impl TelegramClient {
    pub fn new(bot_token: impl Into<String>) -> Self {
        let http = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            bot_token: bot_token.into(),
            base_url: BOT_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API root. Used by tests to target a
    /// local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.bot_token, method)
    }

    /// Long-poll for updates after `offset`. The per-request timeout is
    /// widened past the poll timeout so the two don't race.
    #[instrument(skip(self))]
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        poll_timeout_secs: u64,
    ) -> Result<Vec<TelegramUpdate>, DeliveryError> {
        let mut body = json!({ "timeout": poll_timeout_secs });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }

        let response = self
            .http
            .post(self.method_url("getUpdates"))
            .timeout(Duration::from_secs(poll_timeout_secs + 10))
            .json(&body)
            .send()
            .await?;

        let envelope: ApiEnvelope<Vec<TelegramUpdate>> = response.json().await?;
        check_envelope(envelope)
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    #[instrument(skip(self, text))]
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError> {
        debug!(chat_id, "sending message");

        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?;

        let envelope: ApiEnvelope<serde_json::Value> = response.json().await?;
        check_envelope(envelope).map(|_| ())
    }
}

fn check_envelope<T>(envelope: ApiEnvelope<T>) -> Result<T, DeliveryError> {
    if envelope.ok
        && let Some(result) = envelope.result
    {
        return Ok(result);
    }

    if let Some(retry_after) = envelope.parameters.and_then(|p| p.retry_after) {
        return Err(DeliveryError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    Err(DeliveryError::Api(
        envelope
            .description
            .unwrap_or_else(|| "unknown telegram api error".to_string()),
    ))
}
