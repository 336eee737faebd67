//! Telegram Bot API transport
//!
//! Long polling through `getUpdates`, replies through `sendMessage`.

use super::{GatewayError, Inbound, UpdateSource};
use crate::runtime::{GatewaySendError, MessageGateway};
use crate::state_machine::{Event, UserId};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Server-side wait for `getUpdates`
const LONG_POLL_TIMEOUT_SECS: u64 = 30;

/// Client-side request timeout, longer than the long poll
const REQUEST_TIMEOUT: Duration = Duration::from_secs(LONG_POLL_TIMEOUT_SECS + 10);

// -- Telegram API response types --

#[derive(Debug, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgUpdate {
    update_id: i64,
    message: Option<TgMessage>,
}

#[derive(Debug, Deserialize)]
struct TgMessage {
    chat: TgChat,
    from: Option<TgUser>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgUser {
    id: i64,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgChat {
    id: i64,
}

impl TgUpdate {
    /// Text messages become dialog events; everything else is skipped.
    ///
    /// Messages without a sender (anonymous posts) belong to the chat itself.
    fn into_inbound(self, bot_username: Option<&str>) -> Option<Inbound> {
        let message = self.message?;
        let text = message.text?;
        let chat_id = message.chat.id;
        let sender_id = message.from.map_or(chat_id, |user| user.id);
        Some(Inbound {
            user_id: UserId::new(chat_id, sender_id),
            event: Event::from_text(&text, bot_username),
        })
    }
}

/// Bot API client
#[derive(Clone)]
pub struct TelegramGateway {
    client: Client,
    api_base: String,
    bot_token: String,
}

impl TelegramGateway {
    pub fn new(api_base: impl Into<String>, bot_token: impl Into<String>) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
        })
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token)
    }

    /// Start receiving updates from the beginning of the pending queue
    pub fn updates(&self) -> TelegramUpdates {
        TelegramUpdates {
            api: self.clone(),
            offset: None,
            poll_timeout_secs: LONG_POLL_TIMEOUT_SECS,
            me: None,
        }
    }

    /// This bot's own account, used to tell which commands are addressed to it
    async fn get_me(&self) -> Result<TgUser, GatewayError> {
        let resp: TelegramResponse<TgUser> = self
            .client
            .post(self.api_url("getMe"))
            .send()
            .await?
            .json()
            .await?;

        match resp.result {
            Some(me) if resp.ok => {
                tracing::info!(bot_id = me.id, username = ?me.username, "Bot identified");
                Ok(me)
            }
            _ => Err(GatewayError::Api(
                resp.description.unwrap_or_else(|| "getMe failed".to_string()),
            )),
        }
    }

    async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<TgUpdate>, GatewayError> {
        let mut body = json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }

        let resp: TelegramResponse<Vec<TgUpdate>> = self
            .client
            .post(self.api_url("getUpdates"))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if !resp.ok {
            return Err(GatewayError::Api(
                resp.description.unwrap_or_else(|| "getUpdates failed".to_string()),
            ));
        }
        Ok(resp.result.unwrap_or_default())
    }
}

#[async_trait]
impl MessageGateway for TelegramGateway {
    async fn send(&self, user_id: UserId, text: &str) -> Result<(), GatewaySendError> {
        let body = json!({
            "chat_id": user_id.chat_id,
            "text": text,
        });
        // Request URLs carry the bot token
        let send_error =
            |e: reqwest::Error| GatewaySendError::new(user_id, e.without_url().to_string());

        let resp: TelegramResponse<serde_json::Value> = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(send_error)?
            .json()
            .await
            .map_err(send_error)?;

        if !resp.ok {
            return Err(GatewaySendError::new(
                user_id,
                resp.description.unwrap_or_else(|| "sendMessage failed".to_string()),
            ));
        }
        Ok(())
    }
}

/// Update stream that acknowledges everything it has returned
pub struct TelegramUpdates {
    api: TelegramGateway,
    offset: Option<i64>,
    poll_timeout_secs: u64,
    /// Filled by the first successful `getMe`
    me: Option<TgUser>,
}

#[async_trait]
impl UpdateSource for TelegramUpdates {
    async fn next_batch(&mut self) -> Result<Vec<Inbound>, GatewayError> {
        if self.me.is_none() {
            self.me = Some(self.api.get_me().await?);
        }
        let bot_username = self.me.as_ref().and_then(|me| me.username.clone());

        let updates = self.api.get_updates(self.offset, self.poll_timeout_secs).await?;

        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            self.offset = Some(last + 1);
        }
        let received = updates.len();
        let inbound: Vec<Inbound> = updates
            .into_iter()
            .filter_map(|u| u.into_inbound(bot_username.as_deref()))
            .collect();
        if received > 0 {
            tracing::debug!(received, routed = inbound.len(), "Received updates");
        }
        Ok(inbound)
    }
}
