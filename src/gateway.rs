//! Chat transport
//!
//! Pulls inbound updates from the transport and routes them to the dialog
//! manager. Outbound delivery goes through `runtime::MessageGateway`.

mod telegram;

pub use telegram::{TelegramGateway, DEFAULT_API_BASE};

use crate::runtime::{DialogManager, MessageGateway};
use crate::state_machine::{Event, UserId};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Delay before polling again after a transport failure
pub const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// A message received from a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub user_id: UserId,
    pub event: Event,
}

/// Transport failures while receiving updates
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for GatewayError {
    // Request URLs carry the bot token
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Http(e.without_url())
    }
}

/// Inbound half of the chat transport
#[async_trait]
pub trait UpdateSource: Send {
    /// Wait for the next batch of inbound messages (may be empty)
    async fn next_batch(&mut self) -> Result<Vec<Inbound>, GatewayError>;
}

/// Route updates to dialogs until cancelled
pub async fn run_polling<S, G>(
    mut source: S,
    manager: &DialogManager<G>,
    cancel: CancellationToken,
    retry_delay: Duration,
) where
    S: UpdateSource,
    G: MessageGateway + 'static,
{
    tracing::info!("Polling for updates");

    loop {
        let batch = tokio::select! {
            () = cancel.cancelled() => break,
            batch = source.next_batch() => batch,
        };

        match batch {
            Ok(messages) => {
                for Inbound { user_id, event } in messages {
                    if let Err(e) = manager.send_event(user_id, event).await {
                        tracing::error!(user_id = %user_id, error = %e, "Failed to route update");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, delay_secs = retry_delay.as_secs(), "Polling failed, retrying");
                tokio::select! {
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(retry_delay) => {}
                }
            }
        }
    }

    tracing::info!("Polling stopped");
}
