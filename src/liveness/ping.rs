//! Periodic self-ping

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

const PING_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum PingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
}

/// Something that can be pinged
#[async_trait]
pub trait PingTarget: Send + Sync {
    async fn ping(&self) -> Result<(), PingError>;

    /// Where the ping goes, for logs
    fn describe(&self) -> &str;
}

/// GET against the process's own public address
pub struct HttpPingTarget {
    client: Client,
    url: String,
}

impl HttpPingTarget {
    pub fn new(url: impl Into<String>) -> Result<Self, PingError> {
        Ok(Self {
            client: Client::builder().timeout(PING_TIMEOUT).build()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PingTarget for HttpPingTarget {
    async fn ping(&self) -> Result<(), PingError> {
        let status = self.client.get(&self.url).send().await?.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(PingError::Status(status.as_u16()))
        }
    }

    fn describe(&self) -> &str {
        &self.url
    }
}

/// Pings a target forever: every `interval` after a success, every
/// `retry_delay` after a failure.
pub struct SelfPinger<T: PingTarget> {
    target: T,
    interval: Duration,
    retry_delay: Duration,
}

impl<T: PingTarget> SelfPinger<T> {
    pub fn new(target: T, interval: Duration, retry_delay: Duration) -> Self {
        Self {
            target,
            interval,
            retry_delay,
        }
    }

    fn delay_after<E>(&self, outcome: &Result<(), E>) -> Duration {
        if outcome.is_ok() {
            self.interval
        } else {
            self.retry_delay
        }
    }

    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            target_url = self.target.describe(),
            interval_secs = self.interval.as_secs(),
            "Self-pinger started"
        );

        loop {
            let outcome = tokio::select! {
                () = cancel.cancelled() => break,
                outcome = self.target.ping() => outcome,
            };
            match &outcome {
                Ok(()) => tracing::debug!(target_url = self.target.describe(), "Self-ping ok"),
                Err(e) => tracing::warn!(
                    target_url = self.target.describe(),
                    error = %e,
                    retry_secs = self.retry_delay.as_secs(),
                    "Self-ping failed"
                ),
            }

            let delay = self.delay_after(&outcome);
            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(delay) => {}
            }
        }

        tracing::info!("Self-pinger stopped");
    }
}
