//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the runtime with mock implementations.

use crate::state_machine::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Outbound message could not be delivered
#[derive(Debug, Clone, Error)]
#[error("failed to send message to {user_id}: {reason}")]
pub struct GatewaySendError {
    pub user_id: UserId,
    pub reason: String,
}

impl GatewaySendError {
    pub fn new(user_id: UserId, reason: impl Into<String>) -> Self {
        Self {
            user_id,
            reason: reason.into(),
        }
    }
}

/// Outbound half of the chat transport
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Deliver text to a user
    async fn send(&self, user_id: UserId, text: &str) -> Result<(), GatewaySendError>;
}

#[async_trait]
impl<T: MessageGateway + ?Sized> MessageGateway for Arc<T> {
    async fn send(&self, user_id: UserId, text: &str) -> Result<(), GatewaySendError> {
        (**self).send(user_id, text).await
    }
}
