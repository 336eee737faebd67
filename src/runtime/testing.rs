//! Mock implementations for testing
//!
//! These mocks enable runtime tests without a real chat transport.

use super::traits::{GatewaySendError, MessageGateway};
use crate::state_machine::UserId;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Gateway that records every send and can be told to fail
#[derive(Default)]
pub struct MockGateway {
    sent: Mutex<Vec<(UserId, String)>>,
    failures_left: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` sends fail
    pub fn fail_next_sends(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    /// All delivered messages in order
    pub fn sent(&self) -> Vec<(UserId, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Delivered texts for a single user
    pub fn texts_for(&self, user_id: UserId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == user_id)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl MessageGateway for MockGateway {
    async fn send(&self, user_id: UserId, text: &str) -> Result<(), GatewaySendError> {
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(GatewaySendError::new(user_id, "mock failure"));
        }
        self.sent.lock().unwrap().push((user_id, text.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_gateway_records_and_fails() {
        let gateway = MockGateway::new();
        gateway.send(UserId::private(1), "a").await.unwrap();

        gateway.fail_next_sends(1);
        assert!(gateway.send(UserId::private(1), "b").await.is_err());
        gateway.send(UserId::private(2), "c").await.unwrap();

        assert_eq!(
            gateway.sent(),
            vec![(UserId::private(1), "a".to_string()), (UserId::private(2), "c".to_string())]
        );
        assert_eq!(gateway.texts_for(UserId::private(1)), vec!["a".to_string()]);
    }
}
