//! Runtime for executing dialogs
//!
//! Every user with something in flight gets a dedicated task fed by a
//! channel, so one user's events are handled in order while different users
//! proceed concurrently. A task retires once its user has no dialog and
//! nothing queued.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::DialogRuntime;
pub use traits::*;

use crate::session::SessionStore;
use crate::state_machine::{Event, UserId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Handle to interact with a running dialog
#[derive(Clone)]
pub struct DialogHandle {
    pub event_tx: mpsc::UnboundedSender<Event>,
    /// Distinguishes a runtime from a later one for the same user
    pub generation: u64,
}

/// Live runtimes by user.
///
/// Events are queued under the read lock and a runtime retires under the write
/// lock, so nothing is ever queued to a runtime that is leaving. Queueing
/// never waits, so the lock is never held across an await.
pub type RuntimeRegistry = Arc<RwLock<HashMap<UserId, DialogHandle>>>;

/// Manager for all dialog runtimes
pub struct DialogManager<G>
where
    G: MessageGateway + 'static,
{
    store: Arc<SessionStore>,
    gateway: Arc<G>,
    runtimes: RuntimeRegistry,
    next_generation: AtomicU64,
}

impl<G> DialogManager<G>
where
    G: MessageGateway + 'static,
{
    pub fn new(store: Arc<SessionStore>, gateway: Arc<G>) -> Self {
        Self {
            store,
            gateway,
            runtimes: Arc::new(RwLock::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Start a runtime for a user; the caller holds the write lock
    fn spawn_runtime(&self, runtimes: &mut HashMap<UserId, DialogHandle>, user_id: UserId) -> DialogHandle {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let runtime = DialogRuntime::new(
            user_id,
            generation,
            self.store.clone(),
            self.gateway.clone(),
            self.runtimes.clone(),
            event_rx,
        );
        tokio::spawn(runtime.run());

        let handle = DialogHandle { event_tx, generation };
        runtimes.insert(user_id, handle.clone());
        tracing::debug!(user_id = %user_id, generation, "Dialog runtime spawned");
        handle
    }

    /// Queue an event for a user's dialog, starting a runtime if none is live
    pub async fn send_event(&self, user_id: UserId, event: Event) -> Result<(), String> {
        let event = {
            let runtimes = self.runtimes.read().await;
            match runtimes.get(&user_id) {
                Some(handle) => match handle.event_tx.send(event) {
                    Ok(()) => return Ok(()),
                    Err(mpsc::error::SendError(event)) => {
                        tracing::warn!(user_id = %user_id, "Dialog runtime closed, restarting");
                        event
                    }
                },
                None => event,
            }
        };

        let mut runtimes = self.runtimes.write().await;
        // Another caller may have started one while we waited for the lock
        let live = runtimes
            .get(&user_id)
            .filter(|handle| !handle.event_tx.is_closed())
            .cloned();
        let handle = match live {
            Some(handle) => handle,
            None => self.spawn_runtime(&mut runtimes, user_id),
        };
        handle
            .event_tx
            .send(event)
            .map_err(|e| format!("Failed to send event: {e}"))
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Number of users with a live runtime
    pub async fn runtime_count(&self) -> usize {
        self.runtimes.read().await.len()
    }
}
