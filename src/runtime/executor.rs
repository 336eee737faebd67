//! Per-user dialog runtime

use super::traits::{GatewaySendError, MessageGateway};
use super::RuntimeRegistry;
use crate::replies;
use crate::session::SessionStore;
use crate::state_machine::{transition, Command, DialogState, Effect, Event, UserId};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TryRecvError};

/// Runs one user's dialog, processing events strictly in arrival order
pub struct DialogRuntime<G>
where
    G: MessageGateway + 'static,
{
    user_id: UserId,
    generation: u64,
    store: Arc<SessionStore>,
    gateway: Arc<G>,
    registry: RuntimeRegistry,
    event_rx: mpsc::UnboundedReceiver<Event>,
}

impl<G> DialogRuntime<G>
where
    G: MessageGateway + 'static,
{
    pub fn new(
        user_id: UserId,
        generation: u64,
        store: Arc<SessionStore>,
        gateway: Arc<G>,
        registry: RuntimeRegistry,
        event_rx: mpsc::UnboundedReceiver<Event>,
    ) -> Self {
        Self {
            user_id,
            generation,
            store,
            gateway,
            registry,
            event_rx,
        }
    }

    pub async fn run(mut self) {
        tracing::debug!(user_id = %self.user_id, "Starting dialog runtime");

        while let Some(event) = self.next_event().await {
            if let Err(e) = self.process_event(event).await {
                // State was not committed; the user can repeat the last answer
                tracing::warn!(user_id = %self.user_id, error = %e, "Reply not delivered");
            }
        }

        tracing::debug!(user_id = %self.user_id, "Dialog runtime stopped");
    }

    /// Wait for the next event while a dialog is open.
    ///
    /// Without a dialog the runtime takes whatever is already queued, or
    /// deregisters itself and returns `None`.
    async fn next_event(&mut self) -> Option<Event> {
        if self.store.get(self.user_id).is_some() {
            return self.event_rx.recv().await;
        }

        let mut runtimes = self.registry.write().await;
        match self.event_rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => {
                if runtimes
                    .get(&self.user_id)
                    .is_some_and(|handle| handle.generation == self.generation)
                {
                    runtimes.remove(&self.user_id);
                    tracing::debug!(user_id = %self.user_id, "Dialog runtime retired");
                }
                None
            }
        }
    }

    /// Apply one event.
    ///
    /// Effects run before the new state is committed, so a failed send leaves
    /// the stored session exactly as it was.
    pub(crate) async fn process_event(&self, event: Event) -> Result<(), GatewaySendError> {
        if event == Event::Command(Command::Start) {
            return self.gateway.send(self.user_id, replies::GREETING).await;
        }

        let restart = event == Event::Command(Command::Add);
        let state = self.store.state_of(self.user_id);
        let result = transition(&state, event);

        for effect in result.effects {
            self.execute_effect(effect).await?;
        }

        if result.new_state == state && !restart {
            return Ok(());
        }

        tracing::debug!(
            user_id = %self.user_id,
            from = state.name(),
            to = result.new_state.name(),
            "Dialog transition"
        );

        match result.new_state {
            DialogState::Idle => self.store.reset(self.user_id),
            DialogState::AwaitingCategory => {
                // Entry always starts a fresh session
                self.store.reset(self.user_id);
                let session = self.store.get_or_create(self.user_id);
                tracing::info!(user_id = %self.user_id, started_at = %session.started_at, "Dialog started");
                self.store.set_state(self.user_id, DialogState::AwaitingCategory);
            }
            new_state => self.store.set_state(self.user_id, new_state),
        }

        Ok(())
    }

    async fn execute_effect(&self, effect: Effect) -> Result<(), GatewaySendError> {
        match effect {
            Effect::Reply { text } => self.gateway.send(self.user_id, &text).await,
            Effect::DialogCompleted { report } => {
                let elapsed_secs = self
                    .store
                    .get(self.user_id)
                    .map(|s| (Utc::now() - s.started_at).num_seconds());
                tracing::info!(
                    user_id = %self.user_id,
                    category = %report.category,
                    monthly_total = report.monthly_total,
                    yearly_total = report.yearly_total,
                    advice = ?report.advice,
                    elapsed_secs,
                    "Dialog completed"
                );
                Ok(())
            }
        }
    }
}
