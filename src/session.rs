//! In-memory session store
//!
//! One session per user, held only while a dialog is active. Nothing survives
//! a restart.

use crate::state_machine::{DialogState, UserId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Dialog state of a single user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub state: DialogState,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            state: DialogState::Idle,
            started_at: Utc::now(),
        }
    }
}

/// Sessions keyed by user.
///
/// A single mutex guards the map; it is never held across an await point.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, Session>> {
        // The map holds plain data, so a poisoned lock is still consistent
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_or_create(&self, user_id: UserId) -> Session {
        self.lock()
            .entry(user_id)
            .or_insert_with(|| Session::new(user_id))
            .clone()
    }

    pub fn get(&self, user_id: UserId) -> Option<Session> {
        self.lock().get(&user_id).cloned()
    }

    /// Current state, `Idle` when the user has no session
    pub fn state_of(&self, user_id: UserId) -> DialogState {
        self.lock()
            .get(&user_id)
            .map(|s| s.state.clone())
            .unwrap_or_default()
    }

    /// Store a new state, creating the session if needed
    pub fn set_state(&self, user_id: UserId, state: DialogState) {
        self.lock()
            .entry(user_id)
            .or_insert_with(|| Session::new(user_id))
            .state = state;
    }

    /// Drop the session and everything collected in it
    pub fn reset(&self, user_id: UserId) {
        self.lock().remove(&user_id);
    }

    /// Number of users with an active dialog
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
