//! Dialog state types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity a dialog belongs to: one sender within one chat.
///
/// In a private chat both ids are equal. In a group every member gets their
/// own dialog, while replies still go to the shared chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId {
    pub chat_id: i64,
    pub sender_id: i64,
}

impl UserId {
    pub fn new(chat_id: i64, sender_id: i64) -> Self {
        Self { chat_id, sender_id }
    }

    /// A one-to-one chat, where the chat id is the sender id
    #[cfg(test)]
    pub fn private(id: i64) -> Self {
        Self::new(id, id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.chat_id == self.sender_id {
            write!(f, "{}", self.chat_id)
        } else {
            write!(f, "{}/{}", self.chat_id, self.sender_id)
        }
    }
}

/// Where a user is in the question sequence.
///
/// Answers collected so far travel with the state that follows the question,
/// so a field can only be read after its question has been answered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogState {
    /// No active dialog
    #[default]
    Idle,

    /// Asked what the money is spent on
    AwaitingCategory,

    /// Asked for the cost of one occurrence
    AwaitingCost { category: String },

    /// Asked how many times per month
    AwaitingTimes { category: String, unit_cost: i64 },
}

impl DialogState {
    pub fn name(&self) -> &'static str {
        match self {
            DialogState::Idle => "idle",
            DialogState::AwaitingCategory => "awaiting_category",
            DialogState::AwaitingCost { .. } => "awaiting_cost",
            DialogState::AwaitingTimes { .. } => "awaiting_times",
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            DialogState::AwaitingCost { category } | DialogState::AwaitingTimes { category, .. } => {
                Some(category)
            }
            DialogState::Idle | DialogState::AwaitingCategory => None,
        }
    }

    pub fn unit_cost(&self) -> Option<i64> {
        match self {
            DialogState::AwaitingTimes { unit_cost, .. } => Some(*unit_cost),
            DialogState::Idle
            | DialogState::AwaitingCategory
            | DialogState::AwaitingCost { .. } => None,
        }
    }
}
