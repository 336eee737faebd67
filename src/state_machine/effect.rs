//! Effects produced by state transitions

use crate::projection::Report;
use crate::replies;

/// Effects to be executed after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send text back to the user
    Reply { text: String },

    /// A dialog finished with a report (logged by the runtime)
    DialogCompleted { report: Report },
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply { text: text.into() }
    }

    pub fn ask_category() -> Self {
        Self::reply(replies::ASK_CATEGORY)
    }

    pub fn ask_cost() -> Self {
        Self::reply(replies::ASK_COST)
    }

    pub fn ask_times() -> Self {
        Self::reply(replies::ASK_TIMES)
    }

    pub fn not_a_number() -> Self {
        Self::reply(replies::NOT_A_NUMBER)
    }

    pub fn cancelled() -> Self {
        Self::reply(replies::CANCELLED)
    }
}
