//! Pure state transition function

use super::{Command, DialogState, Effect, Event};
use crate::projection::project;
use crate::validation::parse_integer;

/// Result of a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: DialogState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: DialogState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// The state does not change and nothing is sent
    pub fn ignored(state: &DialogState) -> Self {
        Self::new(state.clone())
    }

    /// Text of the reply effect, if any
    #[cfg(test)]
    pub fn reply(&self) -> Option<&str> {
        self.effects.iter().find_map(|e| match e {
            Effect::Reply { text } => Some(text.as_str()),
            Effect::DialogCompleted { .. } => None,
        })
    }
}

/// Pure transition function.
///
/// Given the same state and event it always returns the same result. Every
/// result carries at most one `Effect::Reply`.
pub fn transition(state: &DialogState, event: Event) -> TransitionResult {
    match (state, event) {
        // Entry restarts from the first question in every state, dropping
        // partial answers
        (_, Event::Command(Command::Add)) => {
            TransitionResult::new(DialogState::AwaitingCategory).with_effect(Effect::ask_category())
        }

        // Nothing to cancel
        (DialogState::Idle, Event::Command(Command::Cancel)) => TransitionResult::ignored(state),

        (_, Event::Command(Command::Cancel)) => {
            TransitionResult::new(DialogState::Idle).with_effect(Effect::cancelled())
        }

        (_, Event::Command(Command::Start | Command::Other(_))) => TransitionResult::ignored(state),

        (DialogState::Idle, Event::Text(_)) => TransitionResult::ignored(state),

        // Any text is a category, including empty text
        (DialogState::AwaitingCategory, Event::Text(category)) => {
            TransitionResult::new(DialogState::AwaitingCost { category })
                .with_effect(Effect::ask_cost())
        }

        (DialogState::AwaitingCost { category }, Event::Text(text)) => match parse_integer(&text) {
            Ok(unit_cost) => TransitionResult::new(DialogState::AwaitingTimes {
                category: category.clone(),
                unit_cost,
            })
            .with_effect(Effect::ask_times()),
            Err(_) => TransitionResult::new(state.clone()).with_effect(Effect::not_a_number()),
        },

        (
            DialogState::AwaitingTimes {
                category,
                unit_cost,
            },
            Event::Text(text),
        ) => {
            let report = parse_integer(&text)
                .ok()
                .and_then(|times| project(category, *unit_cost, times).ok());
            match report {
                Some(report) => TransitionResult::new(DialogState::Idle)
                    .with_effect(Effect::reply(report.to_string()))
                    .with_effect(Effect::DialogCompleted { report }),
                None => TransitionResult::new(state.clone()).with_effect(Effect::not_a_number()),
            }
        }
    }
}
