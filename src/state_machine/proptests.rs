//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::replies;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_category() -> impl Strategy<Value = String> {
    "[a-zA-Zа-я ]{0,20}"
}

fn arb_state() -> impl Strategy<Value = DialogState> {
    prop_oneof![
        Just(DialogState::Idle),
        Just(DialogState::AwaitingCategory),
        arb_category().prop_map(|category| DialogState::AwaitingCost { category }),
        (arb_category(), any::<i64>())
            .prop_map(|(category, unit_cost)| DialogState::AwaitingTimes { category, unit_cost }),
    ]
}

fn arb_numeric_state() -> impl Strategy<Value = DialogState> {
    prop_oneof![
        arb_category().prop_map(|category| DialogState::AwaitingCost { category }),
        (arb_category(), 1i64..1_000_000)
            .prop_map(|(category, unit_cost)| DialogState::AwaitingTimes { category, unit_cost }),
    ]
}

/// Text that never parses as an integer
fn arb_non_numeric_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z]{1,10}",
        Just(String::new()),
        Just("12.5".to_string()),
        Just("99999999999999999999".to_string()),
    ]
}

fn arb_text_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-z]{1,10}".prop_map(Event::Text),
        (0i64..100_000).prop_map(|n| Event::Text(n.to_string())),
        arb_non_numeric_text().prop_map(Event::Text),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => arb_text_event(),
        1 => Just(Event::Command(Command::Add)),
        1 => Just(Event::Command(Command::Cancel)),
        1 => Just(Event::Command(Command::Start)),
        1 => "[a-z]{1,8}".prop_map(|name| Event::Command(Command::Other(name))),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // Invariant 1: never more than one reply per event
    #[test]
    fn prop_at_most_one_reply(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = DialogState::Idle;
        for event in events {
            let result = transition(&state, event);
            let replies = result.effects.iter().filter(|e| matches!(e, Effect::Reply { .. })).count();
            prop_assert!(replies <= 1, "{} replies for {:?}", replies, result.effects);
            state = result.new_state;
        }
    }

    // Invariant 2: cancel always lands in Idle with nothing retained, and
    // confirms only when a dialog was open
    #[test]
    fn prop_cancel_always_idle(state in arb_state()) {
        let result = transition(&state, Event::Command(Command::Cancel));
        prop_assert_eq!(&result.new_state, &DialogState::Idle);
        prop_assert_eq!(result.new_state.category(), None);
        prop_assert_eq!(result.new_state.unit_cost(), None);
        let expected = (state != DialogState::Idle).then_some(replies::CANCELLED);
        prop_assert_eq!(result.reply(), expected);
    }

    // Invariant 3: entry always restarts at the first question
    #[test]
    fn prop_entry_restarts(state in arb_state()) {
        let result = transition(&state, Event::Command(Command::Add));
        prop_assert_eq!(result.new_state, DialogState::AwaitingCategory);
    }

    // Invariant 4: bad numbers leave the state (and its answers) untouched
    #[test]
    fn prop_invalid_number_keeps_state(
        state in arb_numeric_state(),
        raw in arb_non_numeric_text()
    ) {
        let result = transition(&state, Event::Text(raw));
        prop_assert_eq!(&result.new_state, &state);
        prop_assert_eq!(result.reply(), Some(replies::NOT_A_NUMBER));
    }

    // Invariant 5: nothing happens to idle users who just talk
    #[test]
    fn prop_idle_text_is_noop(event in arb_text_event()) {
        let result = transition(&DialogState::Idle, event);
        prop_assert_eq!(result.new_state, DialogState::Idle);
        prop_assert!(result.effects.is_empty());
    }

    // Invariant 6: a completed dialog reports exactly what was entered
    #[test]
    fn prop_completion_reports_inputs(
        category in arb_category(),
        cost in 1i64..1_000_000,
        times in 1i64..1_000
    ) {
        let mut state = transition(&DialogState::Idle, Event::Command(Command::Add)).new_state;
        state = transition(&state, Event::Text(category.clone())).new_state;
        state = transition(&state, Event::Text(cost.to_string())).new_state;
        let result = transition(&state, Event::Text(times.to_string()));

        prop_assert_eq!(&result.new_state, &DialogState::Idle);
        let report = result.effects.iter().find_map(|e| match e {
            Effect::DialogCompleted { report } => Some(report.clone()),
            Effect::Reply { .. } => None,
        });
        prop_assert!(report.is_some());
        let report = report.unwrap();
        prop_assert_eq!(report.category, category);
        prop_assert_eq!(report.monthly_total, cost * times);
        prop_assert_eq!(report.yearly_total, cost * times * 12);
    }

    // Invariant 7: transitions are deterministic
    #[test]
    fn prop_deterministic(state in arb_state(), event in arb_event()) {
        let a = transition(&state, event.clone());
        let b = transition(&state, event);
        prop_assert_eq!(a, b);
    }
}
