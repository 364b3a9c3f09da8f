//! Property-based tests for operand validation, sanitising and the banner

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use calc_widget::core::widget::{is_allowed, sanitize, Outcome, Widget, WidgetState};
use calc_widget::core::{is_operator, CalcError, OperandRange};
use calc_widget::driver::{press_keys, WidgetDriver};
use calc_widget::repl::ReplSession;
use proptest::prelude::*;

// ===== Strategy definitions =====

/// Renders a cent amount as a plain two-decimal operand (no sign)
fn cents_text(cents: u32) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Operands in and around the default range, in cents
fn operand_cents_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![0u32..2_000_000, 999_990u32..1_000_010]
}

/// Operands inside the default range, in cents
fn in_range_cents_strategy() -> impl Strategy<Value = u32> {
    0u32..=999_999
}

fn operator_strategy() -> impl Strategy<Value = char> {
    prop_oneof![Just('+'), Just('-'), Just('*'), Just('/')]
}

/// Mostly calculator characters with some noise
fn raw_text_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            4 => proptest::sample::select("0123456789+-*/.".chars().collect::<Vec<_>>()),
            1 => any::<char>(),
        ],
        0..30,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

// ===== Operand range properties =====

proptest! {
    /// An operand is accepted iff its value lies in the bound
    #[test]
    fn prop_operand_accepted_iff_in_range(cents in operand_cents_strategy(), negative in any::<bool>()) {
        let widget = Widget::new();
        let mut state = WidgetState::new();
        let sign = if negative { "-" } else { "" };
        let text = format!("{sign}{}", cents_text(cents));

        let reaction = widget.append(&mut state, &text);
        if cents <= 999_999 {
            prop_assert_eq!(reaction.outcome, Outcome::Accepted);
            prop_assert_eq!(state.expression(), text.as_str());
        } else {
            prop_assert_eq!(reaction.outcome, Outcome::Rejected(CalcError::OperandOutOfRange));
            prop_assert_eq!(state.expression(), "");
            prop_assert!(!state.equals_enabled());
        }
    }

    /// While equals is enabled every operand of the expression passes the
    /// range check, whether it was appended or produced by evaluation
    #[test]
    fn prop_equals_enabled_implies_valid_expression(
        steps in proptest::collection::vec(("[0-9.+*/-]{1,4}", any::<bool>()), 0..20),
    ) {
        let widget = Widget::new();
        let mut state = WidgetState::new();
        for (piece, evaluate) in &steps {
            let _ = widget.append(&mut state, piece);
            if *evaluate {
                let _ = widget.evaluate(&mut state);
            }
            if state.equals_enabled() {
                prop_assert_eq!(
                    OperandRange::default().validate(state.expression()),
                    Ok(()),
                    "{}",
                    state.expression()
                );
            }
        }
    }

    /// Products are always displayed; only in-range ones keep equals enabled
    #[test]
    fn prop_out_of_range_result_disables_equals(a in 1u32..=9999, b in 1u32..=200) {
        let widget = Widget::new();
        let mut state = WidgetState::new();
        prop_assert_eq!(widget.append(&mut state, &format!("{a}*{b}")).outcome, Outcome::Accepted);
        let product = u64::from(a) * u64::from(b);
        let in_range = product < 10_000;

        let reaction = widget.evaluate(&mut state);
        prop_assert_eq!(reaction.outcome, Outcome::Evaluated(format!("{product}.00")));
        prop_assert_eq!(state.equals_enabled(), in_range);
        prop_assert_eq!(reaction.timer.is_some(), !in_range);
    }

    /// Formatted results that are themselves in range pass the check again
    #[test]
    fn prop_in_range_result_revalidates(
        a in in_range_cents_strategy(),
        op in operator_strategy(),
        b in in_range_cents_strategy(),
    ) {
        let widget = Widget::new();
        let mut state = WidgetState::new();
        let expression = format!("{}{op}{}", cents_text(a), cents_text(b));
        prop_assert_eq!(widget.append(&mut state, &expression).outcome, Outcome::Accepted);

        if let Outcome::Evaluated(result) = widget.evaluate(&mut state).outcome {
            let value: f64 = result.parse().unwrap();
            if value.abs() <= OperandRange::DEFAULT_MAX {
                prop_assert_eq!(OperandRange::default().validate(&result), Ok(()));
            }
            prop_assert_eq!(result.rsplit('.').next().map(str::len), Some(2));
        }
    }
}

// ===== Sanitiser properties =====

proptest! {
    /// Sanitised text only holds calculator characters
    #[test]
    fn prop_sanitize_charset(raw in raw_text_strategy()) {
        prop_assert!(sanitize(&raw).chars().all(is_allowed));
    }

    /// Sanitised text never starts with '*' or '/' and has no operator runs
    #[test]
    fn prop_sanitize_shape(raw in raw_text_strategy()) {
        let clean = sanitize(&raw);
        prop_assert!(!clean.starts_with('*') && !clean.starts_with('/'));
        let chars: Vec<char> = clean.chars().collect();
        for pair in chars.windows(2) {
            prop_assert!(!(is_operator(pair[0]) && is_operator(pair[1])), "{}", clean);
        }
    }

    /// Sanitising twice changes nothing
    #[test]
    fn prop_sanitize_idempotent(raw in raw_text_strategy()) {
        let once = sanitize(&raw);
        prop_assert_eq!(sanitize(&once), once);
    }

    /// Typed text is either committed sanitised or rejected without change
    #[test]
    fn prop_input_text_commits_or_keeps(before in "[0-9]{0,3}", raw in raw_text_strategy()) {
        let widget = Widget::new();
        let mut state = WidgetState::new();
        let _ = widget.input_text(&mut state, &before);
        let previous = state.expression().to_string();

        match widget.input_text(&mut state, &raw).outcome {
            Outcome::Accepted => prop_assert_eq!(state.expression(), sanitize(&raw)),
            Outcome::Rejected(_) => prop_assert_eq!(state.expression(), previous),
            other => prop_assert!(false, "unexpected outcome {:?}", other),
        }
    }
}

// ===== Clear and banner properties =====

proptest! {
    /// Clear always yields an empty display, hidden banner and enabled equals
    #[test]
    fn prop_clear_resets_any_state(keys in "[0-9+*/.=-]{0,30}") {
        let mut session = ReplSession::new();
        press_keys(&mut session, &keys.replace('=', ""));
        session.press_equals();

        session.press_clear();
        prop_assert_eq!(session.display(), "");
        prop_assert_eq!(session.banner(), None);
        prop_assert!(session.equals_enabled());
    }

    /// The banner hides exactly one timeout after the latest error
    #[test]
    fn prop_banner_hides_after_latest_error(gaps in proptest::collection::vec(0u64..6000, 1..6)) {
        let mut session = ReplSession::new();
        press_keys(&mut session, "5/0");
        for gap in &gaps {
            session.advance_time(*gap);
            session.press_equals();
        }

        session.advance_time(4999);
        let banner = session.banner();
        prop_assert_eq!(banner.as_deref(), Some("Error: Divide by zero"));
        session.advance_time(1);
        prop_assert_eq!(session.banner(), None);
    }
}
