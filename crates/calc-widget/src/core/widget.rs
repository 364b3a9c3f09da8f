//! Expression accumulator and widget state
//!
//! [`WidgetState`] is the single source of truth for what the calculator
//! shows: the expression text, whether equals is enabled, and the error
//! banner. Front ends render it after every handler call and never keep a
//! second copy of the expression.
//!
//! Handlers live on [`Widget`] and take the state by `&mut`. They do no I/O;
//! when a banner needs hiding later they return a [`BannerTimer`] for the
//! front end to schedule.

use tracing::{debug, trace, warn};

use crate::config::WidgetConfig;
use crate::core::banner::{Banner, BannerTicket};
use crate::core::evaluator::Evaluator;
use crate::core::{is_operator, CalcError, Operation, OperandRange};

/// Returns true for characters the display accepts: `[0-9+\-*/.]`
#[must_use]
pub const fn is_allowed(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '.' || is_operator(ch)
}

/// Normalizes raw display text.
///
/// Strips characters outside `[0-9+\-*/.]`, drops a leading `*` or `/`, and
/// drops any operator that directly follows another operator.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    for ch in raw.chars().filter(|&ch| is_allowed(ch)) {
        if is_operator(ch) {
            match cleaned.chars().last() {
                None if ch == '*' || ch == '/' => continue,
                Some(last) if is_operator(last) => continue,
                _ => {}
            }
        }
        cleaned.push(ch);
    }
    cleaned
}

/// Everything the calculator displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetState {
    expression: String,
    equals_enabled: bool,
    banner: Banner,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetState {
    /// Empty expression, equals enabled, banner hidden
    #[must_use]
    pub fn new() -> Self {
        Self {
            expression: String::new(),
            equals_enabled: true,
            banner: Banner::new(),
        }
    }

    /// The committed expression
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Whether the evaluate action is enabled
    #[must_use]
    pub const fn equals_enabled(&self) -> bool {
        self.equals_enabled
    }

    /// The error banner
    #[must_use]
    pub const fn banner(&self) -> &Banner {
        &self.banner
    }

    /// The operand currently being typed (text after the last operator)
    #[must_use]
    pub fn current_operand(&self) -> &str {
        self.expression
            .rsplit(is_operator)
            .next()
            .unwrap_or_default()
    }

    fn last_char(&self) -> Option<char> {
        self.expression.chars().last()
    }
}

/// A request to hide the banner after a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerTimer {
    /// Ticket to pass back to [`Widget::expire_banner`]
    pub ticket: BannerTicket,
    /// Delay before hiding
    pub delay_ms: u64,
}

/// What a handler did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Input was committed to the expression
    Accepted,
    /// Input was dropped by a keypad rule, or equals was disabled
    Ignored,
    /// Input would have produced an invalid operand
    Rejected(CalcError),
    /// Evaluation succeeded; carries the formatted result. A banner timer
    /// comes with it when the result is outside the operand range.
    Evaluated(String),
    /// Evaluation failed
    Failed(CalcError),
    /// The widget was reset
    Cleared,
}

/// Result of a handler call
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Reaction {
    /// What happened
    pub outcome: Outcome,
    /// Banner hide to schedule, if an error was shown
    pub timer: Option<BannerTimer>,
}

impl Reaction {
    const fn quiet(outcome: Outcome) -> Self {
        Self {
            outcome,
            timer: None,
        }
    }

    /// Returns the error of a rejected or failed call
    #[must_use]
    pub const fn error(&self) -> Option<&CalcError> {
        match &self.outcome {
            Outcome::Rejected(err) | Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Calculator behaviour: validation, evaluation and keypad rules
#[derive(Debug, Clone)]
pub struct Widget {
    range: OperandRange,
    evaluator: Evaluator,
    banner_timeout_ms: u64,
}

impl Default for Widget {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget {
    /// Creates a widget with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&WidgetConfig::default())
    }

    /// Creates a widget from a configuration
    #[must_use]
    pub fn from_config(config: &WidgetConfig) -> Self {
        Self {
            range: config.operand_range(),
            evaluator: Evaluator::with_precision(config.precision),
            banner_timeout_ms: config.banner_timeout_ms,
        }
    }

    /// The operand bounds
    #[must_use]
    pub const fn range(&self) -> OperandRange {
        self.range
    }

    /// The banner lifetime
    #[must_use]
    pub const fn banner_timeout_ms(&self) -> u64 {
        self.banner_timeout_ms
    }

    /// Appends `incoming` to the expression if every resulting operand is
    /// in range.
    ///
    /// On rejection the expression is unchanged, equals is disabled and the
    /// banner shows "Operand out of range".
    pub fn append(&self, state: &mut WidgetState, incoming: &str) -> Reaction {
        let mut tentative = String::with_capacity(state.expression.len() + incoming.len());
        tentative.push_str(&state.expression);
        tentative.push_str(incoming);
        self.commit(state, tentative)
    }

    /// Replaces the expression with sanitized display text.
    ///
    /// The whole text is validated as if appended to an empty expression.
    pub fn input_text(&self, state: &mut WidgetState, raw: &str) -> Reaction {
        self.commit(state, sanitize(raw))
    }

    /// Handles a keypad button carrying the one-character `value`
    pub fn press(&self, state: &mut WidgetState, value: &str) -> Reaction {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some('.'), None) => self.press_decimal(state),
            (Some(ch), None) => match Operation::from_char(ch) {
                Some(op) => self.press_operator(state, op),
                None if ch.is_ascii_digit() => self.append(state, value),
                None => Reaction::quiet(Outcome::Ignored),
            },
            _ => Reaction::quiet(Outcome::Ignored),
        }
    }

    /// Handles an operator button.
    ///
    /// `*` and `/` cannot start an expression, and an operator directly
    /// after another operator is dropped.
    pub fn press_operator(&self, state: &mut WidgetState, op: Operation) -> Reaction {
        match state.last_char() {
            None if op.is_multiplicative() => Reaction::quiet(Outcome::Ignored),
            Some(last) if is_operator(last) => Reaction::quiet(Outcome::Ignored),
            _ => {
                let mut buf = [0u8; 4];
                self.append(state, op.symbol().encode_utf8(&mut buf))
            }
        }
    }

    /// Handles the decimal point button and the `.` key.
    ///
    /// A bare `.` becomes `0.`; a second point in one operand is dropped.
    pub fn press_decimal(&self, state: &mut WidgetState) -> Reaction {
        let operand = state.current_operand();
        if operand.contains('.') {
            Reaction::quiet(Outcome::Ignored)
        } else if operand.is_empty() {
            self.append(state, "0.")
        } else {
            self.append(state, ".")
        }
    }

    /// Handles a key press that the display does not consume itself.
    ///
    /// `Enter` behaves exactly like the equals button.
    pub fn key_down(&self, state: &mut WidgetState, key: &str) -> Reaction {
        match key {
            "Enter" => self.evaluate(state),
            "." => self.press_decimal(state),
            _ => Reaction::quiet(Outcome::Ignored),
        }
    }

    /// Evaluates the expression.
    ///
    /// Inert while equals is disabled. On success the expression becomes
    /// the formatted result; on failure it is kept for correction and the
    /// banner shows the error. A result outside the operand range is still
    /// displayed, but it disables equals and raises "Operand out of range".
    pub fn evaluate(&self, state: &mut WidgetState) -> Reaction {
        if !state.equals_enabled {
            trace!("evaluate ignored while equals is disabled");
            return Reaction::quiet(Outcome::Ignored);
        }

        match self.evaluator.evaluate_formatted(&state.expression) {
            Ok(result) => {
                debug!(expression = %state.expression, %result, "evaluated");
                state.expression.clone_from(&result);
                match self.range.validate(&result) {
                    Ok(()) => Reaction::quiet(Outcome::Evaluated(result)),
                    Err(err) => {
                        warn!(%result, "result is outside the operand range");
                        state.equals_enabled = false;
                        let shown = self.raise(state, err, Outcome::Rejected);
                        Reaction {
                            outcome: Outcome::Evaluated(result),
                            timer: shown.timer,
                        }
                    }
                }
            }
            Err(err) => {
                warn!(expression = %state.expression, error = %err, "evaluation failed");
                self.raise(state, err, Outcome::Failed)
            }
        }
    }

    /// Resets the expression, enables equals and hides the banner
    pub fn clear(&self, state: &mut WidgetState) -> Reaction {
        state.expression.clear();
        state.equals_enabled = true;
        state.banner.hide();
        debug!("cleared");
        Reaction::quiet(Outcome::Cleared)
    }

    /// Hides the banner if `ticket` is still current; returns true if hidden
    pub fn expire_banner(&self, state: &mut WidgetState, ticket: BannerTicket) -> bool {
        let hidden = state.banner.expire(ticket);
        trace!(generation = ticket.generation(), hidden, "banner timer fired");
        hidden
    }

    fn commit(&self, state: &mut WidgetState, tentative: String) -> Reaction {
        match self.range.validate(&tentative) {
            Ok(()) => {
                debug!(expression = %tentative, "accepted");
                state.expression = tentative;
                state.equals_enabled = true;
                Reaction::quiet(Outcome::Accepted)
            }
            Err(err) => {
                warn!(expression = %tentative, "operand out of range");
                state.equals_enabled = false;
                self.raise(state, err, Outcome::Rejected)
            }
        }
    }

    fn raise(
        &self,
        state: &mut WidgetState,
        err: CalcError,
        outcome: fn(CalcError) -> Outcome,
    ) -> Reaction {
        let ticket = state.banner.show(err.to_string());
        Reaction {
            outcome: outcome(err),
            timer: Some(BannerTimer {
                ticket,
                delay_ms: self.banner_timeout_ms,
            }),
        }
    }
}
