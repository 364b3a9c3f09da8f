//! Line-driven terminal session
//!
//! Each input line is either a run of keypad keys (`12+3=`) or a
//! colon command (`:type 1+2`, `:enter`, `:wait 5000`, `:quit`). The session
//! keeps its own millisecond clock; the banner hides once the clock passes
//! its deadline.

use std::fmt::Write as _;

use thiserror::Error;
use tracing::debug;

use crate::config::WidgetConfig;
use crate::core::banner::BannerTicket;
use crate::core::widget::{Outcome, Reaction, Widget, WidgetState};
use crate::driver::WidgetDriver;
use crate::wasm::KeypadAction;

/// Usage text printed by `:help`
pub const HELP: &str = "\
keys      digits, + - * / and . press keypad buttons; = evaluates; c clears
:type T   replace the display with T (sanitised, then validated)
:enter    press the Enter key
:wait MS  let MS milliseconds pass
:help     show this text
:quit     leave";

/// Errors from parsing a session line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The colon command is not known
    #[error("unknown command: :{0}")]
    Unknown(String),
    /// `:wait` was given something other than a millisecond count
    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),
}

/// One parsed session line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Keypad keys, one per character
    Keys(String),
    /// Text typed into the display
    Type(String),
    /// The Enter key
    Enter,
    /// Idle time in milliseconds
    Wait(u64),
    /// Show usage
    Help,
    /// End the session
    Quit,
}

impl Command {
    /// Parses one input line
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Self::Keys(line.to_string()));
        };

        let (name, arg) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(name, arg)| (name, arg.trim()));

        match name {
            "type" | "t" => Ok(Self::Type(arg.to_string())),
            "enter" | "e" => Ok(Self::Enter),
            "wait" | "w" => arg
                .parse()
                .map(Self::Wait)
                .map_err(|_| CommandError::InvalidDuration(arg.to_string())),
            "help" | "h" => Ok(Self::Help),
            "quit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// What the caller should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Print the rendered state
    Render,
    /// Print [`HELP`]
    Help,
    /// Stop reading input
    Quit,
}

/// Widget driven from a terminal
#[derive(Debug)]
pub struct ReplSession {
    widget: Widget,
    state: WidgetState,
    now_ms: u64,
    pending: Option<(u64, BannerTicket)>,
}

impl Default for ReplSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplSession {
    /// Creates a session with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&WidgetConfig::default())
    }

    /// Creates a session with a custom configuration
    #[must_use]
    pub fn with_config(config: &WidgetConfig) -> Self {
        Self {
            widget: Widget::from_config(config),
            state: WidgetState::new(),
            now_ms: 0,
            pending: None,
        }
    }

    /// Returns the widget state
    #[must_use]
    pub const fn state(&self) -> &WidgetState {
        &self.state
    }

    /// Current session clock
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Runs one command
    pub fn execute(&mut self, command: &Command) -> Flow {
        match command {
            Command::Keys(keys) => {
                for ch in keys.chars().filter(|ch| !ch.is_whitespace()) {
                    match KeypadAction::from_char(ch) {
                        Some(action) => {
                            let reaction = self.perform(action);
                            self.apply(reaction);
                        }
                        None => debug!(key = %ch, "no keypad button for key"),
                    }
                }
            }
            Command::Type(text) => {
                let reaction = self.widget.input_text(&mut self.state, text);
                self.apply(reaction);
            }
            Command::Enter => {
                let reaction = self.widget.key_down(&mut self.state, "Enter");
                self.apply(reaction);
            }
            Command::Wait(ms) => self.advance_time(*ms),
            Command::Help => return Flow::Help,
            Command::Quit => return Flow::Quit,
        }
        Flow::Render
    }

    /// Advances the clock, hiding the banner once its deadline passes
    pub fn advance_time(&mut self, ms: u64) {
        self.now_ms = self.now_ms.saturating_add(ms);
        if let Some((due_ms, ticket)) = self.pending {
            if due_ms <= self.now_ms {
                self.pending = None;
                self.widget.expire_banner(&mut self.state, ticket);
            }
        }
    }

    /// One-line view of the widget: `[expression]`, a disabled-equals
    /// marker and the banner message
    #[must_use]
    pub fn render(&self) -> String {
        let mut line = format!("[{}]", self.state.expression());
        if !self.state.equals_enabled() {
            line.push_str(" (= disabled)");
        }
        if let Some(message) = self.state.banner().message() {
            let _ = write!(line, " ! {message}");
        }
        line
    }

    fn perform(&mut self, action: KeypadAction) -> Reaction {
        match action {
            KeypadAction::Equals => self.widget.evaluate(&mut self.state),
            KeypadAction::Clear => self.widget.clear(&mut self.state),
            KeypadAction::Decimal => self.widget.press_decimal(&mut self.state),
            KeypadAction::Operator(op) => self.widget.press_operator(&mut self.state, op),
            KeypadAction::Digit(_) => {
                let value = action.data_value().unwrap_or_default();
                self.widget.append(&mut self.state, &value)
            }
        }
    }

    fn apply(&mut self, reaction: Reaction) {
        if let Some(timer) = reaction.timer {
            self.pending = Some((self.now_ms.saturating_add(timer.delay_ms), timer.ticket));
        } else if reaction.outcome == Outcome::Cleared {
            self.pending = None;
        }
    }
}

impl WidgetDriver for ReplSession {
    fn press(&mut self, value: &str) {
        let reaction = self.widget.press(&mut self.state, value);
        self.apply(reaction);
    }

    fn press_equals(&mut self) {
        let reaction = self.widget.evaluate(&mut self.state);
        self.apply(reaction);
    }

    fn press_enter(&mut self) {
        self.execute(&Command::Enter);
    }

    fn press_clear(&mut self) {
        let reaction = self.widget.clear(&mut self.state);
        self.apply(reaction);
    }

    fn type_text(&mut self, text: &str) {
        self.execute(&Command::Type(text.to_string()));
    }

    fn advance_time(&mut self, ms: u64) {
        Self::advance_time(self, ms);
    }

    fn display(&self) -> String {
        self.state.expression().to_string()
    }

    fn banner(&self) -> Option<String> {
        self.state.banner().message().map(str::to_string)
    }

    fn equals_enabled(&self) -> bool {
        self.state.equals_enabled()
    }
}
