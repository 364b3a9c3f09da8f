//! calc-widget - Range-Checked Calculator Widget
//!
//! A calculator widget that accumulates an arithmetic expression from
//! keypad presses and typed text, rejects any operand outside
//! `[-9999.99, 9999.99]`, evaluates with an explicit parser and formats the
//! result to two decimals. Errors surface on a banner that hides itself
//! five seconds after the latest error.
//!
//! # Layout
//!
//! - [`core`]: operand range, parser, evaluator, banner and the widget
//!   state machine. No I/O.
//! - [`wasm`]: keypad layout, a mock DOM with virtual timers, the headless
//!   [`wasm::WasmDriver`] and (feature `wasm`) the `web-sys` binding.
//! - [`repl`]: a line-driven terminal session over the same widget.
//! - [`driver`]: the [`driver::WidgetDriver`] trait and scenarios shared by
//!   every front end.
//!
//! # Example
//!
//! ```rust
//! use calc_widget::prelude::*;
//!
//! let widget = Widget::new();
//! let mut state = WidgetState::new();
//!
//! let _ = widget.append(&mut state, "2+2");
//! let reaction = widget.evaluate(&mut state);
//! assert_eq!(reaction.outcome, Outcome::Evaluated("4.00".into()));
//! assert_eq!(state.expression(), "4.00");
//!
//! // Operands are range checked on every append
//! let reaction = widget.append(&mut state, "+123456");
//! assert_eq!(reaction.error(), Some(&CalcError::OperandOutOfRange));
//! assert!(!state.equals_enabled());
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod core;
pub mod driver;
pub mod repl;

/// WASM module - always available for testing
/// (Mock DOM allows testing without actual browser bindings)
pub mod wasm;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::WidgetConfig;
    pub use crate::core::banner::{Banner, BannerTicket};
    pub use crate::core::evaluator::Evaluator;
    pub use crate::core::parser::{AstNode, ParseError, Parser, Token, Tokenizer};
    pub use crate::core::widget::{
        sanitize, BannerTimer, Outcome, Reaction, Widget, WidgetState,
    };
    pub use crate::core::{CalcError, CalcResult, Operation, OperandRange};
    pub use crate::driver::WidgetDriver;
    pub use crate::repl::{Command, ReplSession};
    pub use crate::wasm::{DomElement, DomEvent, MockDom, WasmDriver, WasmKeypad};
}
