//! Keypad for the calculator widget
//!
//! Defines the button grid, the DOM ids of every button and the
//! `data-value` literal each input button carries.

use super::dom::DomElement;
use crate::core::Operation;

/// DOM id of the evaluate button
pub const EQUALS_ID: &str = "equals";
/// DOM id of the clear button
pub const CLEAR_ID: &str = "clear";

/// Actions that keypad buttons can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadAction {
    /// Insert a digit (0-9)
    Digit(u8),
    /// Insert a decimal point
    Decimal,
    /// Insert an operator
    Operator(Operation),
    /// Evaluate the expression
    Equals,
    /// Clear the widget
    Clear,
}

impl KeypadAction {
    /// Maps a typed character to an action.
    ///
    /// `=` evaluates and `c`/`C` clears.
    #[must_use]
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '0'..='9' => ch
                .to_digit(10)
                .and_then(|d| u8::try_from(d).ok())
                .map(Self::Digit),
            '.' => Some(Self::Decimal),
            '=' => Some(Self::Equals),
            'c' | 'C' => Some(Self::Clear),
            _ => Operation::from_char(ch).map(Self::Operator),
        }
    }

    /// Maps a document-level `KeyboardEvent.key` to the action the widget
    /// takes over from the browser: `Enter` evaluates and `.` is the decimal
    /// rule. Every other key is left to the display's input event.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(Self::Equals),
            "." => Some(Self::Decimal),
            _ => None,
        }
    }

    /// Returns the `data-value` literal, `None` for equals and clear
    #[must_use]
    pub fn data_value(&self) -> Option<String> {
        match self {
            Self::Digit(d) => Some(d.to_string()),
            Self::Decimal => Some(".".to_string()),
            Self::Operator(op) => Some(op.symbol().to_string()),
            Self::Equals | Self::Clear => None,
        }
    }

    /// Returns the button label
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Equals => "=".to_string(),
            Self::Clear => "C".to_string(),
            _ => self.data_value().unwrap_or_default(),
        }
    }
}

/// A single keypad button definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadButtonDef {
    /// The action this button performs
    pub action: KeypadAction,
    /// The DOM element ID for this button
    pub id: String,
    /// Grid row (0-indexed)
    pub row: usize,
    /// Grid column (0-indexed)
    pub col: usize,
}

impl KeypadButtonDef {
    /// Creates a new button definition
    #[must_use]
    pub fn new(action: KeypadAction, row: usize, col: usize) -> Self {
        let id = match action {
            KeypadAction::Digit(d) => format!("btn-{d}"),
            KeypadAction::Decimal => "btn-decimal".to_string(),
            KeypadAction::Operator(op) => format!("btn-{}", op_name(op)),
            KeypadAction::Equals => EQUALS_ID.to_string(),
            KeypadAction::Clear => CLEAR_ID.to_string(),
        };
        Self {
            action,
            id,
            row,
            col,
        }
    }

    /// Builds the DOM element for this button
    #[must_use]
    pub fn to_element(&self) -> DomElement {
        let mut element = DomElement::new("button")
            .with_id(&self.id)
            .with_text(&self.action.label())
            .with_class("btn")
            .with_attr("style", &format!("grid-area: {}", self.grid_area()));
        if let Some(value) = self.action.data_value() {
            element = element.with_attr("data-value", &value);
        }
        element
    }

    /// CSS `grid-area` placing the button on the keypad grid (1-based lines)
    #[must_use]
    pub fn grid_area(&self) -> String {
        format!("{} / {}", self.row + 1, self.col + 1)
    }
}

/// Returns a name for an operator (for element IDs)
const fn op_name(op: Operation) -> &'static str {
    match op {
        Operation::Add => "plus",
        Operation::Subtract => "minus",
        Operation::Multiply => "times",
        Operation::Divide => "divide",
    }
}

/// Keypad layout definition
/// Layout:
/// ```text
/// [ 7 ] [ 8 ] [ 9 ] [ / ]
/// [ 4 ] [ 5 ] [ 6 ] [ * ]
/// [ 1 ] [ 2 ] [ 3 ] [ - ]
/// [ 0 ] [ . ] [ = ] [ + ]
/// [ C ]
/// ```
#[derive(Debug, Clone)]
pub struct WasmKeypad {
    buttons: Vec<KeypadButtonDef>,
}

impl Default for WasmKeypad {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmKeypad {
    /// Creates the standard keypad
    #[must_use]
    pub fn new() -> Self {
        use KeypadAction::{Clear, Decimal, Digit, Equals, Operator};

        let grid: [&[KeypadAction]; 5] = [
            &[Digit(7), Digit(8), Digit(9), Operator(Operation::Divide)],
            &[Digit(4), Digit(5), Digit(6), Operator(Operation::Multiply)],
            &[Digit(1), Digit(2), Digit(3), Operator(Operation::Subtract)],
            &[Digit(0), Decimal, Equals, Operator(Operation::Add)],
            &[Clear],
        ];

        let buttons = grid
            .iter()
            .enumerate()
            .flat_map(|(row, actions)| {
                actions
                    .iter()
                    .enumerate()
                    .map(move |(col, &action)| KeypadButtonDef::new(action, row, col))
            })
            .collect();

        Self { buttons }
    }

    /// Returns the number of buttons
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Gets all button definitions
    #[must_use]
    pub fn buttons(&self) -> &[KeypadButtonDef] {
        &self.buttons
    }

    /// Finds a button by element ID
    #[must_use]
    pub fn find_button_by_id(&self, id: &str) -> Option<&KeypadButtonDef> {
        self.buttons.iter().find(|b| b.id == id)
    }

    /// Finds a button by its `data-value` literal
    #[must_use]
    pub fn find_button_by_value(&self, value: &str) -> Option<&KeypadButtonDef> {
        self.buttons
            .iter()
            .find(|b| b.action.data_value().as_deref() == Some(value))
    }

    /// Creates DOM elements for all keypad buttons
    #[must_use]
    pub fn create_dom_elements(&self) -> Vec<DomElement> {
        self.buttons.iter().map(KeypadButtonDef::to_element).collect()
    }

    /// Processes a button click event and returns the action
    #[must_use]
    pub fn handle_click(&self, element_id: &str) -> Option<KeypadAction> {
        self.find_button_by_id(element_id).map(|btn| btn.action)
    }
}
