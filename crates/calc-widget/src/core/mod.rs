//! Core calculator module
//!
//! Everything here is platform independent: the operand range check, the
//! error kinds surfaced on the banner, and the expression pipeline
//! (tokenizer, parser, evaluator) behind the equals action.

pub mod banner;
pub mod evaluator;
mod operations;
pub mod parser;
pub mod widget;

pub use operations::Operation;

use thiserror::Error;

/// Result type for calculator operations
pub type CalcResult<T> = Result<T, CalcError>;

/// The four operator characters that separate operands
pub const OPERATORS: [char; 4] = ['+', '-', '*', '/'];

/// Calculator error types
///
/// The `Display` text of the widget-level variants is exactly what the error
/// banner shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// An operand does not parse or lies outside the operand range
    #[error("Operand out of range")]
    OperandOutOfRange,
    /// Evaluation produced an infinite value
    #[error("Error: Divide by zero")]
    DivideByZero,
    /// Evaluation produced NaN or the expression is malformed
    #[error("Invalid expression")]
    InvalidExpression,
    /// Widget configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CalcError {
    /// Creates a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Returns true if `ch` is one of the four binary operators
#[must_use]
pub const fn is_operator(ch: char) -> bool {
    matches!(ch, '+' | '-' | '*' | '/')
}

/// Splits an expression into its operands.
///
/// Empty pieces (leading sign, adjacent operators, trailing operator) are
/// discarded, so `"-5+3"` yields `["5", "3"]`.
pub fn extract_operands(expression: &str) -> impl Iterator<Item = &str> {
    expression.split(is_operator).filter(|piece| !piece.is_empty())
}

/// Parses an operand as a plain decimal number.
///
/// Only digits and at most one decimal point are accepted, and at least one
/// digit must be present. `"12."` and `".5"` parse; `"."`, `"1.2.3"` and
/// anything with an exponent or sign do not.
#[must_use]
pub fn parse_operand(text: &str) -> Option<f64> {
    let mut digits = 0usize;
    let mut dots = 0usize;
    for ch in text.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }
    text.parse().ok()
}

/// Closed interval every committed operand must fall into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperandRange {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Default for OperandRange {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN, Self::DEFAULT_MAX)
    }
}

impl OperandRange {
    /// Default lower bound
    pub const DEFAULT_MIN: f64 = -9999.99;
    /// Default upper bound
    pub const DEFAULT_MAX: f64 = 9999.99;

    /// Creates a range with explicit bounds
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` is finite and inside the bounds
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    /// Returns true if `operand` parses and its value is inside the bounds
    #[must_use]
    pub fn accepts(&self, operand: &str) -> bool {
        parse_operand(operand).is_some_and(|value| self.contains(value))
    }

    /// Validates every operand of `expression`
    pub fn validate(&self, expression: &str) -> CalcResult<()> {
        if extract_operands(expression).all(|operand| self.accepts(operand)) {
            Ok(())
        } else {
            Err(CalcError::OperandOutOfRange)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== CalcError tests =====

    #[test]
    fn test_calc_error_display_operand_out_of_range() {
        assert_eq!(
            CalcError::OperandOutOfRange.to_string(),
            "Operand out of range"
        );
    }

    #[test]
    fn test_calc_error_display_divide_by_zero() {
        assert_eq!(CalcError::DivideByZero.to_string(), "Error: Divide by zero");
    }

    #[test]
    fn test_calc_error_display_invalid_expression() {
        assert_eq!(
            CalcError::InvalidExpression.to_string(),
            "Invalid expression"
        );
    }

    #[test]
    fn test_calc_error_display_config() {
        let err = CalcError::config("operand_min exceeds operand_max");
        assert_eq!(
            err.to_string(),
            "Configuration error: operand_min exceeds operand_max"
        );
    }

    #[test]
    fn test_calc_error_is_error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(CalcError::DivideByZero);
        assert!(err.to_string().contains("Divide"));
    }

    // ===== Operand extraction tests =====

    #[test]
    fn test_is_operator() {
        for op in OPERATORS {
            assert!(is_operator(op));
        }
        assert!(!is_operator('.'));
        assert!(!is_operator('7'));
        assert!(!is_operator('^'));
    }

    #[test]
    fn test_extract_operands_simple() {
        let operands: Vec<_> = extract_operands("12+3.5").collect();
        assert_eq!(operands, vec!["12", "3.5"]);
    }

    #[test]
    fn test_extract_operands_leading_sign() {
        let operands: Vec<_> = extract_operands("-5*2").collect();
        assert_eq!(operands, vec!["5", "2"]);
    }

    #[test]
    fn test_extract_operands_trailing_operator() {
        let operands: Vec<_> = extract_operands("9999.99+").collect();
        assert_eq!(operands, vec!["9999.99"]);
    }

    #[test]
    fn test_extract_operands_empty() {
        assert_eq!(extract_operands("").count(), 0);
        assert_eq!(extract_operands("-").count(), 0);
    }

    // ===== parse_operand tests =====

    #[test]
    fn test_parse_operand_plain() {
        assert_eq!(parse_operand("42"), Some(42.0));
        assert_eq!(parse_operand("3.25"), Some(3.25));
    }

    #[test]
    fn test_parse_operand_partial_decimal() {
        assert_eq!(parse_operand("0."), Some(0.0));
        assert_eq!(parse_operand(".5"), Some(0.5));
    }

    #[test]
    fn test_parse_operand_rejects_malformed() {
        assert_eq!(parse_operand("."), None);
        assert_eq!(parse_operand("1.2.3"), None);
        assert_eq!(parse_operand("1e5"), None);
        assert_eq!(parse_operand("inf"), None);
        assert_eq!(parse_operand(""), None);
    }

    // ===== OperandRange tests =====

    #[test]
    fn test_operand_range_default() {
        let range = OperandRange::default();
        assert_eq!(range.min, -9999.99);
        assert_eq!(range.max, 9999.99);
    }

    #[test]
    fn test_operand_range_contains_boundaries() {
        let range = OperandRange::default();
        assert!(range.contains(9999.99));
        assert!(range.contains(-9999.99));
        assert!(!range.contains(10000.0));
        assert!(!range.contains(-10000.0));
    }

    #[test]
    fn test_operand_range_rejects_special_values() {
        let range = OperandRange::default();
        assert!(!range.contains(f64::NAN));
        assert!(!range.contains(f64::INFINITY));
    }

    #[test]
    fn test_operand_range_accepts() {
        let range = OperandRange::default();
        assert!(range.accepts("9999.99"));
        assert!(!range.accepts("9999.999"));
        assert!(!range.accepts("10000"));
        assert!(!range.accepts("."));
    }

    #[test]
    fn test_operand_range_validate_expression() {
        let range = OperandRange::default();
        assert_eq!(range.validate("9999.99+0.01"), Ok(()));
        assert_eq!(range.validate(""), Ok(()));
        assert_eq!(
            range.validate("5+12345"),
            Err(CalcError::OperandOutOfRange)
        );
    }

    #[test]
    fn test_operand_range_custom_bounds() {
        let range = OperandRange::new(0.0, 10.0);
        assert!(range.accepts("10"));
        assert!(!range.accepts("10.5"));
    }
}
