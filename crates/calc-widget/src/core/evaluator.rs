//! AST evaluator and result formatting
//!
//! Evaluation itself never fails; the raw IEEE-754 value is classified
//! afterwards. An infinity means a division by zero, NaN means the
//! expression had no meaningful value.

use tracing::debug;

use crate::core::parser::{AstNode, Parser};
use crate::core::{CalcError, CalcResult};

/// Evaluator for calculator expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    precision: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Digits after the decimal point in formatted results
    pub const DEFAULT_PRECISION: usize = 2;

    /// Creates a new evaluator with two-decimal formatting
    #[must_use]
    pub const fn new() -> Self {
        Self::with_precision(Self::DEFAULT_PRECISION)
    }

    /// Creates an evaluator with custom formatting precision
    #[must_use]
    pub const fn with_precision(precision: usize) -> Self {
        Self { precision }
    }

    /// Returns the formatting precision
    #[must_use]
    pub const fn precision(&self) -> usize {
        self.precision
    }

    /// Evaluates an AST node to its raw value
    #[must_use]
    pub fn evaluate(&self, node: &AstNode) -> f64 {
        match node {
            AstNode::Number(n) => *n,
            AstNode::Negate(inner) => -self.evaluate(inner),
            AstNode::BinaryOp { left, op, right } => {
                op.apply(self.evaluate(left), self.evaluate(right))
            }
        }
    }

    /// Parses and evaluates a string expression
    pub fn evaluate_str(&self, input: &str) -> CalcResult<f64> {
        let ast = Parser::parse_str(input).map_err(|err| {
            debug!(expression = input, error = %err, "expression did not parse");
            CalcError::from(err)
        })?;
        classify(self.evaluate(&ast))
    }

    /// Evaluates a string expression and formats the result
    pub fn evaluate_formatted(&self, input: &str) -> CalcResult<String> {
        self.evaluate_str(input).map(|value| self.format(value))
    }

    /// Formats a value with this evaluator's precision
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        format_fixed(value, self.precision)
    }
}

/// Maps special IEEE-754 results onto calculator errors
pub fn classify(value: f64) -> CalcResult<f64> {
    if value.is_infinite() {
        Err(CalcError::DivideByZero)
    } else if value.is_nan() {
        Err(CalcError::InvalidExpression)
    } else {
        Ok(value)
    }
}

/// Formats `value` with exactly `precision` digits after the decimal point.
///
/// Rounding is performed on the exact binary value, ties to even. Negative
/// zero prints as `0.00`.
#[must_use]
pub fn format_fixed(value: f64, precision: usize) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.precision$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Operation;

    // ===== AST evaluation tests =====

    #[test]
    fn test_evaluate_number() {
        let eval = Evaluator::new();
        assert_eq!(eval.evaluate(&AstNode::number(42.0)), 42.0);
    }

    #[test]
    fn test_evaluate_negate() {
        let eval = Evaluator::new();
        let ast = AstNode::negate(AstNode::negate(AstNode::number(5.0)));
        assert_eq!(eval.evaluate(&ast), 5.0);
    }

    #[test]
    fn test_evaluate_binary() {
        let eval = Evaluator::new();
        let ast = AstNode::binary(AstNode::number(6.0), Operation::Multiply, AstNode::number(7.0));
        assert_eq!(eval.evaluate(&ast), 42.0);
    }

    #[test]
    fn test_evaluate_raw_division_by_zero() {
        let eval = Evaluator::new();
        let ast = AstNode::binary(AstNode::number(1.0), Operation::Divide, AstNode::number(0.0));
        assert!(eval.evaluate(&ast).is_infinite());
    }

    // ===== String evaluation tests =====

    #[test]
    fn test_evaluate_str_precedence() {
        let eval = Evaluator::new();
        assert_eq!(eval.evaluate_str("2+3*4"), Ok(14.0));
        assert_eq!(eval.evaluate_str("10-4-3"), Ok(3.0));
        assert_eq!(eval.evaluate_str("8/4/2"), Ok(1.0));
        assert_eq!(eval.evaluate_str("-5+10"), Ok(5.0));
    }

    #[test]
    fn test_evaluate_str_divide_by_zero() {
        let eval = Evaluator::new();
        assert_eq!(eval.evaluate_str("5/0"), Err(CalcError::DivideByZero));
        assert_eq!(eval.evaluate_str("-5/0"), Err(CalcError::DivideByZero));
    }

    #[test]
    fn test_evaluate_str_zero_over_zero() {
        let eval = Evaluator::new();
        assert_eq!(eval.evaluate_str("0/0"), Err(CalcError::InvalidExpression));
    }

    #[test]
    fn test_evaluate_str_malformed() {
        let eval = Evaluator::new();
        assert_eq!(eval.evaluate_str("2+"), Err(CalcError::InvalidExpression));
        assert_eq!(eval.evaluate_str(""), Err(CalcError::InvalidExpression));
        assert_eq!(eval.evaluate_str("1.2.3"), Err(CalcError::InvalidExpression));
    }

    // ===== Formatting tests =====

    #[test]
    fn test_evaluate_formatted() {
        let eval = Evaluator::new();
        assert_eq!(eval.evaluate_formatted("2+2"), Ok("4.00".to_string()));
        assert_eq!(eval.evaluate_formatted("10/4"), Ok("2.50".to_string()));
        assert_eq!(eval.evaluate_formatted("1/3"), Ok("0.33".to_string()));
        assert_eq!(eval.evaluate_formatted("2/3"), Ok("0.67".to_string()));
    }

    #[test]
    fn test_evaluate_formatted_large_result() {
        let eval = Evaluator::new();
        assert_eq!(
            eval.evaluate_formatted("9999.99*9999.99"),
            Ok("99999800.00".to_string())
        );
    }

    #[test]
    fn test_format_fixed_negative_zero() {
        assert_eq!(format_fixed(-0.0, 2), "0.00");
        assert_eq!(format_fixed(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_fixed_negative() {
        assert_eq!(format_fixed(-5.0, 2), "-5.00");
    }

    #[test]
    fn test_format_fixed_precision() {
        assert_eq!(format_fixed(3.14159, 0), "3");
        assert_eq!(format_fixed(3.14159, 4), "3.1416");
    }

    #[test]
    fn test_evaluator_with_precision() {
        let eval = Evaluator::with_precision(3);
        assert_eq!(eval.precision(), 3);
        assert_eq!(eval.evaluate_formatted("1/8"), Ok("0.125".to_string()));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(1.5), Ok(1.5));
        assert_eq!(classify(f64::NEG_INFINITY), Err(CalcError::DivideByZero));
        assert_eq!(classify(f64::NAN), Err(CalcError::InvalidExpression));
    }
}
