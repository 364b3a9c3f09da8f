//! Widget configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::evaluator::Evaluator;
use crate::core::{CalcError, CalcResult, OperandRange};

/// Tunables of the calculator widget
///
/// Missing fields in a JSON document fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Smallest accepted operand
    pub operand_min: f64,
    /// Largest accepted operand
    pub operand_max: f64,
    /// How long an error banner stays visible
    pub banner_timeout_ms: u64,
    /// Digits after the decimal point in results
    pub precision: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            operand_min: OperandRange::DEFAULT_MIN,
            operand_max: OperandRange::DEFAULT_MAX,
            banner_timeout_ms: Self::DEFAULT_BANNER_TIMEOUT_MS,
            precision: Evaluator::DEFAULT_PRECISION,
        }
    }
}

impl WidgetConfig {
    /// Default banner lifetime
    pub const DEFAULT_BANNER_TIMEOUT_MS: u64 = 5000;
    /// Largest supported result precision
    pub const MAX_PRECISION: usize = 10;

    /// Create a new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operand bounds
    #[must_use]
    pub const fn with_operand_range(mut self, min: f64, max: f64) -> Self {
        self.operand_min = min;
        self.operand_max = max;
        self
    }

    /// Set the banner lifetime
    #[must_use]
    pub const fn with_banner_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.banner_timeout_ms = timeout_ms;
        self
    }

    /// Set the result precision
    #[must_use]
    pub const fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Operand bounds as a range
    #[must_use]
    pub const fn operand_range(&self) -> OperandRange {
        OperandRange::new(self.operand_min, self.operand_max)
    }

    /// Checks that the values are usable
    pub fn validate(&self) -> CalcResult<()> {
        if !self.operand_min.is_finite() || !self.operand_max.is_finite() {
            return Err(CalcError::config("operand bounds must be finite"));
        }
        if self.operand_min > self.operand_max {
            return Err(CalcError::config(format!(
                "operand_min ({}) exceeds operand_max ({})",
                self.operand_min, self.operand_max
            )));
        }
        if self.banner_timeout_ms == 0 {
            return Err(CalcError::config("banner_timeout_ms must be positive"));
        }
        if self.precision > Self::MAX_PRECISION {
            return Err(CalcError::config(format!(
                "precision {} exceeds {}",
                self.precision,
                Self::MAX_PRECISION
            )));
        }
        Ok(())
    }

    /// Parses and validates a JSON document
    pub fn from_json_str(json: &str) -> CalcResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CalcError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> CalcResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| CalcError::config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Serializes to pretty JSON
    pub fn to_json(&self) -> CalcResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CalcError::config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = WidgetConfig::default();
        assert_eq!(config.operand_min, -9999.99);
        assert_eq!(config.operand_max, 9999.99);
        assert_eq!(config.banner_timeout_ms, 5000);
        assert_eq!(config.precision, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builders() {
        let config = WidgetConfig::new()
            .with_operand_range(-100.0, 100.0)
            .with_banner_timeout_ms(250)
            .with_precision(4);
        assert_eq!(config.operand_range(), OperandRange::new(-100.0, 100.0));
        assert_eq!(config.banner_timeout_ms, 250);
        assert_eq!(config.precision, 4);
    }

    #[test]
    fn test_config_validate_inverted_bounds() {
        let config = WidgetConfig::new().with_operand_range(10.0, -10.0);
        assert!(matches!(config.validate(), Err(CalcError::Config(_))));
    }

    #[test]
    fn test_config_validate_non_finite_bounds() {
        let config = WidgetConfig::new().with_operand_range(f64::NEG_INFINITY, 1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validate_zero_timeout() {
        let config = WidgetConfig::new().with_banner_timeout_ms(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validate_precision_limit() {
        let config = WidgetConfig::new().with_precision(11);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_json_partial() {
        let config = WidgetConfig::from_json_str(r#"{"banner_timeout_ms": 1000}"#).unwrap();
        assert_eq!(config.banner_timeout_ms, 1000);
        assert_eq!(config.operand_max, 9999.99);
    }

    #[test]
    fn test_config_from_json_invalid() {
        let err = WidgetConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, CalcError::Config(_)));
    }

    #[test]
    fn test_config_from_json_rejects_bad_values() {
        let err = WidgetConfig::from_json_str(r#"{"operand_min": 5, "operand_max": 1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = WidgetConfig::new().with_precision(3);
        let json = config.to_json().unwrap();
        assert_eq!(WidgetConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"operand_min": -50, "operand_max": 50}}"#).unwrap();
        let config = WidgetConfig::from_file(file.path()).unwrap();
        assert_eq!(config.operand_range(), OperandRange::new(-50.0, 50.0));
    }

    #[test]
    fn test_config_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = WidgetConfig::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
