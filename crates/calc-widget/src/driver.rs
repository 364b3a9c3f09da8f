//! Unified widget driver
//!
//! Every front end (mock DOM, terminal session) implements [`WidgetDriver`],
//! so the behavioural scenarios below are written once and run against all
//! of them.

/// Abstract driver trait for widget interactions
///
/// Methods mirror what a user can do: press a keypad button by its
/// `data-value`, press equals or clear, hit Enter, type into the display,
/// and wait.
///
/// # Example
///
/// ```rust
/// use calc_widget::driver::{press_keys, WidgetDriver};
/// use calc_widget::wasm::WasmDriver;
///
/// let mut driver = WasmDriver::new();
/// press_keys(&mut driver, "2+2");
/// driver.press_equals();
/// assert_eq!(driver.display(), "4.00");
/// ```
pub trait WidgetDriver {
    /// Presses the keypad button carrying `value`
    fn press(&mut self, value: &str);

    /// Presses the equals button
    fn press_equals(&mut self);

    /// Presses the Enter key
    fn press_enter(&mut self);

    /// Presses the clear button
    fn press_clear(&mut self);

    /// Replaces the display text as if typed by the user
    fn type_text(&mut self, text: &str);

    /// Lets `ms` milliseconds pass
    fn advance_time(&mut self, ms: u64);

    /// Text currently shown in the display
    fn display(&self) -> String;

    /// Banner message, if the banner is visible
    fn banner(&self) -> Option<String>;

    /// Whether the equals control is enabled
    fn equals_enabled(&self) -> bool;
}

/// Presses one keypad button per character of `keys`
pub fn press_keys<D: WidgetDriver + ?Sized>(driver: &mut D, keys: &str) {
    let mut buf = [0u8; 4];
    for ch in keys.chars() {
        driver.press(ch.encode_utf8(&mut buf));
    }
}

// ===== Unified Scenarios =====
// These scenarios work with ANY WidgetDriver implementation

/// Verifies the four operations and two-decimal formatting
pub fn verify_basic_arithmetic<D: WidgetDriver>(driver: &mut D) {
    for (keys, expected) in [
        ("2+2", "4.00"),
        ("10/4", "2.50"),
        ("6*7", "42.00"),
        ("1-3", "-2.00"),
        ("2+3*4", "14.00"),
        ("1/3", "0.33"),
    ] {
        driver.press_clear();
        press_keys(driver, keys);
        assert_eq!(driver.display(), keys);
        driver.press_equals();
        assert_eq!(driver.display(), expected, "evaluating {keys}");
        assert_eq!(driver.banner(), None);
    }
    driver.press_clear();
}

/// Verifies that a result can be extended and evaluated again
pub fn verify_chaining<D: WidgetDriver>(driver: &mut D) {
    driver.press_clear();
    press_keys(driver, "2+2");
    driver.press_equals();
    press_keys(driver, "*3");
    assert_eq!(driver.display(), "4.00*3");
    driver.press_equals();
    assert_eq!(driver.display(), "12.00");
    driver.press_clear();
}

/// Verifies operand range rejection and the equals lockout
pub fn verify_operand_range<D: WidgetDriver>(driver: &mut D) {
    driver.press_clear();
    press_keys(driver, "9999.99");
    assert_eq!(driver.display(), "9999.99");
    assert!(driver.equals_enabled());

    driver.press("9");
    assert_eq!(driver.display(), "9999.99");
    assert_eq!(driver.banner().as_deref(), Some("Operand out of range"));
    assert!(!driver.equals_enabled());

    // inert while disabled
    driver.press_equals();
    assert_eq!(driver.display(), "9999.99");

    // the next accepted input re-enables equals
    press_keys(driver, "+0.01");
    assert_eq!(driver.display(), "9999.99+0.01");
    assert!(driver.equals_enabled());

    // an out-of-range result is shown but locks equals again
    driver.advance_time(5000);
    driver.press_equals();
    assert_eq!(driver.display(), "10000.00");
    assert_eq!(driver.banner().as_deref(), Some("Operand out of range"));
    assert!(!driver.equals_enabled());
    driver.press_enter();
    assert_eq!(driver.display(), "10000.00");

    driver.type_text("12");
    assert!(driver.equals_enabled());
    driver.press_clear();
}

/// Verifies the keypad rules for operators and the decimal point
pub fn verify_keypad_rules<D: WidgetDriver>(driver: &mut D) {
    driver.press_clear();
    press_keys(driver, "*/");
    assert_eq!(driver.display(), "");

    press_keys(driver, "-5+*");
    assert_eq!(driver.display(), "-5+");

    press_keys(driver, "..");
    assert_eq!(driver.display(), "-5+0.");

    press_keys(driver, "5.");
    assert_eq!(driver.display(), "-5+0.5");
    assert_eq!(driver.banner(), None);
    driver.press_clear();
}

/// Verifies the divide-by-zero banner and its five second lifetime
pub fn verify_error_banner<D: WidgetDriver>(driver: &mut D) {
    driver.press_clear();
    press_keys(driver, "5/0");
    driver.press_equals();
    assert_eq!(driver.display(), "5/0");
    assert_eq!(driver.banner().as_deref(), Some("Error: Divide by zero"));

    driver.advance_time(4999);
    assert!(driver.banner().is_some());
    driver.advance_time(1);
    assert_eq!(driver.banner(), None);
    driver.press_clear();
}

/// Verifies that a new error restarts the banner lifetime
pub fn verify_banner_restart<D: WidgetDriver>(driver: &mut D) {
    driver.press_clear();
    press_keys(driver, "5/0");
    driver.press_equals();
    driver.advance_time(3000);

    driver.press_equals();
    driver.advance_time(3000);
    assert_eq!(driver.banner().as_deref(), Some("Error: Divide by zero"));

    driver.advance_time(2000);
    assert_eq!(driver.banner(), None);
    driver.press_clear();
}

/// Verifies malformed and empty expressions
pub fn verify_invalid_expression<D: WidgetDriver>(driver: &mut D) {
    driver.press_clear();
    press_keys(driver, "5+");
    driver.press_equals();
    assert_eq!(driver.display(), "5+");
    assert_eq!(driver.banner().as_deref(), Some("Invalid expression"));

    driver.press_clear();
    driver.press_equals();
    assert_eq!(driver.banner().as_deref(), Some("Invalid expression"));
    driver.press_clear();
}

/// Verifies that Enter behaves exactly like equals
pub fn verify_enter_key<D: WidgetDriver>(driver: &mut D) {
    driver.press_clear();
    press_keys(driver, "6*7");
    driver.press_enter();
    assert_eq!(driver.display(), "42.00");

    driver.press_clear();
    press_keys(driver, "99999");
    assert!(!driver.equals_enabled());
    driver.press_enter();
    assert_eq!(driver.display(), "9999");
    driver.press_clear();
}

/// Verifies sanitisation and validation of typed text
pub fn verify_typed_input<D: WidgetDriver>(driver: &mut D) {
    driver.press_clear();
    driver.type_text("12abc++3");
    assert_eq!(driver.display(), "12+3");

    driver.type_text("12+34567");
    assert_eq!(driver.display(), "12+3");
    assert_eq!(driver.banner().as_deref(), Some("Operand out of range"));
    assert!(!driver.equals_enabled());

    driver.type_text("*7");
    assert_eq!(driver.display(), "7");
    assert!(driver.equals_enabled());
    driver.press_clear();
}

/// Verifies that clear resets everything and cancels the banner timer
pub fn verify_clear<D: WidgetDriver>(driver: &mut D) {
    press_keys(driver, "99999");
    assert!(driver.banner().is_some());

    driver.press_clear();
    assert_eq!(driver.display(), "");
    assert_eq!(driver.banner(), None);
    assert!(driver.equals_enabled());

    driver.advance_time(10_000);
    assert_eq!(driver.banner(), None);
}

/// Complete verification suite - runs all scenarios
pub fn run_all_scenarios<D: WidgetDriver>(driver: &mut D) {
    verify_basic_arithmetic(driver);
    verify_chaining(driver);
    verify_operand_range(driver);
    verify_keypad_rules(driver);
    verify_error_banner(driver);
    verify_banner_restart(driver);
    verify_invalid_expression(driver);
    verify_enter_key(driver);
    verify_typed_input(driver);
    verify_clear(driver);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records calls without any widget behind it
    #[derive(Debug, Default)]
    struct RecordingDriver {
        pressed: Vec<String>,
    }

    impl WidgetDriver for RecordingDriver {
        fn press(&mut self, value: &str) {
            self.pressed.push(value.to_string());
        }
        fn press_equals(&mut self) {}
        fn press_enter(&mut self) {}
        fn press_clear(&mut self) {}
        fn type_text(&mut self, _text: &str) {}
        fn advance_time(&mut self, _ms: u64) {}
        fn display(&self) -> String {
            self.pressed.concat()
        }
        fn banner(&self) -> Option<String> {
            None
        }
        fn equals_enabled(&self) -> bool {
            true
        }
    }

    // ===== press_keys tests =====

    #[test]
    fn test_press_keys_one_press_per_char() {
        let mut driver = RecordingDriver::default();
        press_keys(&mut driver, "12+.5");
        assert_eq!(driver.pressed, vec!["1", "2", "+", ".", "5"]);
    }

    #[test]
    fn test_press_keys_empty() {
        let mut driver = RecordingDriver::default();
        press_keys(&mut driver, "");
        assert!(driver.pressed.is_empty());
    }

    #[test]
    fn test_press_keys_through_trait_object() {
        let mut driver = RecordingDriver::default();
        let dyn_driver: &mut dyn WidgetDriver = &mut driver;
        press_keys(dyn_driver, "7");
        assert_eq!(dyn_driver.display(), "7");
    }
}
