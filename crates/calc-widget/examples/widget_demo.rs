//! Calculator Widget Demo
//!
//! Drives the widget through the mock DOM: keypad clicks, an out-of-range
//! operand, a division by zero and the banner timing out, then runs the
//! shared scenarios on both front ends.
//!
//! Run with: cargo run --example widget_demo

use calc_widget::driver::{
    run_all_scenarios, verify_basic_arithmetic, verify_error_banner, verify_operand_range,
    WidgetDriver,
};
use calc_widget::repl::ReplSession;
use calc_widget::wasm::{WasmDriver, CLEAR_ID, EQUALS_ID};

fn show(driver: &WasmDriver) {
    println!("   display: {:?}", driver.display_value());
    println!(
        "   equals:  {}",
        if driver.dom().is_disabled(EQUALS_ID) {
            "disabled"
        } else {
            "enabled"
        }
    );
    match driver.banner_text() {
        Some(text) => println!("   banner:  {text}"),
        None => println!("   banner:  (hidden)"),
    }
}

fn main() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Calculator Widget Demo - Mock DOM and Terminal        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut driver = WasmDriver::new();

    println!("📦 Keypad ({} buttons):", driver.keypad().button_count());
    for button in driver.keypad().buttons() {
        print!(" {}", button.action.label());
    }
    println!("\n");

    println!("1️⃣  Clicking 1 2 + 3 =");
    for id in ["btn-1", "btn-2", "btn-plus", "btn-3", EQUALS_ID] {
        driver.click(id);
    }
    show(&driver);

    println!("\n2️⃣  Clearing, then clicking 9 9 9 9 9");
    driver.click(CLEAR_ID);
    for _ in 0..5 {
        driver.click("btn-9");
    }
    show(&driver);

    println!("\n3️⃣  Typing 8/0 and pressing Enter");
    driver.type_input("8/0");
    driver.key_down("Enter");
    show(&driver);

    println!("\n4️⃣  Five seconds later");
    driver.advance_time(5000);
    show(&driver);

    println!("\n5️⃣  DOM Event History:");
    for (i, event) in driver.dom().event_history().iter().enumerate() {
        println!("   [{i}] {event:?}");
    }

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  Running shared scenarios on both front ends");
    println!("═══════════════════════════════════════════════════════════════");
    println!();

    run_scenarios("WasmDriver", &mut WasmDriver::new());
    run_scenarios("ReplSession", &mut ReplSession::new());

    println!();
    println!("  ✅ All scenarios passed on both front ends");
}

fn run_scenarios<D: WidgetDriver>(name: &str, driver: &mut D) {
    println!("  {name}:");
    print!("    ✓ verify_basic_arithmetic ... ");
    verify_basic_arithmetic(driver);
    println!("PASSED");

    print!("    ✓ verify_operand_range ... ");
    verify_operand_range(driver);
    println!("PASSED");

    print!("    ✓ verify_error_banner ... ");
    verify_error_banner(driver);
    println!("PASSED");

    print!("    ✓ run_all_scenarios ... ");
    run_all_scenarios(driver);
    println!("PASSED");
}
