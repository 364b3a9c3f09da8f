//! WASM front end for the calculator widget
//!
//! `dom`, `keypad` and `driver` are platform independent so the whole
//! front end runs headless in tests; `browser` binds the same widget to a
//! real page through `web-sys`.

#[cfg(feature = "wasm")]
mod browser;
mod dom;
mod driver;
mod keypad;

#[cfg(feature = "wasm")]
pub use browser::BrowserCalculator;
pub use dom::{
    DomElement, DomEvent, MockDom, TimeoutId, BANNER_ID, BANNER_TEXT_ID, DISPLAY_ID, KEYPAD_ID,
};
pub use driver::WasmDriver;
pub use keypad::{KeypadAction, KeypadButtonDef, WasmKeypad, CLEAR_ID, EQUALS_ID};
