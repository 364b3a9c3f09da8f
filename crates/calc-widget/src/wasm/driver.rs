//! Headless DOM controller
//!
//! Routes [`DomEvent`]s to the widget, schedules banner timers on the mock
//! DOM's virtual clock and renders [`WidgetState`] back into the elements
//! after every event. Assertions read the DOM, not the state, so they also
//! check rendering.

use tracing::trace;

use super::dom::{DomEvent, MockDom, TimeoutId, BANNER_ID, BANNER_TEXT_ID, DISPLAY_ID};
use super::keypad::{KeypadAction, WasmKeypad, CLEAR_ID, EQUALS_ID};
use crate::config::WidgetConfig;
use crate::core::banner::BannerTicket;
use crate::core::widget::{Outcome, Reaction, Widget, WidgetState};
use crate::driver::WidgetDriver;

/// `KeyboardEvent.key` of the space bar, which activates a focused button
const ACTIVATION_KEY: &str = " ";

/// Widget bound to a mock DOM
#[derive(Debug)]
pub struct WasmDriver {
    widget: Widget,
    state: WidgetState,
    keypad: WasmKeypad,
    dom: MockDom,
    pending: Option<(TimeoutId, BannerTicket)>,
}

impl Default for WasmDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmDriver {
    /// Creates a driver with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&WidgetConfig::default())
    }

    /// Creates a driver with a custom configuration
    #[must_use]
    pub fn with_config(config: &WidgetConfig) -> Self {
        let keypad = WasmKeypad::new();
        let dom = MockDom::calculator(&keypad);
        let mut driver = Self {
            widget: Widget::from_config(config),
            state: WidgetState::new(),
            keypad,
            dom,
            pending: None,
        };
        driver.render();
        driver
    }

    /// Returns the widget state
    #[must_use]
    pub const fn state(&self) -> &WidgetState {
        &self.state
    }

    /// Returns a reference to the DOM
    #[must_use]
    pub const fn dom(&self) -> &MockDom {
        &self.dom
    }

    /// Returns the keypad layout
    #[must_use]
    pub const fn keypad(&self) -> &WasmKeypad {
        &self.keypad
    }

    /// Dispatches an event and re-renders.
    ///
    /// Returns `None` when no handler is bound to the event target or the
    /// target is disabled. Keys the widget does not claim fall through to
    /// the browser default, which only matters for the space bar.
    pub fn dispatch(&mut self, event: DomEvent) -> Option<Outcome> {
        self.dom.dispatch_event(event.clone());

        let reaction = match &event {
            DomEvent::Click { element_id } => self.on_click(element_id),
            DomEvent::Input { element_id, value } if element_id == DISPLAY_ID => {
                Some(self.widget.input_text(&mut self.state, value))
            }
            DomEvent::Input { .. } => None,
            DomEvent::KeyDown { key } => match KeypadAction::from_key(key) {
                Some(_) => Some(self.widget.key_down(&mut self.state, key)),
                // unclaimed activation key: the browser clicks the focused button
                None if key == ACTIVATION_KEY => {
                    let focused = self.dom.focused().map(str::to_string);
                    focused.and_then(|id| self.on_click(&id))
                }
                None => None,
            },
        };

        let outcome = reaction.map(|reaction| self.apply(reaction));
        self.render();
        outcome
    }

    /// Simulates a click on an element
    pub fn click(&mut self, element_id: &str) -> Option<Outcome> {
        self.dispatch(DomEvent::click(element_id))
    }

    /// Simulates the user editing the display
    pub fn type_input(&mut self, text: &str) -> Option<Outcome> {
        self.dispatch(DomEvent::input(DISPLAY_ID, text))
    }

    /// Simulates a document-level key down
    pub fn key_down(&mut self, key: &str) -> Option<Outcome> {
        self.dispatch(DomEvent::key_down(key))
    }

    /// Advances the virtual clock, firing due banner timers
    pub fn advance_time(&mut self, ms: u64) {
        for fired in self.dom.advance_time(ms) {
            match self.pending {
                Some((id, ticket)) if id == fired => {
                    self.pending = None;
                    self.widget.expire_banner(&mut self.state, ticket);
                }
                _ => trace!(?fired, "unrelated timeout fired"),
            }
        }
        self.render();
    }

    /// Current value of the display field
    #[must_use]
    pub fn display_value(&self) -> &str {
        self.dom.get_element_value(DISPLAY_ID).unwrap_or_default()
    }

    /// Banner text while the banner is visible
    #[must_use]
    pub fn banner_text(&self) -> Option<&str> {
        if self.dom.is_visible(BANNER_ID) {
            self.dom.get_element_text(BANNER_TEXT_ID)
        } else {
            None
        }
    }

    fn on_click(&mut self, element_id: &str) -> Option<Reaction> {
        if self.dom.is_disabled(element_id) {
            trace!(element_id, "click on disabled element");
            return None;
        }

        let reaction = match self.keypad.handle_click(element_id)? {
            KeypadAction::Equals => self.widget.evaluate(&mut self.state),
            KeypadAction::Clear => self.widget.clear(&mut self.state),
            _ => {
                let value = self.dom.data_value(element_id)?.to_string();
                self.widget.press(&mut self.state, &value)
            }
        };
        Some(reaction)
    }

    fn apply(&mut self, reaction: Reaction) -> Outcome {
        if reaction.timer.is_some() || reaction.outcome == Outcome::Cleared {
            if let Some((previous, _)) = self.pending.take() {
                self.dom.clear_timeout(previous);
            }
        }
        if let Some(timer) = reaction.timer {
            let id = self.dom.set_timeout(timer.delay_ms);
            self.pending = Some((id, timer.ticket));
        }
        reaction.outcome
    }

    /// Synchronizes DOM state with widget state
    fn render(&mut self) {
        let banner = self.state.banner();
        self.dom
            .set_element_value(DISPLAY_ID, self.state.expression());
        self.dom
            .set_disabled(EQUALS_ID, !self.state.equals_enabled());
        self.dom
            .set_element_text(BANNER_TEXT_ID, banner.message().unwrap_or_default());
        self.dom.set_visible(BANNER_ID, banner.is_visible());
    }
}

impl WidgetDriver for WasmDriver {
    fn press(&mut self, value: &str) {
        let id = self
            .keypad
            .find_button_by_value(value)
            .map(|button| button.id.clone());
        if let Some(id) = id {
            self.click(&id);
        }
    }

    fn press_equals(&mut self) {
        self.click(EQUALS_ID);
    }

    fn press_enter(&mut self) {
        self.key_down("Enter");
    }

    fn press_clear(&mut self) {
        self.click(CLEAR_ID);
    }

    fn type_text(&mut self, text: &str) {
        self.type_input(text);
    }

    fn advance_time(&mut self, ms: u64) {
        Self::advance_time(self, ms);
    }

    fn display(&self) -> String {
        self.display_value().to_string()
    }

    fn banner(&self) -> Option<String> {
        self.banner_text().map(str::to_string)
    }

    fn equals_enabled(&self) -> bool {
        !self.dom.is_disabled(EQUALS_ID)
    }
}
