//! Mock DOM for headless testing
//!
//! Models the handful of elements the widget touches plus a virtual
//! `setTimeout` queue, so the banner lifecycle can be driven without a
//! browser or a wall clock.

use std::collections::HashMap;

use super::keypad::WasmKeypad;

/// DOM id of the display field
pub const DISPLAY_ID: &str = "display";
/// DOM id of the banner container
pub const BANNER_ID: &str = "error-msg-div";
/// DOM id of the banner text
pub const BANNER_TEXT_ID: &str = "error-msg";
/// DOM id of the keypad grid holding the buttons
pub const KEYPAD_ID: &str = "keypad";

/// Represents a DOM element for testing
#[derive(Debug, Clone, PartialEq)]
pub struct DomElement {
    /// Element ID
    pub id: String,
    /// Element tag name
    pub tag: String,
    /// Text content
    pub text_content: String,
    /// Form value (input elements)
    pub value: String,
    /// Element attributes
    pub attributes: HashMap<String, String>,
    /// CSS classes
    pub classes: Vec<String>,
    /// Whether element is visible
    pub visible: bool,
    /// Whether the element ignores interaction
    pub disabled: bool,
    /// Child elements
    pub children: Vec<DomElement>,
}

impl Default for DomElement {
    fn default() -> Self {
        Self::new("div")
    }
}

impl DomElement {
    /// Creates a new DOM element with the given tag
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            id: String::new(),
            tag: tag.to_string(),
            text_content: String::new(),
            value: String::new(),
            attributes: HashMap::new(),
            classes: Vec::new(),
            visible: true,
            disabled: false,
            children: Vec::new(),
        }
    }

    /// Creates an element with an ID
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Sets the text content
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text_content = text.to_string();
        self
    }

    /// Adds a class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Sets an attribute
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Adds a child element
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Sets initial visibility
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Checks if element has a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Gets an attribute value
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// DOM events that can be dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    /// Click event on an element
    Click {
        /// The ID of the clicked element
        element_id: String,
    },
    /// Input event with new value
    Input {
        /// The ID of the input element
        element_id: String,
        /// The new value entered
        value: String,
    },
    /// Document-level key down
    KeyDown {
        /// The key that was pressed, as in `KeyboardEvent.key`
        key: String,
    },
}

impl DomEvent {
    /// Creates a click event
    #[must_use]
    pub fn click(element_id: &str) -> Self {
        Self::Click {
            element_id: element_id.to_string(),
        }
    }

    /// Creates an input event
    #[must_use]
    pub fn input(element_id: &str, value: &str) -> Self {
        Self::Input {
            element_id: element_id.to_string(),
            value: value.to_string(),
        }
    }

    /// Creates a key down event
    #[must_use]
    pub fn key_down(key: &str) -> Self {
        Self::KeyDown {
            key: key.to_string(),
        }
    }
}

/// Handle returned by [`MockDom::set_timeout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeoutId(u32);

#[derive(Debug, Clone, Copy)]
struct PendingTimeout {
    id: TimeoutId,
    due_ms: u64,
}

/// Mock DOM with a virtual clock
#[derive(Debug)]
pub struct MockDom {
    /// Layout tree as built; live element state is kept in the id registry
    pub root: DomElement,
    elements: HashMap<String, DomElement>,
    event_history: Vec<DomEvent>,
    focused: Option<String>,
    now_ms: u64,
    next_timeout: u32,
    timeouts: Vec<PendingTimeout>,
}

impl Default for MockDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDom {
    /// Creates an empty mock DOM
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: DomElement::new("div").with_id("root"),
            elements: HashMap::new(),
            event_history: Vec::new(),
            focused: None,
            now_ms: 0,
            next_timeout: 1,
            timeouts: Vec::new(),
        }
    }

    /// Creates the calculator structure: display, hidden banner, keypad
    #[must_use]
    pub fn calculator(keypad: &WasmKeypad) -> Self {
        let mut dom = Self::new();

        let display = DomElement::new("input")
            .with_id(DISPLAY_ID)
            .with_attr("type", "text");

        let banner_text = DomElement::new("span").with_id(BANNER_TEXT_ID);
        let banner = DomElement::new("div")
            .with_id(BANNER_ID)
            .with_class("error")
            .with_child(banner_text.clone())
            .hidden();

        let buttons = keypad.create_dom_elements();

        let mut grid = DomElement::new("div")
            .with_id(KEYPAD_ID)
            .with_class("keypad")
            .with_attr("style", "display: grid");
        for button in &buttons {
            grid = grid.with_child(button.clone());
        }

        dom.root = DomElement::new("div")
            .with_id("calculator")
            .with_class("calculator")
            .with_child(display.clone())
            .with_child(banner.clone())
            .with_child(grid);

        dom.register_element(display);
        dom.register_element(banner);
        dom.register_element(banner_text);
        for button in buttons {
            dom.register_element(button);
        }

        dom
    }

    /// Registers an element for ID lookup
    pub fn register_element(&mut self, element: DomElement) {
        if !element.id.is_empty() {
            self.elements.insert(element.id.clone(), element);
        }
    }

    /// Gets an element by ID
    #[must_use]
    pub fn get_element(&self, id: &str) -> Option<&DomElement> {
        self.elements.get(id)
    }

    /// Records an event and applies its direct effect on the DOM.
    ///
    /// An input event writes its value into the target element; a click
    /// focuses its target unless it is disabled.
    pub fn dispatch_event(&mut self, event: DomEvent) {
        match &event {
            DomEvent::Input { element_id, value } => {
                self.set_element_value(element_id, value);
                self.focused = Some(element_id.clone());
            }
            DomEvent::Click { element_id } => {
                if self.get_element(element_id).is_some() && !self.is_disabled(element_id) {
                    self.focused = Some(element_id.clone());
                }
            }
            DomEvent::KeyDown { .. } => {}
        }
        self.event_history.push(event);
    }

    /// Id of the element holding focus
    #[must_use]
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Gets the event history
    #[must_use]
    pub fn event_history(&self) -> &[DomEvent] {
        &self.event_history
    }

    /// Updates element text by ID
    pub fn set_element_text(&mut self, id: &str, text: &str) {
        if let Some(elem) = self.elements.get_mut(id) {
            text.clone_into(&mut elem.text_content);
        }
    }

    /// Gets element text by ID
    #[must_use]
    pub fn get_element_text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text_content.as_str())
    }

    /// Updates an element's form value by ID
    pub fn set_element_value(&mut self, id: &str, value: &str) {
        if let Some(elem) = self.elements.get_mut(id) {
            value.clone_into(&mut elem.value);
        }
    }

    /// Gets an element's form value by ID
    #[must_use]
    pub fn get_element_value(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.value.as_str())
    }

    /// Shows or hides an element
    pub fn set_visible(&mut self, id: &str, visible: bool) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.visible = visible;
        }
    }

    /// Returns true if the element exists and is visible
    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.visible)
    }

    /// Enables or disables an element
    pub fn set_disabled(&mut self, id: &str, disabled: bool) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.disabled = disabled;
        }
    }

    /// Returns true if the element exists and is disabled
    #[must_use]
    pub fn is_disabled(&self, id: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.disabled)
    }

    /// Returns the `data-value` of the element, if any
    #[must_use]
    pub fn data_value(&self, id: &str) -> Option<&str> {
        self.elements.get(id).and_then(|e| e.get_attr("data-value"))
    }

    // ===== Virtual timers =====

    /// Current virtual time
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedules a timeout `delay_ms` from now
    pub fn set_timeout(&mut self, delay_ms: u64) -> TimeoutId {
        let id = TimeoutId(self.next_timeout);
        self.next_timeout = self.next_timeout.wrapping_add(1);
        self.timeouts.push(PendingTimeout {
            id,
            due_ms: self.now_ms.saturating_add(delay_ms),
        });
        id
    }

    /// Cancels a pending timeout; returns true if it was pending
    pub fn clear_timeout(&mut self, id: TimeoutId) -> bool {
        let before = self.timeouts.len();
        self.timeouts.retain(|t| t.id != id);
        self.timeouts.len() != before
    }

    /// Number of timeouts not yet fired
    #[must_use]
    pub fn pending_timeouts(&self) -> usize {
        self.timeouts.len()
    }

    /// Advances the clock and returns the timeouts that fired, earliest first
    pub fn advance_time(&mut self, ms: u64) -> Vec<TimeoutId> {
        self.now_ms = self.now_ms.saturating_add(ms);
        let now = self.now_ms;

        let mut fired: Vec<PendingTimeout> = Vec::new();
        self.timeouts.retain(|t| {
            if t.due_ms <= now {
                fired.push(*t);
                false
            } else {
                true
            }
        });
        fired.sort_by_key(|t| (t.due_ms, t.id.0));
        fired.into_iter().map(|t| t.id).collect()
    }
}
