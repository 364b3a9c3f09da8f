//! Browser WASM bindings for the calculator widget
//!
//! Builds the widget inside a host element, wires DOM listeners to the
//! widget handlers and schedules banner hides with `setTimeout`.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    console, Document, Element, Event, HtmlButtonElement, HtmlElement, HtmlInputElement,
    KeyboardEvent, Window,
};

use super::dom::{BANNER_ID, BANNER_TEXT_ID, DISPLAY_ID, KEYPAD_ID};
use super::keypad::{KeypadAction, WasmKeypad};
use crate::config::WidgetConfig;
use crate::core::widget::{BannerTimer, Outcome, Reaction, Widget, WidgetState};

/// Elements the widget renders into
struct View {
    display: HtmlInputElement,
    banner: HtmlElement,
    banner_text: HtmlElement,
    equals: HtmlButtonElement,
}

impl View {
    fn render(&self, state: &WidgetState) -> Result<(), JsValue> {
        let banner = state.banner();
        self.display.set_value(state.expression());
        self.equals.set_disabled(!state.equals_enabled());
        self.banner_text.set_text_content(banner.message());
        self.banner
            .style()
            .set_property("display", banner_display(banner.is_visible()))
    }
}

struct Inner {
    widget: Widget,
    state: WidgetState,
    view: View,
    window: Window,
    pending: Option<i32>,
}

type Shared = Rc<RefCell<Inner>>;

/// Browser calculator - the main WASM entry point
#[wasm_bindgen]
pub struct BrowserCalculator {
    inner: Shared,
}

impl fmt::Debug for BrowserCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("BrowserCalculator")
            .field("state", &inner.state)
            .field("pending", &inner.pending)
            .finish_non_exhaustive()
    }
}

#[wasm_bindgen]
impl BrowserCalculator {
    /// Builds the widget inside the element with id `container_id`
    pub fn mount(container_id: &str) -> Result<BrowserCalculator, JsValue> {
        Self::mount_with(container_id, &WidgetConfig::default())
    }

    /// Like [`BrowserCalculator::mount`], with a JSON configuration
    #[wasm_bindgen(js_name = mountWithConfig)]
    pub fn mount_with_config(
        container_id: &str,
        config_json: &str,
    ) -> Result<BrowserCalculator, JsValue> {
        let config = WidgetConfig::from_json_str(config_json)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Self::mount_with(container_id, &config)
    }

    /// The committed expression
    #[wasm_bindgen(getter)]
    pub fn expression(&self) -> String {
        self.inner.borrow().state.expression().to_string()
    }

    /// Whether the equals button is enabled
    #[wasm_bindgen(getter, js_name = equalsEnabled)]
    pub fn equals_enabled(&self) -> bool {
        self.inner.borrow().state.equals_enabled()
    }

    /// The banner message while visible
    #[wasm_bindgen(getter, js_name = bannerMessage)]
    pub fn banner_message(&self) -> Option<String> {
        self.inner
            .borrow()
            .state
            .banner()
            .message()
            .map(str::to_string)
    }

    /// Resets the widget
    pub fn clear(&self) {
        dispatch(&self.inner, Widget::clear);
    }
}

impl BrowserCalculator {
    fn mount_with(container_id: &str, config: &WidgetConfig) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{container_id}")))?;
        container.set_class_name("calculator");

        let display: HtmlInputElement = create(&document, "input")?;
        display.set_id(DISPLAY_ID);
        display.set_type("text");
        container.append_child(&display)?;

        let banner: HtmlElement = create(&document, "div")?;
        banner.set_id(BANNER_ID);
        banner.set_class_name("error");
        let banner_text: HtmlElement = create(&document, "span")?;
        banner_text.set_id(BANNER_TEXT_ID);
        banner.append_child(&banner_text)?;
        container.append_child(&banner)?;

        let grid: HtmlElement = create(&document, "div")?;
        grid.set_id(KEYPAD_ID);
        grid.set_class_name("keypad");
        grid.style().set_property("display", "grid")?;
        container.append_child(&grid)?;

        let keypad = WasmKeypad::new();
        let mut buttons = Vec::with_capacity(keypad.button_count());
        let mut equals = None;
        for def in keypad.buttons() {
            let button: HtmlButtonElement = create(&document, "button")?;
            button.set_id(&def.id);
            button.set_class_name("btn");
            button.set_text_content(Some(def.action.label().as_str()));
            button.style().set_property("grid-area", &def.grid_area())?;
            if let Some(value) = def.action.data_value() {
                button.set_attribute("data-value", &value)?;
            }
            grid.append_child(&button)?;
            if def.action == KeypadAction::Equals {
                equals = Some(button.clone());
            }
            buttons.push((def.action, button));
        }
        let equals = equals.ok_or_else(|| JsValue::from_str("keypad has no equals button"))?;

        let view = View {
            display: display.clone(),
            banner,
            banner_text,
            equals,
        };
        let state = WidgetState::new();
        view.render(&state)?;

        let inner = Rc::new(RefCell::new(Inner {
            widget: Widget::from_config(config),
            state,
            view,
            window,
            pending: None,
        }));

        for (action, button) in buttons {
            listen_click(&inner, action, &button)?;
        }
        listen_input(&inner, &display)?;
        listen_keys(&inner, &document)?;

        console::log_1(&format!("calc-widget mounted in #{container_id}").into());
        Ok(Self { inner })
    }
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T, JsValue> {
    document
        .create_element(tag)?
        .dyn_into::<T>()
        .map_err(JsValue::from)
}

fn listen_click(
    shared: &Shared,
    action: KeypadAction,
    button: &HtmlButtonElement,
) -> Result<(), JsValue> {
    let handler = Rc::clone(shared);
    let target: Element = button.clone().into();
    let on_click = Closure::wrap(Box::new(move |_event: Event| match action {
        KeypadAction::Equals => dispatch(&handler, Widget::evaluate),
        KeypadAction::Clear => dispatch(&handler, Widget::clear),
        _ => {
            if let Some(value) = target.get_attribute("data-value") {
                dispatch(&handler, |widget, state| widget.press(state, &value));
            }
        }
    }) as Box<dyn FnMut(Event)>);
    button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}

fn listen_input(shared: &Shared, display: &HtmlInputElement) -> Result<(), JsValue> {
    let handler = Rc::clone(shared);
    let field = display.clone();
    let on_input = Closure::wrap(Box::new(move |_event: Event| {
        let raw = field.value();
        dispatch(&handler, |widget, state| widget.input_text(state, &raw));
    }) as Box<dyn FnMut(Event)>);
    display.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
    on_input.forget();
    Ok(())
}

fn listen_keys(shared: &Shared, document: &Document) -> Result<(), JsValue> {
    let handler = Rc::clone(shared);
    let on_key = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        let key = event.key();
        if KeypadAction::from_key(&key).is_some() {
            // the widget owns these keys: no raw dot in the display, and no
            // activation of whichever keypad button holds focus
            event.prevent_default();
            dispatch(&handler, |widget, state| widget.key_down(state, &key));
        }
    }) as Box<dyn FnMut(KeyboardEvent)>);
    document.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
    on_key.forget();
    Ok(())
}

/// Runs one handler, schedules or cancels the banner hide, and re-renders
fn dispatch<F>(shared: &Shared, handler: F)
where
    F: FnOnce(&Widget, &mut WidgetState) -> Reaction,
{
    let mut guard = shared.borrow_mut();
    let inner = &mut *guard;
    let reaction = handler(&inner.widget, &mut inner.state);

    if reaction.timer.is_some() || reaction.outcome == Outcome::Cleared {
        if let Some(handle) = inner.pending.take() {
            inner.window.clear_timeout_with_handle(handle);
        }
    }
    if let Some(timer) = reaction.timer {
        match schedule_hide(Rc::downgrade(shared), &inner.window, timer) {
            Ok(handle) => inner.pending = Some(handle),
            Err(err) => console::error_2(&"failed to schedule banner hide".into(), &err),
        }
    }

    if let Err(err) = inner.view.render(&inner.state) {
        console::error_1(&err);
    }
}

fn schedule_hide(
    weak: Weak<RefCell<Inner>>,
    window: &Window,
    timer: BannerTimer,
) -> Result<i32, JsValue> {
    let callback = Closure::once_into_js(move || {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let mut guard = shared.borrow_mut();
        let inner = &mut *guard;
        inner.pending = None;
        inner.widget.expire_banner(&mut inner.state, timer.ticket);
        if let Err(err) = inner.view.render(&inner.state) {
            console::error_1(&err);
        }
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        timeout_delay(timer.delay_ms),
    )
}

/// Clamps a delay to what `setTimeout` accepts
fn timeout_delay(delay_ms: u64) -> i32 {
    i32::try_from(delay_ms).unwrap_or(i32::MAX)
}

/// CSS `display` value for the banner
const fn banner_display(visible: bool) -> &'static str {
    if visible {
        "block"
    } else {
        "none"
    }
}

/// Initialize the module in the browser
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console::log_1(&"calc-widget WASM initialized".into());
}
