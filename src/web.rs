//! Browser binding for [`CameraControls`] (`web` feature).
//!
//! [`DomBinding`] registers the DOM listeners a controller needs on
//! `connect` and removes every one of them on `disconnect` or drop.
//! Events are converted to [`InputEvent`] values and key codes and fed to
//! the shared controller.

use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, HtmlElement, KeyboardEvent, PointerEvent,
    WheelEvent,
};

use crate::controls::CameraControls;
use crate::input::{
    InputEvent, MouseButtons, PointerInput, PointerType, Rect, WheelDeltaMode, WheelInput,
};

/// Route `log` output to the browser console and install the panic hook.
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(level) {
        web_sys::console::warn_1(&format!("logger already installed: {e}").into());
    }
}

/// Whether the browser runs on macOS, for wheel normalization.
#[must_use]
pub fn is_mac() -> bool {
    web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .is_some_and(|ua| ua.contains("Mac"))
}

type Handler = Closure<dyn FnMut(Event)>;

struct Registration {
    target: EventTarget,
    name: &'static str,
    handler: Handler,
}

/// Paired DOM listeners driving a shared controller.
pub struct DomBinding {
    controls: Rc<RefCell<CameraControls>>,
    element: HtmlElement,
    registrations: Vec<Registration>,
}

impl std::fmt::Debug for DomBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomBinding")
            .field("listeners", &self.registrations.len())
            .finish_non_exhaustive()
    }
}

impl DomBinding {
    /// Bind `controls` to `element`. Nothing is registered until
    /// [`connect`](Self::connect).
    #[must_use]
    pub fn new(controls: Rc<RefCell<CameraControls>>, element: HtmlElement) -> Self {
        Self {
            controls,
            element,
            registrations: Vec::new(),
        }
    }

    /// Register every listener and connect the controller. Returns `false`
    /// when already connected.
    pub fn connect(&mut self) -> bool {
        if !self.registrations.is_empty() {
            log::warn!("DomBinding is already connected; ignoring connect()");
            return false;
        }
        {
            let mut controls = self.controls.borrow_mut();
            if !controls.connect() {
                return false;
            }
            controls.set_mac_wheel(is_mac());
            controls.set_element_rect(element_rect(&self.element));
        }

        let element: EventTarget = self.element.clone().into();
        self.listen_pointers(&element);
        self.listen_wheel(&element);
        self.listen(&element, "contextmenu", false, |event| event.prevent_default());

        if let Some(window) = web_sys::window() {
            if let Some(document) = window.document() {
                self.listen_pointer_lock(&document.into());
            }
            self.listen_keys(&window.into());
        }
        log::debug!("DomBinding: {} listeners registered", self.registrations.len());
        true
    }

    /// Remove every listener and disconnect the controller.
    pub fn disconnect(&mut self) {
        if self.registrations.is_empty() {
            return;
        }
        for registration in self.registrations.drain(..) {
            let callback = registration.handler.as_ref().unchecked_ref();
            if let Err(e) = registration
                .target
                .remove_event_listener_with_callback(registration.name, callback)
            {
                log::warn!("failed to remove {} listener: {e:?}", registration.name);
            }
        }
        with_controls(&self.controls, CameraControls::disconnect);
    }

    /// Request pointer lock on the element and start a locked drag.
    pub fn lock_pointer(&self) {
        self.element.request_pointer_lock();
        with_controls(&self.controls, CameraControls::lock_pointer);
    }

    fn listen<F>(&mut self, target: &EventTarget, name: &'static str, passive: bool, f: F)
    where
        F: FnMut(Event) + 'static,
    {
        let handler = Closure::<dyn FnMut(Event)>::new(f);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        let added = target.add_event_listener_with_callback_and_add_event_listener_options(
            name,
            handler.as_ref().unchecked_ref(),
            &options,
        );
        if let Err(e) = added {
            log::warn!("failed to add {name} listener: {e:?}");
            return;
        }
        self.registrations.push(Registration {
            target: target.clone(),
            name,
            handler,
        });
    }

    fn listen_pointers(&mut self, target: &EventTarget) {
        type Make = fn(PointerInput) -> InputEvent;
        let kinds: [(&'static str, Make); 4] = [
            ("pointerdown", InputEvent::PointerDown),
            ("pointermove", InputEvent::PointerMove),
            ("pointerup", InputEvent::PointerUp),
            ("pointercancel", InputEvent::PointerCancel),
        ];
        for (name, make) in kinds {
            let controls = Rc::clone(&self.controls);
            let element = self.element.clone();
            let is_down = name == "pointerdown";
            self.listen(target, name, false, move |event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                if is_down {
                    let _ = element.set_pointer_capture(event.pointer_id());
                }
                let input = pointer_input(event);
                with_controls(&controls, |c| {
                    if is_down {
                        c.set_element_rect(element_rect(&element));
                    }
                    if c.handle_input(make(input)) && input.pointer_type == PointerType::Touch {
                        event.prevent_default();
                    }
                });
            });
        }
    }

    fn listen_wheel(&mut self, target: &EventTarget) {
        let controls = Rc::clone(&self.controls);
        let element = self.element.clone();
        // Non-passive so page scrolling can be suppressed.
        self.listen(target, "wheel", false, move |event| {
            let Some(event) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            let input = WheelInput {
                position: DVec2::new(f64::from(event.client_x()), f64::from(event.client_y())),
                delta: DVec2::new(event.delta_x(), event.delta_y()),
                delta_mode: match event.delta_mode() {
                    WheelEvent::DOM_DELTA_LINE => WheelDeltaMode::Line,
                    WheelEvent::DOM_DELTA_PAGE => WheelDeltaMode::Page,
                    _ => WheelDeltaMode::Pixel,
                },
                ctrl_key: event.ctrl_key(),
            };
            with_controls(&controls, |c| {
                c.set_element_rect(element_rect(&element));
                if c.handle_input(InputEvent::Wheel(input)) {
                    event.prevent_default();
                }
            });
        });
    }

    fn listen_keys(&mut self, target: &EventTarget) {
        for (name, pressed) in [("keydown", true), ("keyup", false)] {
            let controls = Rc::clone(&self.controls);
            self.listen(target, name, true, move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if pressed && event.repeat() {
                    return;
                }
                let code = event.code();
                with_controls(&controls, |c| {
                    let _ = c.handle_key(&code, pressed);
                });
            });
        }
        // Keys released while the window is unfocused never send keyup.
        let controls = Rc::clone(&self.controls);
        self.listen(target, "blur", true, move |_| {
            with_controls(&controls, CameraControls::release_keys);
        });
    }

    fn listen_pointer_lock(&mut self, document: &EventTarget) {
        let controls = Rc::clone(&self.controls);
        self.listen(document, "pointerlockchange", true, move |_| {
            let locked = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.pointer_lock_element())
                .is_some();
            with_controls(&controls, |c| {
                let _ = c.handle_input(InputEvent::PointerLockChanged { locked });
            });
        });
    }
}

impl Drop for DomBinding {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Run `f` on the controller unless it is already borrowed (an event fired
/// from inside a controller listener).
fn with_controls<F>(controls: &Rc<RefCell<CameraControls>>, f: F)
where
    F: FnOnce(&mut CameraControls),
{
    match controls.try_borrow_mut() {
        Ok(mut c) => f(&mut c),
        Err(_) => log::warn!("re-entrant DOM event ignored while the controller is busy"),
    }
}

fn element_rect(element: &HtmlElement) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.width(), r.height())
}

fn pointer_input(event: &PointerEvent) -> PointerInput {
    let pointer_type = match event.pointer_type().as_str() {
        "touch" => PointerType::Touch,
        "pen" => PointerType::Pen,
        _ => PointerType::Mouse,
    };
    PointerInput {
        pointer_id: event.pointer_id(),
        pointer_type,
        position: DVec2::new(f64::from(event.client_x()), f64::from(event.client_y())),
        movement: DVec2::new(f64::from(event.movement_x()), f64::from(event.movement_y())),
        buttons: MouseButtons::from_bits_truncate(u32::from(event.buttons())),
    }
}
