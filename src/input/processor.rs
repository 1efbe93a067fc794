//! Converts raw platform events into camera gestures.
//!
//! The `InputProcessor` owns all transient input state (active pointers,
//! pointer lock, drag baselines, pinch distance) and the button/touch
//! binding table. It is the only thing that sits between raw pointer and
//! wheel events and the controller's gesture application in
//! [`CameraControls`](crate::controls::CameraControls).

use glam::DVec2;

use super::action::Action;
use super::event::{
    InputEvent, MouseButton, MouseButtons, PointerInput, PointerType, Rect,
    WheelDeltaMode, WheelInput,
};
use super::pointer::{PointerRecord, PointerTracker, LOCKED_POINTER_ID};
use crate::options::BindingOptions;

/// Drag delta for one pointer-move, with the action it applies to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragInput {
    /// Active action for this sample.
    pub action: Action,
    /// Screen-space delta in pixels; positive when the pointer moved left/up.
    pub delta: DVec2,
    /// Decrease in distance between the first two touches since the last
    /// sample (positive when pinching in). Zero outside pinch gestures.
    pub pinch_delta: f64,
    /// Where the drag began, in normalized device coordinates.
    pub start_ndc: DVec2,
    /// Current pointer centroid, in normalized device coordinates.
    pub centroid_ndc: DVec2,
}

/// One normalized wheel step, with the action bound to the wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGesture {
    /// The wheel binding.
    pub action: Action,
    /// Platform-normalized scroll amount (negative = scroll down).
    pub delta: f64,
    /// Raw pixel delta, used when the wheel rotates or trucks.
    pub raw: DVec2,
    /// Cursor position in normalized device coordinates.
    pub ndc: DVec2,
}

/// What the controller should do in response to an input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// First pointer of a gesture went down.
    Start(Action),
    /// Pointer set changed mid-gesture; re-sync end state to current.
    Retarget(Action),
    /// Pointer moved.
    Drag(DragInput),
    /// Wheel tick (no start/end bracket).
    Wheel(WheelGesture),
    /// Last pointer released or gesture cancelled.
    End,
}

/// Converts raw input events into [`Gesture`]s.
///
/// # Usage
///
/// ```ignore
/// processor.set_element_rect(Rect::new(0.0, 0.0, 800.0, 600.0));
/// if let Some(gesture) = processor.handle_event(event) {
///     controls.apply_gesture(gesture);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct InputProcessor {
    pointers: PointerTracker,
    /// Synthetic pointer-lock pointer is active.
    locked: bool,
    bindings: BindingOptions,
    element_rect: Rect,
    viewport: Option<Rect>,
    interactive_area: Rect,
    action: Action,
    last_drag_position: DVec2,
    drag_start_position: DVec2,
    last_pinch_distance: f64,
    mac_wheel: bool,
}

impl InputProcessor {
    /// Create a processor with the given bindings.
    #[must_use]
    pub fn new(bindings: BindingOptions) -> Self {
        Self {
            pointers: PointerTracker::new(),
            locked: false,
            bindings,
            element_rect: Rect::default(),
            viewport: None,
            interactive_area: Rect::UNIT,
            action: Action::NONE,
            last_drag_position: DVec2::ZERO,
            drag_start_position: DVec2::ZERO,
            last_pinch_distance: 0.0,
            mac_wheel: cfg!(target_os = "macos"),
        }
    }

    /// Current bindings.
    #[must_use]
    pub fn bindings(&self) -> &BindingOptions {
        &self.bindings
    }

    /// Replace the bindings. Takes effect on the next event.
    pub fn set_bindings(&mut self, bindings: BindingOptions) {
        self.bindings = bindings;
    }

    /// Set the element's client rectangle. Must be called before input is
    /// fed and whenever the element is resized or moved.
    pub fn set_element_rect(&mut self, rect: Rect) {
        self.element_rect = rect;
    }

    /// Restrict pointer math to a sub-viewport of the element (pixels,
    /// origin bottom-left). `None` uses the whole element.
    pub fn set_viewport(&mut self, viewport: Option<Rect>) {
        self.viewport = viewport;
    }

    /// Only accept pointer-down and wheel events inside `area`, given in
    /// normalized `[0, 1]` element coordinates.
    pub fn set_interactive_area(&mut self, area: Rect) {
        self.interactive_area = Rect::new(
            area.x.clamp(0.0, 1.0),
            area.y.clamp(0.0, 1.0),
            area.width.clamp(0.0, 1.0),
            area.height.clamp(0.0, 1.0),
        );
    }

    /// Use macOS wheel normalization (`-1` instead of `-3`).
    pub fn set_mac_wheel(&mut self, mac: bool) {
        self.mac_wheel = mac;
    }

    /// Rectangle used for pointer math: the element, or the viewport inside it.
    #[must_use]
    pub fn effective_rect(&self) -> Rect {
        let el = self.element_rect;
        match self.viewport {
            Some(vp) => Rect::new(
                el.x + vp.x,
                el.y + el.height - vp.height - vp.y,
                vp.width,
                vp.height,
            ),
            None => el,
        }
    }

    /// Action of the gesture in progress.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Whether any pointer is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        !self.pointers.is_empty()
    }

    /// Whether the synthetic pointer-lock pointer is active.
    #[must_use]
    pub fn is_pointer_locked(&self) -> bool {
        self.locked
    }

    /// Active pointer records.
    #[must_use]
    pub fn pointers(&self) -> &[PointerRecord] {
        self.pointers.pointers()
    }

    /// Process a raw input event and return zero or one gestures.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<Gesture> {
        let rect = self.effective_rect();
        if rect.width <= 0.0 || rect.height <= 0.0 {
            log::debug!("input ignored: element rect has no area");
            return None;
        }
        match event {
            InputEvent::PointerDown(input) => self.pointer_down(&input),
            InputEvent::PointerMove(input) => self.pointer_move(&input),
            InputEvent::PointerUp(input) | InputEvent::PointerCancel(input) => {
                self.pointer_up(&input)
            }
            InputEvent::Wheel(wheel) => self.wheel(&wheel),
            InputEvent::PointerLockChanged { locked: true } => None,
            InputEvent::PointerLockChanged { locked: false } => {
                self.unlock_pointer()
            }
        }
    }

    /// Start a pointer-lock drag driven by relative motion only.
    pub fn lock_pointer(&mut self) -> Option<Gesture> {
        if self.locked {
            return None;
        }
        self.locked = true;
        let first = self.pointers.is_empty();
        let _ = self.pointers.insert(PointerRecord::locked());
        self.action = self.resolve_action(PointerType::Mouse, MouseButtons::empty());
        self.rebaseline();
        Some(self.begin(first))
    }

    /// Release pointer lock; ends the gesture in progress.
    pub fn unlock_pointer(&mut self) -> Option<Gesture> {
        if !self.locked {
            return None;
        }
        self.cancel()
    }

    /// Drop every active pointer. Returns [`Gesture::End`] if a gesture was
    /// in progress.
    pub fn cancel(&mut self) -> Option<Gesture> {
        let active = !self.pointers.is_empty() || self.locked;
        self.pointers.clear();
        self.locked = false;
        self.action = Action::NONE;
        active.then_some(Gesture::End)
    }

    fn pointer_down(&mut self, input: &PointerInput) -> Option<Gesture> {
        if !self.in_interactive_area(input.position) {
            return None;
        }

        let mouse_button = match input.pointer_type {
            PointerType::Mouse => MouseButton::primary_of(input.buttons),
            PointerType::Touch | PointerType::Pen => None,
        };
        if self.locked && input.buttons.contains(MouseButtons::LEFT) {
            return None;
        }

        // Taken before eviction: a stale pointer's gesture never ended, so
        // the replacement continues it.
        let first = self.pointers.is_empty();
        let _ = self
            .pointers
            .insert(PointerRecord::from_input(input, mouse_button));
        self.action = self.resolve_action(input.pointer_type, input.buttons);
        self.rebaseline();
        Some(self.begin(first))
    }

    fn pointer_move(&mut self, input: &PointerInput) -> Option<Gesture> {
        let id = if self.locked {
            LOCKED_POINTER_ID
        } else {
            input.pointer_id
        };
        let record = self.pointers.get_mut(id)?;
        record.position = input.position;
        record.delta = input.movement;

        self.action = self.resolve_action(input.pointer_type, input.buttons);

        let centroid = self.pointers.centroid();
        let delta = if self.locked {
            -input.movement
        } else {
            self.last_drag_position - centroid
        };
        self.last_drag_position = centroid;

        let mut pinch_delta = 0.0;
        if self.action.is_pinch() {
            if let Some(distance) = self.pointers.pinch_distance() {
                pinch_delta = self.last_pinch_distance - distance;
                self.last_pinch_distance = distance;
            }
        }

        let rect = self.effective_rect();
        Some(Gesture::Drag(DragInput {
            action: self.action,
            delta,
            pinch_delta,
            start_ndc: rect.to_ndc(self.drag_start_position),
            centroid_ndc: rect.to_ndc(centroid),
        }))
    }

    fn pointer_up(&mut self, input: &PointerInput) -> Option<Gesture> {
        let _ = self.pointers.remove(input.pointer_id)?;
        if self.pointers.is_empty() {
            self.locked = false;
            self.action = Action::NONE;
            return Some(Gesture::End);
        }
        self.action = self.resolve_action(input.pointer_type, input.buttons);
        self.rebaseline();
        Some(Gesture::Retarget(self.action))
    }

    fn wheel(&self, wheel: &WheelInput) -> Option<Gesture> {
        let action = self.bindings.mouse.wheel;
        if action.is_empty() || !self.in_interactive_area(wheel.position) {
            return None;
        }

        let factor = if self.mac_wheel { -1.0 } else { -3.0 };
        let delta = if wheel.delta_mode == WheelDeltaMode::Line || wheel.ctrl_key {
            wheel.delta.y / factor
        } else {
            wheel.delta.y / (factor * 10.0)
        };

        Some(Gesture::Wheel(WheelGesture {
            action,
            delta,
            raw: wheel.delta,
            ndc: self.effective_rect().to_ndc(wheel.position),
        }))
    }

    fn begin(&self, first: bool) -> Gesture {
        if first {
            Gesture::Start(self.action)
        } else {
            Gesture::Retarget(self.action)
        }
    }

    /// Reset drag and pinch baselines after the pointer set changed so the
    /// next move produces no jump.
    fn rebaseline(&mut self) {
        let centroid = self.pointers.centroid();
        self.last_drag_position = centroid;
        self.drag_start_position = centroid;
        if let Some(distance) = self.pointers.pinch_distance() {
            self.last_pinch_distance = distance;
        }
    }

    fn resolve_action(&self, pointer_type: PointerType, buttons: MouseButtons) -> Action {
        let touch_count = self
            .pointers
            .pointers()
            .iter()
            .filter(|p| p.pointer_type == PointerType::Touch)
            .count();

        if pointer_type == PointerType::Touch {
            let touch = &self.bindings.touch;
            return match touch_count {
                0 => Action::NONE,
                1 => touch.one,
                2 => touch.two,
                _ => touch.three,
            };
        }

        let mouse = &self.bindings.mouse;
        let mut action = Action::NONE;
        if self.locked || buttons.contains(MouseButtons::LEFT) {
            action |= mouse.left;
        }
        if buttons.contains(MouseButtons::MIDDLE) {
            action |= mouse.middle;
        }
        if buttons.contains(MouseButtons::RIGHT) {
            action |= mouse.right;
        }
        action
    }

    fn in_interactive_area(&self, position: DVec2) -> bool {
        let el = self.element_rect;
        let normalized = DVec2::new(
            (position.x - el.x) / el.width,
            (position.y - el.y) / el.height,
        );
        self.interactive_area.contains(normalized)
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new(BindingOptions::default())
    }
}
