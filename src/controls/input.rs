//! Applying user input: pointer gestures, wheel steps and held keys.

use std::f64::consts::TAU;

use glam::{DVec2, DVec3};

use super::{CameraControls, DollyDirection};
use crate::camera::Projection;
use crate::dispatch::ControlsEvent;
use crate::input::{Action, DragInput, Gesture, InputEvent, KeyAction, WheelGesture};

/// Scale from pinch or drag pixels to dolly steps.
const TOUCH_DOLLY_FACTOR: f64 = 1.0 / 8.0;

/// Each dolly or zoom step scales the distance by a power of this.
const DOLLY_STEP_BASE: f64 = 0.95;

// ── Pointer and wheel ──

impl CameraControls {
    /// Feed a platform input event. Returns `true` when it produced a
    /// gesture. Ignored while disabled or disconnected.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if !self.enabled || !self.connected {
            return false;
        }
        match self.input.handle_event(event) {
            Some(gesture) => {
                self.apply_gesture(gesture);
                true
            }
            None => false,
        }
    }

    /// Start a pointer-lock drag (left-button binding, relative motion).
    pub fn lock_pointer(&mut self) {
        if !self.enabled {
            return;
        }
        if let Some(gesture) = self.input.lock_pointer() {
            self.apply_gesture(gesture);
        }
    }

    /// Leave pointer lock, ending the locked drag.
    pub fn unlock_pointer(&mut self) {
        if let Some(gesture) = self.input.unlock_pointer() {
            self.apply_gesture(gesture);
        }
    }

    /// Drop every active pointer. Fires `controlend` if a drag was in
    /// progress.
    pub fn cancel(&mut self) {
        if let Some(gesture) = self.input.cancel() {
            self.apply_gesture(gesture);
        }
    }

    /// Apply one gesture to the rig.
    pub fn apply_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Start(action) => {
                self.sync_ends_for(action);
                self.dispatcher.dispatch(ControlsEvent::ControlStart);
            }
            Gesture::Retarget(action) => self.sync_ends_for(action),
            Gesture::Drag(drag) => self.apply_drag(&drag),
            Gesture::Wheel(wheel) => self.apply_wheel(&wheel),
            Gesture::End => {
                self.user = super::UserControl::default();
                self.dispatcher.dispatch(ControlsEvent::ControlEnd);
            }
        }
    }

    /// Restart the degrees of freedom `action` drives from where they are
    /// now, so a new drag does not inherit an unfinished transition.
    fn sync_ends_for(&mut self, action: Action) {
        let caps = action.capabilities();
        if caps.rotate {
            self.spherical_end.theta = self.spherical.theta;
            self.spherical_end.phi = self.spherical.phi;
            self.velocity.theta = 0.0;
            self.velocity.phi = 0.0;
        }
        if caps.truck || caps.screen_pan {
            self.target_end = self.target;
            self.velocity.target = DVec3::ZERO;
        }
        if caps.offset {
            self.focal_offset_end = self.focal_offset;
            self.velocity.focal_offset = DVec3::ZERO;
        }
    }

    fn apply_drag(&mut self, drag: &DragInput) {
        let caps = drag.action.capabilities();
        let delta = drag.delta;
        let to_cursor = self.options.behavior.dolly_to_cursor;

        if caps.rotate {
            self.rotate_internal(delta);
            self.user.rotate = true;
        }

        if caps.drag_dolly || caps.drag_zoom {
            let coord = if to_cursor { drag.start_ndc } else { DVec2::ZERO };
            let direction = if self.options.speeds.dolly_drag_inverted {
                -1.0
            } else {
                1.0
            };
            let amount = direction * delta.y * TOUCH_DOLLY_FACTOR;
            if caps.drag_dolly {
                self.dolly_internal(amount, coord);
                self.user.dolly = true;
            } else {
                self.zoom_internal(amount, coord);
                self.user.zoom = true;
            }
        }

        if caps.pinch_dolly || caps.pinch_zoom {
            let coord = if to_cursor { drag.centroid_ndc } else { DVec2::ZERO };
            let amount = drag.pinch_delta * TOUCH_DOLLY_FACTOR;
            if caps.pinch_dolly {
                self.dolly_internal(amount, coord);
                self.user.dolly = true;
            } else {
                self.zoom_internal(amount, coord);
                self.user.zoom = true;
            }
        }

        if caps.truck {
            let screen_space = !self.options.behavior.vertical_drag_to_forward;
            self.truck_internal(delta, false, screen_space);
            self.user.truck = true;
        }
        if caps.screen_pan {
            self.truck_internal(delta, false, true);
            self.user.truck = true;
        }
        if caps.offset {
            self.truck_internal(delta, true, false);
            self.user.offset = true;
        }

        self.dispatcher.dispatch(ControlsEvent::Control);
    }

    fn apply_wheel(&mut self, wheel: &WheelGesture) {
        let coord = if self.options.behavior.dolly_to_cursor {
            wheel.ndc
        } else {
            DVec2::ZERO
        };
        let action = wheel.action;

        if action.contains(Action::ROTATE) {
            self.rotate_internal(wheel.raw);
            self.user.rotate = true;
        }
        if action.contains(Action::TRUCK) {
            let screen_space = !self.options.behavior.vertical_drag_to_forward;
            self.truck_internal(wheel.raw, false, screen_space);
            self.user.truck = true;
        }
        if action.contains(Action::SCREEN_PAN) {
            self.truck_internal(wheel.raw, false, true);
            self.user.truck = true;
        }
        if action.contains(Action::OFFSET) {
            self.truck_internal(wheel.raw, true, false);
            self.user.offset = true;
        }
        if action.contains(Action::DOLLY) {
            self.dolly_internal(-wheel.delta, coord);
            self.user.dolly = true;
        }
        if action.contains(Action::ZOOM) {
            self.zoom_internal(-wheel.delta, coord);
            self.user.zoom = true;
        }

        self.dispatcher.dispatch(ControlsEvent::Control);
    }
}

// ── Input-driven motion ──

impl CameraControls {
    /// A full element-height drag turns the rig once around.
    fn rotate_internal(&mut self, delta: DVec2) {
        let height = self.input.effective_rect().height;
        let speeds = &self.options.speeds;
        let theta = TAU * speeds.azimuth_rotate_speed * delta.x / height;
        let phi = TAU * speeds.polar_rotate_speed * delta.y / height;
        let _ = self.rotate(theta, phi, true);
    }

    /// Scale the distance by `0.95^(-delta · dolly_speed)`. Positive
    /// `delta` dollies out.
    fn dolly_internal(&mut self, delta: f64, coord: DVec2) {
        let scale = DOLLY_STEP_BASE.powf(-delta * self.options.speeds.dolly_speed);
        let last_distance = self.spherical_end.radius;
        let distance = last_distance * scale;
        let clamped = self.options.limits.clamp_distance(distance);
        let overflow = clamped - distance;
        let infinity = self.options.behavior.infinity_dolly;
        let to_cursor = self.options.behavior.dolly_to_cursor;

        if infinity && to_cursor {
            let _ = self.dolly_to_no_clamp(distance, true);
        } else if infinity {
            // Past a limit: carry the target instead of the radius.
            let _ = self.dolly_in_fixed(overflow, true);
            let _ = self.dolly_to_no_clamp(clamped, true);
        } else {
            let _ = self.dolly_to_no_clamp(clamped, true);
        }

        if to_cursor {
            let reached = if infinity { distance } else { clamped };
            self.changed_dolly += reached - last_distance;
            self.dolly_control_coord = coord;
        }
        self.last_dolly_direction = DollyDirection::from_delta(delta);
    }

    /// Scale the zoom by `0.95^(delta · dolly_speed)`. Positive `delta`
    /// zooms out.
    fn zoom_internal(&mut self, delta: f64, coord: DVec2) {
        let scale = DOLLY_STEP_BASE.powf(delta * self.options.speeds.dolly_speed);
        let last_zoom = self.zoom_end;
        let _ = self.zoom_to(self.zoom * scale, true);

        if self.options.behavior.dolly_to_cursor {
            self.changed_zoom += self.zoom_end - last_zoom;
            self.dolly_control_coord = coord;
        }
    }

    /// Convert a pixel drag to world units at the target's depth, then
    /// truck, move forward, or shift the focal offset.
    fn truck_internal(&mut self, delta: DVec2, to_offset: bool, screen_space: bool) {
        let rect = self.input.effective_rect();
        let (x, y) = match self.camera.projection {
            Projection::Perspective { .. } => {
                let fov = self.camera.effective_fov().unwrap_or_default();
                let half_extent = (self.camera.position - self.target).length()
                    * (fov.to_radians() * 0.5).tan();
                let speed = self.options.speeds.truck_speed;
                (
                    speed * delta.x * half_extent / rect.height,
                    speed * delta.y * half_extent / rect.height,
                )
            }
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
            } => {
                let zoom = self.camera.zoom;
                (
                    delta.x * (right - left) / zoom / rect.width,
                    delta.y * (top - bottom) / zoom / rect.height,
                )
            }
        };

        if to_offset {
            let end = self.focal_offset_end;
            let _ = self.set_focal_offset(DVec3::new(end.x + x, end.y + y, end.z), true);
        } else if screen_space || !self.camera.is_perspective() {
            let _ = self.truck(x, y, true);
        } else {
            let _ = self.truck(x, 0.0, true);
            let _ = self.forward(-y, true);
        }
    }
}

// ── Keyboard ──

impl CameraControls {
    /// Report a key press or release by key code (e.g. `"KeyW"`). Returns
    /// `true` when the key is bound. The first held key fires
    /// `controlstart`; releasing the last one fires `controlend`.
    pub fn handle_key(&mut self, code: &str, pressed: bool) -> bool {
        if !self.enabled || !self.connected {
            return false;
        }
        let Some(action) = self.options.keybindings.lookup(code) else {
            return false;
        };

        if pressed {
            let was_idle = self.held_keys.is_empty();
            if self.held_keys.insert(action) && was_idle {
                self.dispatcher.dispatch(ControlsEvent::ControlStart);
            }
        } else if self.held_keys.remove(&action) && self.held_keys.is_empty() {
            self.user.rotate = false;
            self.user.truck = false;
            self.dispatcher.dispatch(ControlsEvent::ControlEnd);
        }
        true
    }

    /// Release every held key (focus loss, disable).
    pub fn release_keys(&mut self) {
        if self.held_keys.is_empty() {
            return;
        }
        self.held_keys.clear();
        self.user.rotate = false;
        self.user.truck = false;
        self.dispatcher.dispatch(ControlsEvent::ControlEnd);
    }

    /// Drive the rig from held keys for one tick of `dt` seconds.
    pub(super) fn apply_held_keys(&mut self, dt: f64) {
        if self.held_keys.is_empty() {
            return;
        }
        let step = self.options.keyboard.move_speed * dt;
        let turn = self.options.keyboard.rotate_speed * dt;

        let (mut forward, mut side, mut lift, mut azimuth, mut polar) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for key in &self.held_keys {
            match key {
                KeyAction::Forward => forward += step,
                KeyAction::Backward => forward -= step,
                KeyAction::TruckLeft => side -= step,
                KeyAction::TruckRight => side += step,
                KeyAction::Up => lift += step,
                KeyAction::Down => lift -= step,
                KeyAction::RotateLeft => azimuth += turn,
                KeyAction::RotateRight => azimuth -= turn,
                KeyAction::RotateUp => polar -= turn,
                KeyAction::RotateDown => polar += turn,
            }
        }

        let moving = forward != 0.0 || side != 0.0 || lift != 0.0;
        if forward != 0.0 {
            let _ = self.forward(forward, true);
        }
        if side != 0.0 {
            let _ = self.truck(side, 0.0, true);
        }
        if lift != 0.0 {
            let _ = self.elevate(lift, true);
        }
        let turning = azimuth != 0.0 || polar != 0.0;
        if turning {
            let _ = self.rotate(azimuth, polar, true);
        }

        self.user.truck |= moving;
        self.user.rotate |= turning;
        self.dispatcher.dispatch(ControlsEvent::Control);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::camera::Camera;
    use crate::input::{
        MouseButtons, PointerInput, PointerType, Rect, WheelDeltaMode, WheelInput,
    };
    use crate::options::ControlsOptions;

    const DT: f64 = 1.0 / 60.0;

    fn connected(options: ControlsOptions) -> CameraControls {
        let mut c = CameraControls::new(Camera::default(), options);
        c.set_element_rect(Rect::new(0.0, 0.0, 800.0, 600.0));
        assert!(c.connect());
        c
    }

    fn mouse(x: f64, y: f64, buttons: MouseButtons) -> PointerInput {
        PointerInput {
            pointer_id: 1,
            pointer_type: PointerType::Mouse,
            position: DVec2::new(x, y),
            movement: DVec2::ZERO,
            buttons,
        }
    }

    fn wheel(x: f64, y: f64, delta_y: f64) -> InputEvent {
        InputEvent::Wheel(WheelInput {
            position: DVec2::new(x, y),
            delta: DVec2::new(0.0, delta_y),
            delta_mode: WheelDeltaMode::Pixel,
            ctrl_key: false,
        })
    }

    fn record(c: &CameraControls) -> Rc<RefCell<Vec<ControlsEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for event in [
            ControlsEvent::ControlStart,
            ControlsEvent::Control,
            ControlsEvent::ControlEnd,
        ] {
            let log = Rc::clone(&log);
            let _ = c.add_event_listener(event, move |e| log.borrow_mut().push(e));
        }
        log
    }

    #[test]
    fn left_drag_rotates_with_control_events() {
        let mut c = connected(ControlsOptions::default());
        let log = record(&c);
        assert!(c.handle_input(InputEvent::PointerDown(mouse(400.0, 300.0, MouseButtons::LEFT))));
        assert!(c.handle_input(InputEvent::PointerMove(mouse(340.0, 300.0, MouseButtons::LEFT))));
        assert!(c.is_user_controlling());
        // Dragging left by 60 px of a 600 px element turns by +2π/10.
        let expected = TAU * 60.0 / 600.0;
        assert!((c.spherical(true).theta - expected).abs() < 1e-9);
        assert!(c.handle_input(InputEvent::PointerUp(mouse(340.0, 300.0, MouseButtons::empty()))));
        assert!(!c.is_user_controlling());
        assert_eq!(
            *log.borrow(),
            vec![
                ControlsEvent::ControlStart,
                ControlsEvent::Control,
                ControlsEvent::ControlEnd,
            ]
        );
    }

    #[test]
    fn replacing_a_stale_press_starts_control_once() {
        let mut c = connected(ControlsOptions::default());
        let log = record(&c);
        let _ = c.handle_input(InputEvent::PointerDown(mouse(400.0, 300.0, MouseButtons::LEFT)));
        let second = PointerInput {
            pointer_id: 2,
            ..mouse(420.0, 300.0, MouseButtons::LEFT)
        };
        assert!(c.handle_input(InputEvent::PointerDown(second)));
        assert!(c.handle_input(InputEvent::PointerMove(PointerInput {
            position: DVec2::new(360.0, 300.0),
            ..second
        })));
        assert!(c.spherical(true).theta > 0.0);
        assert!(c.handle_input(InputEvent::PointerUp(PointerInput {
            buttons: MouseButtons::empty(),
            ..second
        })));
        assert_eq!(
            *log.borrow(),
            vec![
                ControlsEvent::ControlStart,
                ControlsEvent::Control,
                ControlsEvent::ControlEnd,
            ]
        );
    }

    #[test]
    fn wheel_truck_follows_vertical_drag_option() {
        let mut options = ControlsOptions::default();
        options.bindings.mouse.wheel = Action::TRUCK;
        let mut c = connected(options.clone());
        assert!(c.handle_input(wheel(400.0, 300.0, 100.0)));
        let target = c.target(true);
        assert!(target.y.abs() > 1e-6);
        assert!(target.z.abs() < 1e-9);

        options.behavior.vertical_drag_to_forward = true;
        let mut c = connected(options);
        assert!(c.handle_input(wheel(400.0, 300.0, 100.0)));
        let target = c.target(true);
        assert!(target.y.abs() < 1e-9);
        assert!(target.z.abs() > 1e-6);
    }

    #[test]
    fn wheel_dollies_without_start_or_end() {
        let mut c = connected(ControlsOptions::default());
        let log = record(&c);
        let before = c.spherical(true).radius;
        // Scroll up: dolly in.
        assert!(c.handle_input(wheel(400.0, 300.0, -100.0)));
        assert!(c.spherical(true).radius < before);
        assert_eq!(*log.borrow(), vec![ControlsEvent::Control]);
        // Scroll down: dolly out.
        let mid = c.spherical(true).radius;
        assert!(c.handle_input(wheel(400.0, 300.0, 100.0)));
        assert!(c.spherical(true).radius > mid);
    }

    #[test]
    fn input_ignored_while_disabled_or_disconnected() {
        let mut c = CameraControls::new(Camera::default(), ControlsOptions::default());
        c.set_element_rect(Rect::new(0.0, 0.0, 800.0, 600.0));
        assert!(!c.handle_input(wheel(400.0, 300.0, -100.0)));

        assert!(c.connect());
        assert!(!c.connect());
        c.set_enabled(false);
        assert!(!c.handle_input(wheel(400.0, 300.0, -100.0)));
        assert!(!c.handle_key("KeyW", true));

        c.set_enabled(true);
        assert!(c.handle_input(wheel(400.0, 300.0, -100.0)));
    }

    #[test]
    fn disabling_mid_drag_ends_the_gesture() {
        let mut c = connected(ControlsOptions::default());
        let log = record(&c);
        let _ = c.handle_input(InputEvent::PointerDown(mouse(10.0, 10.0, MouseButtons::LEFT)));
        c.set_enabled(false);
        assert_eq!(log.borrow().last(), Some(&ControlsEvent::ControlEnd));
        assert_eq!(c.current_action(), Action::NONE);
    }

    #[test]
    fn right_drag_trucks_target() {
        let mut c = connected(ControlsOptions::default());
        let _ = c.handle_input(InputEvent::PointerDown(mouse(400.0, 300.0, MouseButtons::RIGHT)));
        let _ = c.handle_input(InputEvent::PointerMove(mouse(300.0, 300.0, MouseButtons::RIGHT)));
        // Dragging left moves the target right.
        assert!(c.target(true).x > 0.0);
        assert!(c.target(true).y.abs() < 1e-9);
    }

    #[test]
    fn keyboard_flies_and_brackets_events() {
        let mut c = connected(ControlsOptions::default());
        let log = record(&c);
        assert!(c.handle_key("KeyW", true));
        assert!(c.handle_key("KeyD", true));
        assert!(!c.handle_key("KeyP", true));
        for _ in 0..30 {
            let _ = c.update(DT);
        }
        assert!(c.handle_key("KeyW", false));
        assert!(c.handle_key("KeyD", false));

        let target = c.target(true);
        // Half a second at 2 units/s forward (-Z) and right (+X).
        assert!((target.z + 1.0).abs() < 1e-9);
        assert!((target.x - 1.0).abs() < 1e-9);

        let events = log.borrow();
        assert_eq!(events.first(), Some(&ControlsEvent::ControlStart));
        assert_eq!(events.last(), Some(&ControlsEvent::ControlEnd));
        assert_eq!(events.iter().filter(|e| **e == ControlsEvent::Control).count(), 30);
        assert_eq!(
            events.iter().filter(|e| **e == ControlsEvent::ControlStart).count(),
            1
        );
    }

    #[test]
    fn infinity_dolly_moves_target_past_min_distance() {
        let mut options = ControlsOptions::default();
        options.limits.min_distance = 4.0;
        options.behavior.infinity_dolly = true;
        let mut c = connected(options);
        for _ in 0..20 {
            let _ = c.handle_input(wheel(400.0, 300.0, -300.0));
        }
        assert_eq!(c.spherical(true).radius, 4.0);
        // Target was pushed forward along the view direction (-Z).
        assert!(c.target(true).z < 0.0);
    }

    #[test]
    fn dolly_to_cursor_shifts_target_toward_cursor() {
        let mut options = ControlsOptions::default();
        options.behavior.dolly_to_cursor = true;
        let mut c = connected(options);
        // Cursor in the right half of the view.
        let _ = c.handle_input(wheel(700.0, 300.0, -100.0));
        for _ in 0..120 {
            let _ = c.update(DT);
        }
        assert!(c.target(true).x > 0.0);
        assert!(c.distance() < 5.0);
    }

    #[test]
    fn orthographic_wheel_zooms_toward_cursor() {
        let camera = Camera::orthographic(-4.0, 4.0, 3.0, -3.0, 0.1, 100.0);
        let mut options = ControlsOptions::for_projection(&camera.projection);
        options.behavior.dolly_to_cursor = true;
        let mut c = CameraControls::new(camera, options);
        c.set_element_rect(Rect::new(0.0, 0.0, 800.0, 600.0));
        let _ = c.connect();

        let _ = c.handle_input(wheel(700.0, 300.0, -100.0));
        assert!(c.zoom_factor(true) > 1.0);
        for _ in 0..120 {
            let _ = c.update(DT);
        }
        assert!(c.target(true).x > 0.0);
        assert!(c.target(true).z.abs() < 1e-9);
    }

    #[test]
    fn infinity_dolly_to_cursor_fuzz_stays_finite() {
        let mut options = ControlsOptions::default();
        options.limits.min_distance = 1.0;
        options.limits.max_distance = 20.0;
        options.behavior.infinity_dolly = true;
        options.behavior.dolly_to_cursor = true;
        let mut c = connected(options);
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..2000 {
            let x = rng.random_range(0.0..800.0);
            let y = rng.random_range(0.0..600.0);
            let delta = rng.random_range(-400.0..400.0);
            let _ = c.handle_input(wheel(x, y, delta));
            let ticks = rng.random_range(0..4);
            for _ in 0..ticks {
                let _ = c.update(DT);
            }
            let s = c.spherical(false);
            assert!(s.radius.is_finite() && s.radius > 0.0);
            assert!(c.target(false).is_finite());
            assert!(c.camera().position.is_finite());
        }
    }
}
