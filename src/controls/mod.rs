//! The orbit camera controller.
//!
//! [`CameraControls`] owns the spherical rig (azimuth, polar angle,
//! radius) around a movable target, plus a screen-space focal offset and a
//! zoom factor. Every animated quantity has a *current* value, an *end*
//! value and a velocity; mutators set end values and
//! [`update`](CameraControls::update) integrates current toward end once
//! per frame, then writes the resulting pose into the owned [`Camera`].
//!
//! The implementation is split across files by concern:
//! - `accessors`: read accessors and direct setters
//! - `motion`: rotate/dolly/zoom/truck/move mutators and pose setters
//! - `fit`: fit-to-box and fit-to-sphere
//! - `update`: the per-frame tick and lifecycle events
//! - `input`: gesture application and held-key fly controls
//! - `persistence`: saved default pose and JSON state

mod accessors;
mod fit;
mod input;
mod motion;
mod persistence;
mod update;

use glam::{DQuat, DVec2, DVec3};
use rustc_hash::FxHashSet;

pub use self::fit::FitOptions;
pub use self::persistence::ControlsState;
use crate::camera::{Boundary, Camera, Collider};
use crate::dispatch::{ControlsEvent, EventDispatcher, ListenerId};
use crate::input::{InputProcessor, KeyAction};
use crate::options::ControlsOptions;
use crate::rest::{MotionHandle, RestTracker};
use crate::util::damping::{approx_equals, approx_zero_vec3};
use crate::util::spherical::Spherical;

/// Direction of the most recent user dolly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum DollyDirection {
    #[default]
    None,
    In,
    Out,
}

impl DollyDirection {
    /// `Out` for a positive dolly delta, `In` for a negative one.
    fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            Self::Out
        } else if delta < 0.0 {
            Self::In
        } else {
            Self::None
        }
    }
}

/// Degrees of freedom currently driven by the user. These integrate with
/// the dragging smooth time.
#[derive(Debug, Clone, Copy, Default)]
struct UserControl {
    rotate: bool,
    dolly: bool,
    zoom: bool,
    truck: bool,
    offset: bool,
}

impl UserControl {
    fn any(self) -> bool {
        self.rotate || self.dolly || self.zoom || self.truck || self.offset
    }
}

/// Pose captured by [`CameraControls::save_state`] and restored by
/// [`CameraControls::reset`].
#[derive(Debug, Clone, Copy)]
struct SavedPose {
    target: DVec3,
    position: DVec3,
    zoom: f64,
    focal_offset: DVec3,
    up: DVec3,
}

/// Per-DOF velocity accumulators for the damped integrator.
#[derive(Debug, Clone, Copy, Default)]
struct Velocities {
    theta: f64,
    phi: f64,
    radius: f64,
    target: DVec3,
    focal_offset: DVec3,
    zoom: f64,
}

/// Damped orbit/fly camera controller.
///
/// # Usage
///
/// ```ignore
/// let mut controls = CameraControls::new(camera, ControlsOptions::default());
/// controls.set_element_rect(Rect::new(0.0, 0.0, 800.0, 600.0));
/// // each frame:
/// if controls.update(dt) {
///     render(controls.camera());
/// }
/// ```
pub struct CameraControls {
    camera: Camera,
    options: ControlsOptions,
    enabled: bool,
    connected: bool,

    dispatcher: EventDispatcher,
    rest: RestTracker,
    input: InputProcessor,

    /// Rotates the camera's up vector onto +Y.
    y_up_space: DQuat,
    y_up_space_inverse: DQuat,

    spherical: Spherical,
    spherical_end: Spherical,
    target: DVec3,
    target_end: DVec3,
    focal_offset: DVec3,
    focal_offset_end: DVec3,
    zoom: f64,
    zoom_end: f64,
    velocity: Velocities,

    boundary: Boundary,
    colliders: Vec<Box<dyn Collider>>,

    // Dolly-to-cursor bookkeeping.
    changed_dolly: f64,
    changed_zoom: f64,
    dolly_control_coord: DVec2,
    last_dolly_direction: DollyDirection,
    last_distance: f64,
    last_zoom: f64,

    user: UserControl,
    needs_update: bool,
    updated_last_time: bool,
    has_rested: bool,

    saved: SavedPose,
    held_keys: FxHashSet<KeyAction>,
}

impl std::fmt::Debug for CameraControls {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraControls")
            .field("camera", &self.camera)
            .field("enabled", &self.enabled)
            .field("connected", &self.connected)
            .field("spherical", &self.spherical)
            .field("spherical_end", &self.spherical_end)
            .field("target", &self.target)
            .field("target_end", &self.target_end)
            .field("zoom", &self.zoom)
            .field("colliders", &self.colliders.len())
            .finish_non_exhaustive()
    }
}

/// Rotation taking `up` onto +Y, plus its inverse.
fn y_up_rotations(up: DVec3) -> (DQuat, DQuat) {
    let space = DQuat::from_rotation_arc(up.normalize(), DVec3::Y);
    (space, space.inverse())
}

impl CameraControls {
    /// Build a controller around `camera`, orbiting the world origin.
    ///
    /// The initial rig is derived from the camera's current position and
    /// zoom, and that pose is saved as the default for
    /// [`reset`](Self::reset).
    #[must_use]
    pub fn new(mut camera: Camera, options: ControlsOptions) -> Self {
        if !camera.up.is_finite() || camera.up.length_squared() == 0.0 {
            log::error!(
                "camera up vector {:?} is degenerate; falling back to +Y",
                camera.up
            );
            camera.up = DVec3::Y;
        }
        let (y_up_space, y_up_space_inverse) = y_up_rotations(camera.up);

        let target = DVec3::ZERO;
        let spherical = Spherical::from_vec3(y_up_space * (camera.position - target));
        let zoom = camera.zoom;
        let input = InputProcessor::new(options.bindings);

        let saved = SavedPose {
            target,
            position: camera.position,
            zoom,
            focal_offset: DVec3::ZERO,
            up: camera.up,
        };

        let mut controls = Self {
            camera,
            options,
            enabled: true,
            connected: false,
            dispatcher: EventDispatcher::new(),
            rest: RestTracker::new(),
            input,
            y_up_space,
            y_up_space_inverse,
            spherical,
            spherical_end: spherical,
            target,
            target_end: target,
            focal_offset: DVec3::ZERO,
            focal_offset_end: DVec3::ZERO,
            zoom,
            zoom_end: zoom,
            velocity: Velocities::default(),
            boundary: Boundary::default(),
            colliders: Vec::new(),
            changed_dolly: 0.0,
            changed_zoom: 0.0,
            dolly_control_coord: DVec2::ZERO,
            last_dolly_direction: DollyDirection::None,
            last_distance: spherical.radius,
            last_zoom: zoom,
            user: UserControl::default(),
            needs_update: true,
            updated_last_time: false,
            has_rested: true,
            saved,
            held_keys: FxHashSet::default(),
        };
        // Place the camera, then start asleep.
        let _ = controls.update(0.0);
        controls.updated_last_time = false;
        controls
    }

    // ── Lifecycle ──

    /// Start accepting input. Returns `false` (and logs a warning) if the
    /// controller is already connected; listeners are never registered
    /// twice.
    pub fn connect(&mut self) -> bool {
        if self.connected {
            log::warn!("camera controls are already connected; ignoring connect()");
            return false;
        }
        self.connected = true;
        log::debug!("camera controls connected");
        true
    }

    /// Stop accepting input and end any gesture in progress.
    pub fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        self.cancel();
        self.connected = false;
        log::debug!("camera controls disconnected");
    }

    /// Disconnect and drop every event listener.
    pub fn dispose(&mut self) {
        self.disconnect();
        self.held_keys.clear();
        self.dispatcher.remove_all(None);
    }

    /// Whether [`connect`](Self::connect) is in effect.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    // ── Events ──

    /// Register a lifecycle listener.
    pub fn add_event_listener<F>(&self, event: ControlsEvent, listener: F) -> ListenerId
    where
        F: FnMut(ControlsEvent) + 'static,
    {
        self.dispatcher.add_listener(event, listener)
    }

    /// Unregister a lifecycle listener.
    pub fn remove_event_listener(&self, event: ControlsEvent, id: ListenerId) -> bool {
        self.dispatcher.remove_listener(event, id)
    }

    /// Unregister every listener for `event`, or all listeners with `None`.
    pub fn remove_all_event_listeners(&self, event: Option<ControlsEvent>) {
        self.dispatcher.remove_all(event);
    }

    /// Shared handle to the event registry.
    #[must_use]
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    // ── Internals shared by the impl files ──

    /// Issue the rest handle for a mutator. Unsettled motions fire
    /// `transitionstart` and re-arm the rest event.
    fn motion_handle(&mut self, settled: bool) -> MotionHandle {
        if !settled {
            self.has_rested = false;
            self.dispatcher.dispatch(ControlsEvent::TransitionStart);
        }
        self.rest.issue(settled)
    }

    fn rest_threshold(&self) -> f64 {
        self.options.smoothing.rest_threshold
    }

    fn target_settled(&self) -> bool {
        let t = self.rest_threshold();
        approx_zero_vec3(self.target_end - self.target, t)
    }

    fn rotation_settled(&self) -> bool {
        let t = self.rest_threshold();
        approx_equals(self.spherical.theta, self.spherical_end.theta, t)
            && approx_equals(self.spherical.phi, self.spherical_end.phi, t)
    }
}
