//! Saved default pose and JSON controller state.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::{CameraControls, SavedPose};
use crate::error::OrbitError;
use crate::rest::MotionHandle;
use crate::util::spherical::Spherical;

/// Serializable snapshot of a controller: enabled flag, limits, tunables,
/// the current end pose and the saved default pose.
///
/// JSON has no infinity, so unbounded limits and speeds are written as
/// `±f64::MAX` and read back as `±inf`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlsState {
    /// Whether user input is processed.
    pub enabled: bool,

    /// Minimum orbit distance.
    pub min_distance: f64,
    /// Maximum orbit distance.
    pub max_distance: f64,
    /// Minimum zoom.
    pub min_zoom: f64,
    /// Maximum zoom.
    pub max_zoom: f64,
    /// Minimum polar angle in radians.
    pub min_polar_angle: f64,
    /// Maximum polar angle.
    pub max_polar_angle: f64,
    /// Minimum azimuth in radians.
    pub min_azimuth_angle: f64,
    /// Maximum azimuth.
    pub max_azimuth_angle: f64,

    /// Programmatic smooth time in seconds.
    pub smooth_time: f64,
    /// Smooth time while the user drags.
    pub dragging_smooth_time: f64,
    /// Speed cap for every damped quantity.
    pub max_speed: f64,
    /// Settle threshold.
    pub rest_threshold: f64,
    /// Horizontal drag rotation multiplier.
    pub azimuth_rotate_speed: f64,
    /// Vertical drag rotation multiplier.
    pub polar_rotate_speed: f64,
    /// Dolly multiplier.
    pub dolly_speed: f64,
    /// Truck multiplier.
    pub truck_speed: f64,
    /// Dolly toward the cursor.
    pub dolly_to_cursor: bool,
    /// Carry the target past the distance limits.
    pub infinity_dolly: bool,
    /// Boundary friction in `[0, 1]`.
    pub boundary_friction: f64,

    /// End target.
    pub target: [f64; 3],
    /// End camera position.
    pub position: [f64; 3],
    /// End zoom.
    pub zoom: f64,
    /// End focal offset.
    pub focal_offset: [f64; 3],

    /// Saved default target.
    pub target0: [f64; 3],
    /// Saved default position.
    pub position0: [f64; 3],
    /// Saved default zoom.
    pub zoom0: f64,
    /// Saved default focal offset.
    pub focal_offset0: [f64; 3],
}

fn encode(value: f64) -> f64 {
    if value.is_infinite() {
        value.signum() * f64::MAX
    } else {
        value
    }
}

fn decode(value: f64) -> f64 {
    if value.abs() == f64::MAX {
        value.signum() * f64::INFINITY
    } else {
        value
    }
}

impl CameraControls {
    /// Capture the current end pose as the default for [`reset`](Self::reset).
    pub fn save_state(&mut self) {
        self.saved = SavedPose {
            target: self.target_end,
            position: self.position(true),
            zoom: self.zoom,
            focal_offset: self.focal_offset,
            up: self.camera.up,
        };
    }

    /// Return to the saved default pose (construction pose unless
    /// [`save_state`](Self::save_state) was called since).
    pub fn reset(&mut self, transition: bool) -> MotionHandle {
        let saved = self.saved;
        if self.camera.up != saved.up {
            self.camera.up = saved.up;
            self.update_camera_up();
        }

        MotionHandle::all([
            self.set_look_at(saved.position, saved.target, transition),
            self.set_focal_offset(saved.focal_offset, transition),
            self.zoom_to(saved.zoom, transition),
        ])
    }

    /// Snapshot the controller.
    #[must_use]
    pub fn to_state(&self) -> ControlsState {
        let limits = &self.options.limits;
        let smoothing = &self.options.smoothing;
        let speeds = &self.options.speeds;
        let behavior = &self.options.behavior;
        ControlsState {
            enabled: self.enabled,

            min_distance: encode(limits.min_distance),
            max_distance: encode(limits.max_distance),
            min_zoom: encode(limits.min_zoom),
            max_zoom: encode(limits.max_zoom),
            min_polar_angle: encode(limits.min_polar_angle),
            max_polar_angle: encode(limits.max_polar_angle),
            min_azimuth_angle: encode(limits.min_azimuth_angle),
            max_azimuth_angle: encode(limits.max_azimuth_angle),

            smooth_time: smoothing.smooth_time,
            dragging_smooth_time: smoothing.dragging_smooth_time,
            max_speed: encode(smoothing.max_speed),
            rest_threshold: smoothing.rest_threshold,
            azimuth_rotate_speed: speeds.azimuth_rotate_speed,
            polar_rotate_speed: speeds.polar_rotate_speed,
            dolly_speed: speeds.dolly_speed,
            truck_speed: speeds.truck_speed,
            dolly_to_cursor: behavior.dolly_to_cursor,
            infinity_dolly: behavior.infinity_dolly,
            boundary_friction: behavior.boundary_friction,

            target: self.target_end.to_array(),
            position: self.position(true).to_array(),
            zoom: self.zoom_end,
            focal_offset: self.focal_offset_end.to_array(),

            target0: self.saved.target.to_array(),
            position0: self.saved.position.to_array(),
            zoom0: self.saved.zoom,
            focal_offset0: self.saved.focal_offset.to_array(),
        }
    }

    /// Serialize [`to_state`](Self::to_state) as JSON.
    pub fn to_json(&self) -> Result<String, OrbitError> {
        Ok(serde_json::to_string(&self.to_state())?)
    }

    /// Restore a snapshot: options and saved pose are replaced, then the
    /// rig moves to the stored pose.
    pub fn apply_state(&mut self, state: &ControlsState, transition: bool) -> MotionHandle {
        self.set_enabled(state.enabled);

        let limits = &mut self.options.limits;
        limits.min_distance = decode(state.min_distance);
        limits.max_distance = decode(state.max_distance);
        limits.min_zoom = decode(state.min_zoom);
        limits.max_zoom = decode(state.max_zoom);
        limits.min_polar_angle = decode(state.min_polar_angle);
        limits.max_polar_angle = decode(state.max_polar_angle);
        limits.min_azimuth_angle = decode(state.min_azimuth_angle);
        limits.max_azimuth_angle = decode(state.max_azimuth_angle);

        let smoothing = &mut self.options.smoothing;
        smoothing.smooth_time = state.smooth_time;
        smoothing.dragging_smooth_time = state.dragging_smooth_time;
        smoothing.max_speed = decode(state.max_speed);
        smoothing.rest_threshold = state.rest_threshold;

        let speeds = &mut self.options.speeds;
        speeds.azimuth_rotate_speed = state.azimuth_rotate_speed;
        speeds.polar_rotate_speed = state.polar_rotate_speed;
        speeds.dolly_speed = state.dolly_speed;
        speeds.truck_speed = state.truck_speed;

        let behavior = &mut self.options.behavior;
        behavior.dolly_to_cursor = state.dolly_to_cursor;
        behavior.infinity_dolly = state.infinity_dolly;
        behavior.boundary_friction = state.boundary_friction;

        self.saved = SavedPose {
            target: DVec3::from_array(state.target0),
            position: DVec3::from_array(state.position0),
            zoom: state.zoom0,
            focal_offset: DVec3::from_array(state.focal_offset0),
            up: self.camera.up,
        };

        let target = DVec3::from_array(state.target);
        let position = DVec3::from_array(state.position);
        let rig = Spherical::from_vec3(self.y_up_space * (position - target));

        MotionHandle::all([
            self.move_to(target, transition),
            self.rotate_to(rig.theta, rig.phi, transition),
            self.dolly_to(rig.radius, transition),
            self.zoom_to(state.zoom, transition),
            self.set_focal_offset(DVec3::from_array(state.focal_offset), transition),
        ])
    }

    /// Parse a JSON snapshot and [`apply_state`](Self::apply_state) it. On a
    /// parse error nothing changes.
    pub fn from_json(&mut self, json: &str, transition: bool) -> Result<MotionHandle, OrbitError> {
        let state: ControlsState = serde_json::from_str(json)?;
        Ok(self.apply_state(&state, transition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::options::ControlsOptions;

    fn controls() -> CameraControls {
        CameraControls::new(Camera::default(), ControlsOptions::default())
    }

    #[test]
    fn unbounded_limits_use_max_sentinel() {
        let c = controls();
        let json = c.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["maxDistance"].as_f64(), Some(f64::MAX));
        assert_eq!(value["minAzimuthAngle"].as_f64(), Some(-f64::MAX));
        assert_eq!(value["maxSpeed"].as_f64(), Some(f64::MAX));
        assert!(value["target0"].is_array());
    }

    #[test]
    fn json_round_trip_restores_pose_and_limits() {
        let mut a = controls();
        let mut options = a.options().clone();
        options.limits.min_distance = 2.0;
        options.behavior.dolly_to_cursor = true;
        a.set_options(options);
        let _ = a.set_look_at(DVec3::new(3.0, 4.0, 5.0), DVec3::new(1.0, 0.0, -1.0), false);
        let _ = a.zoom_to(1.5, false);
        let json = a.to_json().unwrap();

        let mut b = controls();
        let handle = b.from_json(&json, false).unwrap();
        assert!(handle.is_resolved());
        assert_eq!(b.options().limits.max_distance, f64::INFINITY);
        assert_eq!(b.options().limits.min_distance, 2.0);
        assert!(b.options().behavior.dolly_to_cursor);
        assert!((b.target(true) - DVec3::new(1.0, 0.0, -1.0)).length() < 1e-9);
        assert!((b.position(true) - DVec3::new(3.0, 4.0, 5.0)).length() < 1e-9);
        assert_eq!(b.zoom_factor(true), 1.5);
    }

    #[test]
    fn transitioned_restore_settles() {
        let a = controls();
        let json = a.to_json().unwrap();

        let mut b = controls();
        let _ = b.rotate_to(1.0, 1.0, false);
        let handle = b.from_json(&json, true).unwrap();
        assert!(!handle.is_resolved());
        for _ in 0..600 {
            let _ = b.update(1.0 / 60.0);
        }
        pollster::block_on(handle);
        assert!((b.position(false) - DVec3::new(0.0, 0.0, 5.0)).length() < 0.05);
    }

    #[test]
    fn malformed_json_is_a_state_error() {
        let mut c = controls();
        let before = c.position(true);
        let err = c.from_json("{\"enabled\": true", false).unwrap_err();
        assert!(matches!(err, OrbitError::StateParse(_)));
        assert_eq!(c.position(true), before);
    }

    #[test]
    fn negative_max_speed_still_settles() {
        let a = controls();
        let mut value: serde_json::Value = serde_json::from_str(&a.to_json().unwrap()).unwrap();
        value["maxSpeed"] = serde_json::json!(-1.0);
        value["position"] = serde_json::json!([0.0, 0.0, 9.0]);

        let mut b = controls();
        let handle = b.from_json(&value.to_string(), true).unwrap();
        for _ in 0..600 {
            let _ = b.update(1.0 / 60.0);
        }
        assert!(handle.is_resolved());
        assert!((b.distance() - 9.0).abs() < 0.01);
    }

    #[test]
    fn reset_returns_to_saved_pose() {
        let mut c = controls();
        let _ = c.set_look_at(DVec3::new(0.0, 5.0, 5.0), DVec3::ONE, false);
        c.save_state();
        let _ = c.set_look_at(DVec3::new(8.0, 0.0, 0.0), DVec3::ZERO, false);
        let _ = c.set_focal_offset(DVec3::new(1.0, 0.0, 0.0), false);

        let handle = c.reset(false);
        assert!(handle.is_resolved());
        assert!((c.position(true) - DVec3::new(0.0, 5.0, 5.0)).length() < 1e-9);
        assert_eq!(c.target(true), DVec3::ONE);
        assert_eq!(c.focal_offset(true), DVec3::ZERO);
    }

    #[test]
    fn reset_without_save_uses_construction_pose() {
        let mut c = controls();
        let _ = c.dolly_to(12.0, false);
        let _ = c.reset(false);
        assert!((c.distance() - 5.0).abs() < 1e-9);
    }
}
