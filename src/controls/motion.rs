//! Mutators that set end values for the integrator.
//!
//! Every mutator takes a `transition` flag. With `false` the current value
//! jumps to the end value immediately and the returned handle is already
//! resolved; with `true` the integrator animates toward it and the handle
//! resolves at the next rest.

use std::f64::consts::TAU;

use glam::DVec3;

use super::{y_up_rotations, CameraControls, DollyDirection};
use crate::camera::collision::collision_distance;
use crate::camera::{Boundary, Collider};
use crate::rest::MotionHandle;
use crate::util::bounds::Aabb;
use crate::util::damping::{approx_equals, approx_zero_vec3, EPSILON};
use crate::util::spherical::Spherical;

// ── Rotation ──

impl CameraControls {
    /// Rotate by `azimuth` and `polar` radians relative to the end pose.
    pub fn rotate(&mut self, azimuth: f64, polar: f64, transition: bool) -> MotionHandle {
        self.rotate_to(
            self.spherical_end.theta + azimuth,
            self.spherical_end.phi + polar,
            transition,
        )
    }

    /// Rotate to an absolute azimuth, keeping the polar angle.
    pub fn rotate_azimuth_to(&mut self, azimuth: f64, transition: bool) -> MotionHandle {
        self.rotate_to(azimuth, self.spherical_end.phi, transition)
    }

    /// Rotate to an absolute polar angle, keeping the azimuth.
    pub fn rotate_polar_to(&mut self, polar: f64, transition: bool) -> MotionHandle {
        self.rotate_to(self.spherical_end.theta, polar, transition)
    }

    /// Rotate to absolute angles, clamped to the configured ranges and kept
    /// off the poles.
    pub fn rotate_to(&mut self, azimuth: f64, polar: f64, transition: bool) -> MotionHandle {
        self.user.rotate = false;
        let limits = &self.options.limits;
        self.spherical_end.theta = limits.clamp_azimuth(azimuth);
        self.spherical_end.phi = limits.clamp_polar(polar);
        self.spherical_end.make_safe();
        self.needs_update = true;

        if !transition {
            self.spherical.theta = self.spherical_end.theta;
            self.spherical.phi = self.spherical_end.phi;
        }

        let settled = !transition || self.rotation_settled();
        self.motion_handle(settled)
    }

    /// Wrap the end azimuth into `[0, 2π)` and shift the current azimuth by
    /// the same number of whole turns, so nothing visibly spins.
    pub fn normalize_rotations(&mut self) {
        self.spherical_end.theta = self.spherical_end.theta.rem_euclid(TAU);
        self.spherical.theta +=
            TAU * ((self.spherical_end.theta - self.spherical.theta) / TAU).round();
    }
}

// ── Dolly and zoom ──

impl CameraControls {
    /// Move toward (positive) or away from the target.
    pub fn dolly(&mut self, distance: f64, transition: bool) -> MotionHandle {
        self.dolly_to(self.spherical_end.radius - distance, transition)
    }

    /// Set the orbit distance, clamped to the distance limits and, with
    /// colliders, to the collision distance.
    pub fn dolly_to(&mut self, distance: f64, transition: bool) -> MotionHandle {
        self.user.dolly = false;
        self.last_dolly_direction = DollyDirection::None;
        self.changed_dolly = 0.0;
        let clamped = self.options.limits.clamp_distance(distance);
        self.dolly_to_no_clamp(clamped, transition)
    }

    /// Set the orbit distance without applying the distance limits.
    pub(super) fn dolly_to_no_clamp(&mut self, distance: f64, transition: bool) -> MotionHandle {
        let last_radius = self.spherical_end.radius;

        if self.colliders.is_empty() {
            self.spherical_end.radius = distance;
        } else {
            let max_distance = self.collision_test();
            let collided = approx_equals(max_distance, self.spherical.radius, EPSILON);
            let dolly_in = last_radius > distance;
            if !dolly_in && collided {
                return MotionHandle::resolved();
            }
            self.spherical_end.radius = distance.min(max_distance);
        }

        self.needs_update = true;
        if !transition {
            self.spherical.radius = self.spherical_end.radius;
        }

        let settled = !transition
            || approx_equals(
                self.spherical.radius,
                self.spherical_end.radius,
                self.rest_threshold(),
            );
        self.motion_handle(settled)
    }

    /// Move the target and camera together along the view direction,
    /// keeping the orbit distance.
    pub fn dolly_in_fixed(&mut self, distance: f64, transition: bool) -> MotionHandle {
        self.target_end += self.camera.direction() * distance;
        if !transition {
            self.target = self.target_end;
        }
        let settled = !transition || self.target_settled();
        self.motion_handle(settled)
    }

    /// Change the zoom factor by `step`.
    pub fn zoom(&mut self, step: f64, transition: bool) -> MotionHandle {
        self.zoom_to(self.zoom_end + step, transition)
    }

    /// Set the zoom factor, clamped to the zoom limits.
    pub fn zoom_to(&mut self, zoom: f64, transition: bool) -> MotionHandle {
        self.user.zoom = false;
        self.zoom_end = self.options.limits.clamp_zoom(zoom);
        self.needs_update = true;
        if !transition {
            self.zoom = self.zoom_end;
        }
        let settled =
            !transition || approx_equals(self.zoom, self.zoom_end, self.rest_threshold());
        self.changed_zoom = 0.0;
        self.motion_handle(settled)
    }
}

// ── Translation ──

impl CameraControls {
    /// Translate the target along the camera's right (`x`) and up (`y`)
    /// axes. Positive `y` moves down the screen.
    pub fn truck(&mut self, x: f64, y: f64, transition: bool) -> MotionHandle {
        let (right, up, _) = self.camera.basis();
        let to = self.target_end + right * x + up * -y;
        self.move_to(to, transition)
    }

    /// Translate the target along the ground plane, in the direction the
    /// camera faces.
    pub fn forward(&mut self, distance: f64, transition: bool) -> MotionHandle {
        let (right, _, _) = self.camera.basis();
        let to = self.target_end + self.camera.up.cross(right) * distance;
        self.move_to(to, transition)
    }

    /// Translate the target along the camera's up vector.
    pub fn elevate(&mut self, height: f64, transition: bool) -> MotionHandle {
        let to = self.target_end + self.camera.up * height;
        self.move_to(to, transition)
    }

    /// Move the target to `target`, kept inside the boundary.
    pub fn move_to(&mut self, target: DVec3, transition: bool) -> MotionHandle {
        self.user.truck = false;
        let offset = target - self.target_end;
        self.target_end = self.boundary.enclose(
            self.target_end,
            offset,
            self.options.behavior.boundary_friction,
        );
        self.needs_update = true;
        if !transition {
            self.target = self.target_end;
        }
        let settled = !transition || self.target_settled();
        self.motion_handle(settled)
    }

    /// Set the screen-space focal offset (`x` right, `y` down, `z` back).
    pub fn set_focal_offset(&mut self, offset: DVec3, transition: bool) -> MotionHandle {
        self.user.offset = false;
        self.focal_offset_end = offset;
        self.needs_update = true;
        if !transition {
            self.focal_offset = self.focal_offset_end;
        }
        let settled = !transition
            || approx_zero_vec3(
                self.focal_offset_end - self.focal_offset,
                self.rest_threshold(),
            );
        self.motion_handle(settled)
    }

    /// Re-pivot the orbit about `point` without moving the camera: the
    /// distance and focal offset absorb the change. Applied immediately.
    pub fn set_orbit_point(&mut self, point: DVec3) {
        let distance = point.distance(self.camera.position);
        let mut local = self.camera.rotation.inverse() * (point - self.camera.position);
        local.z += distance;

        let _ = self.dolly_to(distance, false);
        let _ = self.set_focal_offset(DVec3::new(-local.x, local.y, -local.z), false);
        let _ = self.move_to(point, false);
    }
}

// ── Absolute poses ──

impl CameraControls {
    /// Jump (or transition) to an absolute camera position and target.
    pub fn set_look_at(&mut self, position: DVec3, target: DVec3, transition: bool) -> MotionHandle {
        self.user.rotate = false;
        self.user.dolly = false;
        self.user.truck = false;
        self.last_dolly_direction = DollyDirection::None;
        self.changed_dolly = 0.0;

        self.target_end = target;
        self.spherical_end = Spherical::from_vec3(self.y_up_space * (position - target));
        self.normalize_rotations();
        self.needs_update = true;

        if !transition {
            self.target = self.target_end;
            self.spherical = self.spherical_end;
        }

        let settled = !transition || (self.target_settled() && self.spherical_settled());
        self.motion_handle(settled)
    }

    /// Interpolate between two look-at poses by `t` in `[0, 1]`.
    ///
    /// Angles and radius are interpolated independently, so the path follows
    /// the orbit rather than a straight line.
    pub fn lerp_look_at(
        &mut self,
        position_a: DVec3,
        target_a: DVec3,
        position_b: DVec3,
        target_b: DVec3,
        t: f64,
        transition: bool,
    ) -> MotionHandle {
        self.user.rotate = false;
        self.user.zoom = false;
        self.user.dolly = false;
        self.user.truck = false;
        self.last_dolly_direction = DollyDirection::None;
        self.changed_dolly = 0.0;

        let a = Spherical::from_vec3(self.y_up_space * (position_a - target_a));
        let b = Spherical::from_vec3(self.y_up_space * (position_b - target_b));

        self.target_end = target_a.lerp(target_b, t);
        self.spherical_end = Spherical::new(
            a.radius + (b.radius - a.radius) * t,
            a.phi + (b.phi - a.phi) * t,
            a.theta + (b.theta - a.theta) * t,
        );
        self.normalize_rotations();
        self.needs_update = true;

        if !transition {
            self.target = self.target_end;
            self.spherical = self.spherical_end;
        }

        let settled = !transition || (self.target_settled() && self.spherical_settled());
        self.motion_handle(settled)
    }

    /// Move the camera to `position`, keeping the target.
    pub fn set_position(&mut self, position: DVec3, transition: bool) -> MotionHandle {
        self.set_look_at(position, self.target_end, transition)
    }

    /// Move the target to `target`, keeping the camera position. The polar
    /// angle is re-clamped afterwards.
    pub fn set_target(&mut self, target: DVec3, transition: bool) -> MotionHandle {
        let position = self.position(true);
        let handle = self.set_look_at(position, target, transition);
        self.spherical_end.phi = self.options.limits.clamp_polar(self.spherical_end.phi);
        handle
    }

    /// Snap every current value to its end value and zero all velocities.
    /// The next [`update`](Self::update) places the camera and settles.
    pub fn stop(&mut self) {
        self.spherical.theta = self.spherical_end.theta;
        self.spherical.phi = self.spherical_end.phi;
        self.spherical.radius = self.spherical_end.radius;
        self.target = self.target_end;
        self.focal_offset = self.focal_offset_end;
        self.zoom = self.zoom_end;
        self.velocity = super::Velocities::default();
        self.needs_update = true;
    }

    fn spherical_settled(&self) -> bool {
        self.rotation_settled()
            && approx_equals(
                self.spherical.radius,
                self.spherical_end.radius,
                self.rest_threshold(),
            )
    }
}

// ── Constraints and camera up ──

impl CameraControls {
    /// Restrict the target to `aabb`, or remove the restriction with `None`.
    /// The end target is clamped into the new box immediately.
    pub fn set_boundary(&mut self, aabb: Option<Aabb>) {
        self.boundary = Boundary::new(aabb);
        self.target_end = self.boundary.clamp_point(self.target_end);
        self.needs_update = true;
    }

    /// Replace the collider set used to keep the camera out of geometry.
    pub fn set_colliders(&mut self, colliders: Vec<Box<dyn Collider>>) {
        log::debug!("camera colliders: {}", colliders.len());
        self.colliders = colliders;
        self.needs_update = true;
    }

    /// Add one collider.
    pub fn add_collider(&mut self, collider: Box<dyn Collider>) {
        self.colliders.push(collider);
        self.needs_update = true;
    }

    /// Recompute the cached y-up rotation after `camera.up` changed.
    pub fn update_camera_up(&mut self) {
        let up = self.camera.up;
        if !up.is_finite() || up.length_squared() == 0.0 {
            log::error!("camera up vector {up:?} is degenerate; falling back to +Y");
            self.camera.up = DVec3::Y;
        }
        (self.y_up_space, self.y_up_space_inverse) = y_up_rotations(self.camera.up);
    }

    /// Make the camera's up vector orthogonal to the current view direction
    /// and re-base the rig on it without moving the camera.
    pub fn apply_camera_up(&mut self) {
        let direction = (self.target - self.camera.position).normalize_or_zero();
        let side = direction.cross(self.camera.up);
        let up = side.cross(direction).normalize_or_zero();
        if up == DVec3::ZERO {
            log::warn!("apply_camera_up: view direction is parallel to up; ignored");
            return;
        }
        self.camera.up = up;
        self.camera.look_at(self.target);

        let position = self.position(true);
        self.update_camera_up();
        let _ = self.set_position(position, false);
    }

    /// Largest radius the colliders allow from the current target.
    pub(super) fn collision_test(&self) -> f64 {
        let to_camera = self.y_up_space_inverse * self.spherical.direction();
        collision_distance(
            &self.camera,
            &self.colliders,
            self.target,
            to_camera,
            self.spherical.radius,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;
    use crate::camera::{Camera, TriangleMesh};
    use crate::options::ControlsOptions;

    fn controls() -> CameraControls {
        CameraControls::new(Camera::default(), ControlsOptions::default())
    }

    #[test]
    fn rotate_to_clamps_polar_and_azimuth() {
        let mut options = ControlsOptions::default();
        options.limits.min_polar_angle = 0.5;
        options.limits.max_polar_angle = 2.0;
        options.limits.min_azimuth_angle = -1.0;
        options.limits.max_azimuth_angle = 1.0;
        let mut c = CameraControls::new(Camera::default(), options);

        let _ = c.rotate_to(5.0, 3.0, false);
        assert_eq!(c.azimuth_angle(), 1.0);
        assert_eq!(c.polar_angle(), 2.0);

        let _ = c.rotate_to(-5.0, -3.0, true);
        assert_eq!(c.spherical(true).theta, -1.0);
        assert_eq!(c.spherical(true).phi, 0.5);
    }

    #[test]
    fn rotate_to_stays_off_the_poles() {
        let mut c = controls();
        let _ = c.rotate_to(0.0, 0.0, false);
        assert!(c.polar_angle() > 0.0);
        let _ = c.rotate_to(0.0, PI, false);
        assert!(c.polar_angle() < PI);
    }

    #[test]
    fn dolly_to_clamps_to_limits() {
        let mut options = ControlsOptions::default();
        options.limits.min_distance = 1.0;
        options.limits.max_distance = 10.0;
        let mut c = CameraControls::new(Camera::default(), options);

        let handle = c.dolly_to(50.0, false);
        assert!(handle.is_resolved());
        assert_eq!(c.distance(), 10.0);

        let _ = c.dolly_to(0.1, false);
        assert_eq!(c.distance(), 1.0);

        let _ = c.dolly(-3.0, false);
        assert_eq!(c.distance(), 4.0);
    }

    #[test]
    fn dolly_respects_colliders() {
        let mut c = controls();
        // A wall between the target and the camera at z = 3.
        c.add_collider(Box::new(TriangleMesh::new(
            vec![
                DVec3::new(-10.0, -10.0, 3.0),
                DVec3::new(10.0, -10.0, 3.0),
                DVec3::new(0.0, 10.0, 3.0),
            ],
            vec![[0, 1, 2]],
        )));
        let _ = c.dolly_to(4.0, false);
        assert!(c.spherical(true).radius <= 3.0 + 1e-9);
    }

    #[test]
    fn move_to_stays_inside_boundary() {
        let mut c = controls();
        c.set_boundary(Some(Aabb::new(DVec3::splat(-1.0), DVec3::splat(1.0))));
        let _ = c.move_to(DVec3::new(5.0, 0.5, -7.0), false);
        let target = c.target(true);
        assert_eq!(target, DVec3::new(1.0, 0.5, -1.0));

        c.set_boundary(None);
        let _ = c.move_to(DVec3::new(5.0, 0.5, -7.0), false);
        assert_eq!(c.target(true), DVec3::new(5.0, 0.5, -7.0));
    }

    #[test]
    fn set_boundary_clamps_existing_target() {
        let mut c = controls();
        let _ = c.move_to(DVec3::new(4.0, 0.0, 0.0), false);
        c.set_boundary(Some(Aabb::new(DVec3::splat(-2.0), DVec3::splat(2.0))));
        assert_eq!(c.target(true).x, 2.0);
    }

    #[test]
    fn truck_moves_along_camera_axes() {
        let mut c = controls();
        // Default camera looks down -Z from +Z, so right is +X.
        let _ = c.truck(1.0, 2.0, false);
        let target = c.target(true);
        assert!((target - DVec3::new(1.0, -2.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn forward_and_elevate() {
        let mut c = controls();
        let _ = c.forward(1.0, false);
        assert!((c.target(true) - DVec3::new(0.0, 0.0, -1.0)).length() < 1e-9);
        let _ = c.elevate(2.0, false);
        assert!((c.target(true) - DVec3::new(0.0, 2.0, -1.0)).length() < 1e-9);
    }

    #[test]
    fn set_look_at_converts_to_spherical() {
        let mut c = controls();
        let _ = c.set_look_at(DVec3::new(3.0, 0.0, 0.0), DVec3::ZERO, false);
        let s = c.spherical(false);
        assert!((s.radius - 3.0).abs() < 1e-9);
        assert!((s.theta - FRAC_PI_2).abs() < 1e-9);
        assert!((s.phi - FRAC_PI_2).abs() < 1e-9);
        assert!((c.position(false) - DVec3::new(3.0, 0.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn lerp_look_at_halfway() {
        let mut c = controls();
        let _ = c.lerp_look_at(
            DVec3::new(0.0, 0.0, 2.0),
            DVec3::ZERO,
            DVec3::new(4.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            0.5,
            false,
        );
        let s = c.spherical(true);
        assert!((s.radius - 2.0).abs() < 1e-9);
        assert!((s.theta - FRAC_PI_2 * 0.5).abs() < 1e-9);
        assert!((c.target(true) - DVec3::new(1.0, 0.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn set_target_keeps_position() {
        let mut c = controls();
        let before = c.position(true);
        let _ = c.set_target(DVec3::new(1.0, 1.0, 0.0), false);
        assert!((c.position(true) - before).length() < 1e-9);
        assert_eq!(c.target(true), DVec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn set_orbit_point_keeps_camera_still() {
        let mut c = controls();
        let _ = c.update(1.0 / 60.0);
        let before = c.camera().position;
        let before_rotation = c.camera().rotation;

        let point = DVec3::new(1.0, -0.5, -2.0);
        c.set_orbit_point(point);
        let _ = c.update(1.0 / 60.0);

        assert_eq!(c.target(true), point);
        assert!((c.camera().position - before).length() < 1e-6);
        assert!(c.camera().rotation.angle_between(before_rotation) < 1e-6);
    }

    #[test]
    fn normalize_rotations_wraps_without_spinning() {
        let mut c = controls();
        let _ = c.rotate_to(5.0 * PI, FRAC_PI_2, false);
        c.normalize_rotations();
        let end = c.spherical(true).theta;
        assert!((0.0..TAU).contains(&end));
        assert!((end - PI).abs() < 1e-9);
        assert!((c.azimuth_angle() - end).abs() < 1e-9);
    }

    #[test]
    fn stop_snaps_current_to_end() {
        let mut c = controls();
        let _ = c.rotate_to(1.0, 1.0, true);
        let _ = c.dolly_to(8.0, true);
        let _ = c.move_to(DVec3::X, true);
        c.stop();
        assert_eq!(c.azimuth_angle(), 1.0);
        assert_eq!(c.distance(), 8.0);
        assert_eq!(c.target(false), DVec3::X);
    }

    #[test]
    fn transition_handle_is_pending_and_fires_transitionstart() {
        use std::cell::Cell;
        use std::rc::Rc;

        use crate::dispatch::ControlsEvent;

        let mut c = controls();
        let starts = Rc::new(Cell::new(0));
        let s = Rc::clone(&starts);
        let _ = c.add_event_listener(ControlsEvent::TransitionStart, move |_| {
            s.set(s.get() + 1);
        });

        let instant = c.rotate_to(1.0, 1.0, false);
        assert!(instant.is_resolved());
        assert_eq!(starts.get(), 0);

        let animated = c.rotate_to(0.0, 1.0, true);
        assert!(!animated.is_resolved());
        assert_eq!(starts.get(), 1);

        // Already there: resolves at once.
        let noop = c.dolly_to(c.distance(), true);
        assert!(noop.is_resolved());
    }
}
