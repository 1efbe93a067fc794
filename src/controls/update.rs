//! The per-frame tick: integration, dolly-to-cursor, collision, pose and
//! lifecycle events.

use glam::DVec3;

use super::{CameraControls, DollyDirection};
use crate::camera::Projection;
use crate::dispatch::ControlsEvent;
use crate::util::damping::{
    approx_zero, approx_zero_vec3, smooth_damp, smooth_damp_vec3, EPSILON,
};

/// Differences between end and current values at the start of a tick.
#[derive(Debug, Clone, Copy)]
struct Deltas {
    theta: f64,
    phi: f64,
    radius: f64,
    target: DVec3,
    focal_offset: DVec3,
    zoom: f64,
}

impl Deltas {
    fn within(&self, threshold: f64) -> bool {
        approx_zero(self.theta, threshold)
            && approx_zero(self.phi, threshold)
            && approx_zero(self.radius, threshold)
            && approx_zero_vec3(self.target, threshold)
            && approx_zero_vec3(self.focal_offset, threshold)
            && approx_zero(self.zoom, threshold)
    }
}

impl CameraControls {
    /// Advance every degree of freedom by `delta_time` seconds, write the
    /// pose into the camera and fire lifecycle events.
    ///
    /// Returns `true` when the camera changed this tick, i.e. the host
    /// should re-render. A non-positive `delta_time` integrates nothing but
    /// still places the camera and fires events for pending jumps.
    pub fn update(&mut self, delta_time: f64) -> bool {
        if delta_time > 0.0 {
            self.apply_held_keys(delta_time);
        }

        let deltas = Deltas {
            theta: self.spherical_end.theta - self.spherical.theta,
            phi: self.spherical_end.phi - self.spherical.phi,
            radius: self.spherical_end.radius - self.spherical.radius,
            target: self.target_end - self.target,
            focal_offset: self.focal_offset_end - self.focal_offset,
            zoom: self.zoom_end - self.zoom,
        };

        self.integrate(&deltas, delta_time);

        if self.options.behavior.dolly_to_cursor {
            match self.camera.projection {
                Projection::Perspective { .. } if self.changed_dolly != 0.0 => {
                    self.dolly_to_cursor_perspective();
                }
                Projection::Orthographic { .. } if self.changed_zoom != 0.0 => {
                    self.zoom_to_cursor_orthographic();
                }
                _ => {}
            }
        }

        if self.camera.zoom != self.zoom {
            self.camera.zoom = self.zoom;
            self.needs_update = true;
        }

        let max_distance = self.collision_test();
        if self.spherical.radius > max_distance {
            self.spherical.radius = max_distance;
            self.needs_update = true;
        }
        // An end radius behind a collider is unreachable; settle in front of it.
        if self.spherical_end.radius > max_distance {
            self.spherical_end.radius = max_distance;
            self.velocity.radius = 0.0;
        }

        self.apply_pose();

        let updated = self.needs_update;
        self.dispatch_lifecycle(updated, &deltas);

        self.last_distance = self.spherical.radius;
        self.last_zoom = self.zoom;
        self.updated_last_time = updated;
        self.needs_update = false;
        updated
    }

    fn integrate(&mut self, deltas: &Deltas, dt: f64) {
        let smoothing = &self.options.smoothing;
        let (smooth, dragging, max_speed) = (
            smoothing.smooth_time,
            smoothing.dragging_smooth_time,
            smoothing.max_speed,
        );
        let time = |user: bool| if user { dragging } else { smooth };

        if approx_zero(deltas.theta, EPSILON) {
            self.velocity.theta = 0.0;
            self.spherical.theta = self.spherical_end.theta;
        } else {
            self.spherical.theta = smooth_damp(
                self.spherical.theta,
                self.spherical_end.theta,
                &mut self.velocity.theta,
                time(self.user.rotate),
                max_speed,
                dt,
            );
            self.needs_update = true;
        }

        if approx_zero(deltas.phi, EPSILON) {
            self.velocity.phi = 0.0;
            self.spherical.phi = self.spherical_end.phi;
        } else {
            self.spherical.phi = smooth_damp(
                self.spherical.phi,
                self.spherical_end.phi,
                &mut self.velocity.phi,
                time(self.user.rotate),
                max_speed,
                dt,
            );
            self.needs_update = true;
        }

        if approx_zero(deltas.radius, EPSILON) {
            self.velocity.radius = 0.0;
            self.spherical.radius = self.spherical_end.radius;
        } else {
            self.spherical.radius = smooth_damp(
                self.spherical.radius,
                self.spherical_end.radius,
                &mut self.velocity.radius,
                time(self.user.dolly),
                max_speed,
                dt,
            );
            self.needs_update = true;
        }

        if approx_zero_vec3(deltas.target, EPSILON) {
            self.velocity.target = DVec3::ZERO;
            self.target = self.target_end;
        } else {
            self.target = smooth_damp_vec3(
                self.target,
                self.target_end,
                &mut self.velocity.target,
                time(self.user.truck),
                max_speed,
                dt,
            );
            self.needs_update = true;
        }

        if approx_zero_vec3(deltas.focal_offset, EPSILON) {
            self.velocity.focal_offset = DVec3::ZERO;
            self.focal_offset = self.focal_offset_end;
        } else {
            self.focal_offset = smooth_damp_vec3(
                self.focal_offset,
                self.focal_offset_end,
                &mut self.velocity.focal_offset,
                time(self.user.offset),
                max_speed,
                dt,
            );
            self.needs_update = true;
        }

        if approx_zero(deltas.zoom, EPSILON) {
            self.velocity.zoom = 0.0;
            self.zoom = self.zoom_end;
        } else {
            self.zoom = smooth_damp(
                self.zoom,
                self.zoom_end,
                &mut self.velocity.zoom,
                time(self.user.zoom),
                max_speed,
                dt,
            );
            self.needs_update = true;
        }
    }

    /// Shift the target so the dolly this tick appears anchored at the
    /// cursor rather than the orbit center.
    fn dolly_to_cursor_perspective(&mut self) {
        let Some(fov) = self.camera.effective_fov() else {
            return;
        };
        let amount = self.spherical.radius - self.last_distance;
        let direction = self.camera.direction();

        let mut plane_x = direction.cross(self.camera.up).normalize_or_zero();
        if plane_x == DVec3::ZERO {
            plane_x = DVec3::X;
        }
        let plane_y = plane_x.cross(direction);

        let end_radius = self.spherical_end.radius;
        let world_to_screen = end_radius * (fov.to_radians() * 0.5).tan();
        let prev_radius = end_radius - amount;
        let lerp_ratio = (prev_radius - end_radius) / end_radius;

        let coord = self.dolly_control_coord;
        let cursor = self.target_end
            + plane_x * (coord.x * world_to_screen * self.camera.aspect())
            + plane_y * (coord.y * world_to_screen);
        let mut new_target_end = self.target_end.lerp(cursor, lerp_ratio);

        let limits = &self.options.limits;
        let at_min = self.last_dolly_direction == DollyDirection::In
            && self.spherical.radius <= limits.min_distance;
        let at_max = self.last_dolly_direction == DollyDirection::Out
            && limits.max_distance <= self.spherical.radius;
        if self.options.behavior.infinity_dolly && (at_min || at_max) {
            // Keep the radius pinned and carry the target instead.
            self.spherical_end.radius -= amount;
            self.spherical.radius -= amount;
            new_target_end += direction * -amount;
        }

        self.shift_target_end(new_target_end);

        self.changed_dolly -= amount;
        if approx_zero(self.changed_dolly, EPSILON) {
            self.changed_dolly = 0.0;
        }
    }

    /// Orthographic counterpart: move the target toward the cursor in the
    /// view plane as the zoom changes.
    fn zoom_to_cursor_orthographic(&mut self) {
        let Some(cursor) = self.camera.unproject_on_view_plane(self.dolly_control_coord) else {
            return;
        };
        let amount = self.zoom - self.last_zoom;
        let prev_zoom = self.zoom - amount;
        let lerp_ratio = -(prev_zoom - self.zoom) / self.zoom;

        let direction = self.camera.direction();
        let prev_plane = self.target_end.dot(direction);
        let mut new_target_end = self.target_end.lerp(cursor, lerp_ratio);
        // Undo any motion along the view axis; the camera depth stays put.
        let new_plane = new_target_end.dot(direction);
        new_target_end -= direction * (new_plane - prev_plane);

        self.shift_target_end(new_target_end);

        self.changed_zoom -= amount;
        if approx_zero(self.changed_zoom, EPSILON) {
            self.changed_zoom = 0.0;
        }
    }

    /// Move the end target (clamped to the boundary) and carry the current
    /// target by the same amount.
    fn shift_target_end(&mut self, new_target_end: DVec3) {
        let new_target_end = self.boundary.clamp_point(new_target_end);
        let diff = new_target_end - self.target_end;
        self.target_end = new_target_end;
        self.target += diff;
    }

    /// Write the rig into the camera: position from the spherical
    /// coordinates, orientation toward the target, then the focal offset.
    fn apply_pose(&mut self) {
        self.spherical.make_safe();
        let offset = self.y_up_space_inverse * self.spherical.to_vec3();
        self.camera.position = self.target + offset;
        self.camera.look_at(self.target);

        if !approx_zero_vec3(self.focal_offset, EPSILON) {
            let (x, y, z) = self.camera.basis();
            let fo = self.focal_offset;
            self.camera.position += x * fo.x + y * -fo.y + z * fo.z;
        }

        if self.options.behavior.boundary_encloses_camera {
            self.camera.position = self.boundary.enclose(self.target, offset, 1.0);
        }
    }

    fn dispatch_lifecycle(&mut self, updated: bool, deltas: &Deltas) {
        if updated && !self.updated_last_time {
            self.has_rested = false;
            self.dispatcher.dispatch(ControlsEvent::Wake);
            self.dispatcher.dispatch(ControlsEvent::Update);
        } else if updated {
            self.dispatcher.dispatch(ControlsEvent::Update);
            if !self.has_rested && deltas.within(self.rest_threshold()) {
                self.settle();
            }
        } else if self.updated_last_time {
            if !self.has_rested {
                self.settle();
            }
            self.dispatcher.dispatch(ControlsEvent::Sleep);
        }
    }

    /// Resolve pending motion handles, then fire `rest`.
    fn settle(&mut self) {
        self.has_rested = true;
        if !self.input.is_dragging() {
            self.user = super::UserControl::default();
        }
        let resolved = self.rest.resolve_all();
        if resolved > 0 {
            log::trace!("camera at rest; resolved {resolved} motion handle(s)");
        }
        self.dispatcher.dispatch(ControlsEvent::Rest);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::f64::consts::FRAC_PI_2;
    use std::rc::Rc;

    use super::*;
    use crate::camera::Camera;
    use crate::options::ControlsOptions;

    const DT: f64 = 1.0 / 60.0;

    fn controls() -> CameraControls {
        CameraControls::new(Camera::default(), ControlsOptions::default())
    }

    fn record(c: &CameraControls) -> Rc<RefCell<Vec<ControlsEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for event in ControlsEvent::ALL {
            let log = Rc::clone(&log);
            let _ = c.add_event_listener(event, move |e| log.borrow_mut().push(e));
        }
        log
    }

    #[test]
    fn rotate_to_comes_to_rest() {
        let mut c = controls();
        assert!(c.azimuth_angle().abs() < 1e-12);
        let polar = c.polar_angle();
        let handle = c.rotate_to(FRAC_PI_2, polar, true);
        for _ in 0..180 {
            let _ = c.update(DT);
        }
        assert!((c.azimuth_angle() - FRAC_PI_2).abs() < 0.01);
        assert!(handle.is_resolved());
        pollster::block_on(handle);
    }

    #[test]
    fn handle_stays_pending_until_settled() {
        let mut c = controls();
        let handle = c.dolly_to(10.0, true);
        assert!(!handle.is_resolved());
        let _ = c.update(DT);
        assert!(!handle.is_resolved());
        let mut ticks = 1;
        while !handle.is_resolved() && ticks < 600 {
            let _ = c.update(DT);
            ticks += 1;
        }
        assert!(handle.is_resolved());
        assert!((c.distance() - 10.0).abs() < 0.01);
        assert!(ticks > 10);
    }

    #[test]
    fn lifecycle_wake_update_rest_sleep() {
        let mut c = controls();
        let log = record(&c);
        let _ = c.rotate_to(0.5, c.polar_angle(), true);
        for _ in 0..240 {
            let _ = c.update(DT);
        }
        let events = log.borrow();
        assert_eq!(events[0], ControlsEvent::TransitionStart);
        assert_eq!(events[1], ControlsEvent::Wake);
        assert_eq!(events[2], ControlsEvent::Update);
        let rest = events.iter().position(|e| *e == ControlsEvent::Rest);
        let sleep = events.iter().position(|e| *e == ControlsEvent::Sleep);
        assert!(rest.is_some() && sleep.is_some());
        assert!(rest < sleep);
        assert_eq!(events.iter().filter(|e| **e == ControlsEvent::Rest).count(), 1);
        assert_eq!(events.last(), Some(&ControlsEvent::Sleep));
    }

    #[test]
    fn instant_jump_rests_then_sleeps() {
        let mut c = controls();
        let log = record(&c);
        let _ = c.dolly_to(3.0, false);
        assert!(c.update(DT));
        assert!(!c.update(DT));
        assert_eq!(
            *log.borrow(),
            vec![
                ControlsEvent::Wake,
                ControlsEvent::Update,
                ControlsEvent::Rest,
                ControlsEvent::Sleep,
            ]
        );
    }

    #[test]
    fn idle_tick_reports_no_change() {
        let mut c = controls();
        let log = record(&c);
        assert!(!c.update(DT));
        assert!(!c.update(DT));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn zero_delta_time_integrates_nothing() {
        let mut c = controls();
        let _ = c.rotate_to(1.0, c.polar_angle(), true);
        let before = c.azimuth_angle();
        let _ = c.update(0.0);
        assert_eq!(c.azimuth_angle(), before);
        let _ = c.update(-1.0);
        assert_eq!(c.azimuth_angle(), before);
    }

    #[test]
    fn focal_offset_shifts_camera_in_screen_space() {
        let mut c = controls();
        let _ = c.set_focal_offset(DVec3::new(1.0, 2.0, 0.0), false);
        let _ = c.update(DT);
        let position = c.camera().position;
        assert!((position - DVec3::new(1.0, -2.0, 5.0)).length() < 1e-9);
        // The orbit itself is unchanged.
        assert!((c.position(false) - DVec3::new(0.0, 0.0, 5.0)).length() < 1e-9);
    }

    #[test]
    fn boundary_can_enclose_camera() {
        let mut options = ControlsOptions::default();
        options.behavior.boundary_encloses_camera = true;
        let mut c = CameraControls::new(Camera::default(), options);
        c.set_boundary(Some(crate::util::bounds::Aabb::new(
            DVec3::splat(-2.0),
            DVec3::splat(2.0),
        )));
        let _ = c.update(DT);
        assert!(c.camera().position.z <= 2.0 + 1e-9);
    }

    #[test]
    fn collider_added_later_still_comes_to_rest() {
        let mut c = controls();
        let log = record(&c);
        // A wall between the target and the camera at z = 3.
        c.add_collider(Box::new(crate::camera::TriangleMesh::new(
            vec![
                DVec3::new(-10.0, -10.0, 3.0),
                DVec3::new(10.0, -10.0, 3.0),
                DVec3::new(0.0, 10.0, 3.0),
            ],
            vec![[0, 1, 2]],
        )));
        let handle = c.rotate_to(0.2, c.polar_angle(), true);
        let mut updated_ticks = 0;
        for _ in 0..600 {
            if c.update(DT) {
                updated_ticks += 1;
            }
        }
        assert!(updated_ticks < 600);
        assert!(handle.is_resolved());
        assert!(!c.update(DT));
        assert!(c.distance() < 3.1);
        assert_eq!(c.spherical(true).radius, c.spherical(false).radius);
        assert_eq!(log.borrow().last(), Some(&ControlsEvent::Sleep));
    }

    #[test]
    fn zoom_is_written_to_camera() {
        let mut c = controls();
        let _ = c.zoom_to(2.0, false);
        let _ = c.update(DT);
        assert_eq!(c.camera().zoom, 2.0);
    }

    #[test]
    fn motion_converges_for_every_dof() {
        let mut c = controls();
        let _ = c.set_look_at(DVec3::new(3.0, 4.0, -2.0), DVec3::new(1.0, 0.0, 1.0), true);
        let _ = c.set_focal_offset(DVec3::new(0.5, 0.5, 0.0), true);
        let _ = c.zoom_to(1.5, true);
        for _ in 0..300 {
            let _ = c.update(DT);
        }
        assert_eq!(c.pending_motions(), 0);
        assert!((c.target(false) - DVec3::new(1.0, 0.0, 1.0)).length() < 0.01);
        assert!((c.zoom_factor(false) - 1.5).abs() < 0.01);
        assert!((c.focal_offset(false) - DVec3::new(0.5, 0.5, 0.0)).length() < 0.01);
    }
}
