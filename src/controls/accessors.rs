//! Read accessors, direct setters and host wiring for [`CameraControls`].

use glam::DVec3;

use super::CameraControls;
use crate::camera::{Boundary, Camera};
use crate::input::{Action, Rect};
use crate::options::ControlsOptions;
use crate::util::spherical::Spherical;

// ── Camera and options ──

impl CameraControls {
    /// The driven camera, as of the last [`update`](Self::update).
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable access for projection changes (aspect, fov, near/far).
    /// Pose fields are overwritten on the next update; change `up` through
    /// [`update_camera_up`](Self::update_camera_up).
    pub fn camera_mut(&mut self) -> &mut Camera {
        self.needs_update = true;
        &mut self.camera
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &ControlsOptions {
        &self.options
    }

    /// Replace all options. Bindings take effect for the next gesture.
    pub fn set_options(&mut self, options: ControlsOptions) {
        if options.bindings != self.options.bindings {
            self.input.set_bindings(options.bindings);
        }
        self.options = options;
        self.needs_update = true;
    }

    /// Whether user input is processed.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable user input. Disabling ends any gesture in
    /// progress; programmatic mutators keep working.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.cancel();
            self.release_keys();
        }
        self.enabled = enabled;
    }

    /// Element rectangle in client pixels, used for all pointer math.
    pub fn set_element_rect(&mut self, rect: Rect) {
        self.input.set_element_rect(rect);
    }

    /// Restrict pointer math to a sub-viewport of the element, in element
    /// pixels with a bottom-left origin. `None` uses the whole element.
    pub fn set_viewport(&mut self, viewport: Option<Rect>) {
        self.input.set_viewport(viewport);
    }

    /// Only accept pointer-down and wheel events inside `area`, given in
    /// normalized `[0, 1]` element coordinates.
    pub fn set_interactive_area(&mut self, area: Rect) {
        self.input.set_interactive_area(area);
    }

    /// Use macOS wheel normalization.
    pub fn set_mac_wheel(&mut self, mac: bool) {
        self.input.set_mac_wheel(mac);
    }
}

// ── Pose queries ──

impl CameraControls {
    /// Orbit target; the end value with `end`, else the current one.
    #[must_use]
    pub fn target(&self, end: bool) -> DVec3 {
        if end {
            self.target_end
        } else {
            self.target
        }
    }

    /// Camera position implied by the rig, before the focal offset.
    #[must_use]
    pub fn position(&self, end: bool) -> DVec3 {
        let (spherical, target) = if end {
            (self.spherical_end, self.target_end)
        } else {
            (self.spherical, self.target)
        };
        self.y_up_space_inverse * spherical.to_vec3() + target
    }

    /// Spherical rig coordinates in y-up space.
    #[must_use]
    pub fn spherical(&self, end: bool) -> Spherical {
        if end {
            self.spherical_end
        } else {
            self.spherical
        }
    }

    /// Screen-space focal offset.
    #[must_use]
    pub fn focal_offset(&self, end: bool) -> DVec3 {
        if end {
            self.focal_offset_end
        } else {
            self.focal_offset
        }
    }

    /// Zoom factor.
    #[must_use]
    pub fn zoom_factor(&self, end: bool) -> f64 {
        if end {
            self.zoom_end
        } else {
            self.zoom
        }
    }

    /// Current azimuth in radians.
    #[must_use]
    pub fn azimuth_angle(&self) -> f64 {
        self.spherical.theta
    }

    /// Current polar angle in radians.
    #[must_use]
    pub fn polar_angle(&self) -> f64 {
        self.spherical.phi
    }

    /// Current orbit distance.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.spherical.radius
    }

    /// Action of the gesture in progress.
    #[must_use]
    pub fn current_action(&self) -> Action {
        self.input.action()
    }

    /// Whether the user is driving any degree of freedom right now.
    #[must_use]
    pub fn is_user_controlling(&self) -> bool {
        self.user.any() || !self.held_keys.is_empty()
    }

    /// Whether a pointer-lock drag is active.
    #[must_use]
    pub fn is_pointer_locked(&self) -> bool {
        self.input.is_pointer_locked()
    }

    /// The target boundary.
    #[must_use]
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Number of motion handles waiting for rest.
    #[must_use]
    pub fn pending_motions(&self) -> usize {
        self.rest.pending_count()
    }
}

// ── Direct setters ──

impl CameraControls {
    /// Set the azimuth immediately, without clamping or transition.
    pub fn set_azimuth_angle(&mut self, azimuth: f64) {
        self.spherical.theta = azimuth;
        self.spherical_end.theta = azimuth;
        self.needs_update = true;
    }

    /// Set the polar angle immediately, without clamping or transition.
    pub fn set_polar_angle(&mut self, polar: f64) {
        self.spherical.phi = polar;
        self.spherical_end.phi = polar;
        self.needs_update = true;
    }

    /// Set the orbit distance immediately, without clamping or transition.
    pub fn set_distance(&mut self, distance: f64) {
        if self.spherical.radius == distance && self.spherical_end.radius == distance {
            return;
        }
        self.spherical.radius = distance;
        self.spherical_end.radius = distance;
        self.needs_update = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rig_matches_camera() {
        let c = CameraControls::new(Camera::default(), ControlsOptions::default());
        assert!((c.distance() - 5.0).abs() < 1e-12);
        assert!(c.azimuth_angle().abs() < 1e-12);
        assert!((c.position(false) - DVec3::new(0.0, 0.0, 5.0)).length() < 1e-9);
        assert_eq!(c.zoom_factor(false), 1.0);
    }

    #[test]
    fn direct_setters_skip_transition() {
        let mut c = CameraControls::new(Camera::default(), ControlsOptions::default());
        c.set_azimuth_angle(1.25);
        c.set_polar_angle(0.75);
        c.set_distance(3.0);
        assert_eq!(c.spherical(false), c.spherical(true));
        assert_eq!(c.spherical(true), Spherical::new(3.0, 0.75, 1.25));
        assert!(c.update(1.0 / 60.0));
    }

    #[test]
    fn degenerate_up_falls_back_to_y() {
        let mut camera = Camera::default();
        camera.up = DVec3::ZERO;
        let c = CameraControls::new(camera, ControlsOptions::default());
        assert_eq!(c.camera().up, DVec3::Y);
        assert!(c.camera().position.is_finite());
    }

    #[test]
    fn z_up_camera_orbits_about_z() {
        let mut camera = Camera::default();
        camera.up = DVec3::Z;
        camera.position = DVec3::new(0.0, -5.0, 0.0);
        let mut c = CameraControls::new(camera, ControlsOptions::default());
        let _ = c.rotate(std::f64::consts::FRAC_PI_2, 0.0, false);
        let _ = c.update(1.0 / 60.0);
        // Azimuth turns about the up axis, so height is unchanged.
        assert!(c.camera().position.z.abs() < 1e-9);
        assert!((c.camera().position.length() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn set_options_rebinds_input() {
        let mut c = CameraControls::new(Camera::default(), ControlsOptions::default());
        let mut options = c.options().clone();
        options.bindings.mouse.wheel = Action::ZOOM;
        c.set_options(options);
        assert_eq!(c.input.bindings().mouse.wheel, Action::ZOOM);
    }
}
