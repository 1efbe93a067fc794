//! Framing helpers: fit the view to a box or a sphere.

use std::f64::consts::FRAC_PI_2;

use glam::{DQuat, DVec3};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::CameraControls;
use crate::camera::Projection;
use crate::rest::MotionHandle;
use crate::util::bounds::{Aabb, BoundingSphere};
use crate::util::damping::{approx_equals, round_to_step, EPSILON};

/// Options for [`CameraControls::fit_to_box`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FitOptions {
    /// Fill the viewport (crop) instead of fitting inside it.
    pub cover: bool,
    /// Extra world units left of the box.
    pub padding_left: f64,
    /// Extra world units right of the box.
    pub padding_right: f64,
    /// Extra world units below the box.
    pub padding_bottom: f64,
    /// Extra world units above the box.
    pub padding_top: f64,
}

impl CameraControls {
    /// Frame `aabb` from the nearest axis-aligned viewing direction.
    ///
    /// The azimuth and polar angle snap to multiples of 90°, then the
    /// target moves to the box center and the distance (perspective) or
    /// zoom (orthographic) is chosen so the box fills the view.
    pub fn fit_to_box(
        &mut self,
        aabb: &Aabb,
        transition: bool,
        options: FitOptions,
    ) -> MotionHandle {
        if aabb.is_empty() {
            log::warn!("fit_to_box: cannot fit an empty box; ignored");
            return MotionHandle::resolved();
        }

        let theta = round_to_step(self.spherical_end.theta, FRAC_PI_2);
        let phi = round_to_step(self.spherical_end.phi, FRAC_PI_2);
        let mut handles = vec![self.rotate_to(theta, phi, transition)];

        // Into a frame where the view direction is +Z.
        let normal = self.spherical_end.direction();
        let view_from_pole = approx_equals(normal.y.abs(), 1.0, EPSILON);
        let pole_twist = DQuat::from_axis_angle(DVec3::Y, theta);
        let mut to_view = DQuat::from_rotation_arc(normal, DVec3::Z);
        if view_from_pole {
            to_view *= pole_twist;
        }
        to_view *= self.y_up_space_inverse;

        let mut bb = Aabb::from_points(&aabb.corners().map(|corner| to_view * corner));
        bb.min.x -= options.padding_left;
        bb.min.y -= options.padding_bottom;
        bb.max.x += options.padding_right;
        bb.max.y += options.padding_top;

        let mut from_view = DQuat::from_rotation_arc(DVec3::Z, normal);
        if view_from_pole {
            from_view = pole_twist.inverse() * from_view;
        }
        from_view = self.y_up_space * from_view;

        let size = bb.size();
        let center = from_view * bb.center();

        match self.camera.projection {
            Projection::Perspective { .. } => {
                let distance =
                    self.get_distance_to_fit_box(size.x, size.y, size.z, options.cover);
                handles.push(self.move_to(center, transition));
                handles.push(self.dolly_to(distance, transition));
            }
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
            } => {
                let (zx, zy) = ((right - left) / size.x, (top - bottom) / size.y);
                let zoom = if options.cover { zx.max(zy) } else { zx.min(zy) };
                handles.push(self.move_to(center, transition));
                handles.push(self.zoom_to(zoom, transition));
            }
        }
        handles.push(self.set_focal_offset(DVec3::ZERO, transition));

        MotionHandle::all(handles)
    }

    /// Frame `sphere`: move to its center and pick the distance (or zoom)
    /// at which it fits the narrower field of view.
    pub fn fit_to_sphere(&mut self, sphere: &BoundingSphere, transition: bool) -> MotionHandle {
        let mut handles = vec![self.move_to(sphere.center, transition)];

        match self.camera.projection {
            Projection::Perspective { .. } => {
                let distance = self.get_distance_to_fit_sphere(sphere.radius);
                handles.push(self.dolly_to(distance, transition));
            }
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
            } => {
                let diameter = 2.0 * sphere.radius;
                let zoom = ((right - left) / diameter).min((top - bottom) / diameter);
                handles.push(self.zoom_to(zoom, transition));
            }
        }
        handles.push(self.set_focal_offset(DVec3::ZERO, transition));

        MotionHandle::all(handles)
    }

    /// Distance at which a `width` × `height` rectangle, `depth` deep,
    /// fills the view. Perspective cameras only; orthographic cameras log a
    /// warning and get the current distance back.
    #[must_use]
    pub fn get_distance_to_fit_box(&self, width: f64, height: f64, depth: f64, cover: bool) -> f64 {
        let Some(fov) = self.camera.effective_fov() else {
            log::warn!("get_distance_to_fit_box is not supported for orthographic cameras");
            return self.spherical.radius;
        };
        let rect_aspect = width / height;
        let aspect = self.camera.aspect();
        let fit_height = if cover {
            rect_aspect > aspect
        } else {
            rect_aspect < aspect
        };
        let height_to_fit = if fit_height { height } else { width / aspect };
        height_to_fit * 0.5 / (fov.to_radians() * 0.5).tan() + depth * 0.5
    }

    /// Distance at which a sphere of `radius` fits the narrower field of
    /// view. Perspective cameras only.
    #[must_use]
    pub fn get_distance_to_fit_sphere(&self, radius: f64) -> f64 {
        let Some(fov) = self.camera.effective_fov() else {
            log::warn!("get_distance_to_fit_sphere is not supported for orthographic cameras");
            return self.spherical.radius;
        };
        let aspect = self.camera.aspect();
        let v_fov = fov.to_radians();
        let h_fov = ((v_fov * 0.5).tan() * aspect).atan() * 2.0;
        let fov = if aspect > 1.0 { v_fov } else { h_fov };
        radius / (fov * 0.5).sin()
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
    fn distance_to_fit_square_box() {
        let c = controls();
        let expected = 1.0 / 25.0_f64.to_radians().tan();
        let distance = c.get_distance_to_fit_box(2.0, 2.0, 0.0, false);
        assert!((distance - expected).abs() < 1e-12);
    }

    #[test]
    fn fit_to_box_frames_cube() {
        let mut c = controls();
        let cube = Aabb::from_center_size(DVec3::ZERO, DVec3::splat(2.0));
        let handle = c.fit_to_box(&cube, false, FitOptions::default());
        assert!(handle.is_resolved());
        let expected = 1.0 / 25.0_f64.to_radians().tan() + 1.0;
        assert!((c.distance() - expected).abs() < 1e-9);
        assert!(c.target(true).length() < 1e-9);
    }

    #[test]
    fn fit_to_box_snaps_to_axis_and_centers() {
        let mut c = controls();
        let _ = c.rotate_to(0.3, 1.4, false);
        let bb = Aabb::new(DVec3::new(2.0, 0.0, 0.0), DVec3::new(4.0, 1.0, 1.0));
        let _ = c.fit_to_box(&bb, false, FitOptions::default());
        assert!(c.azimuth_angle().abs() < 1e-9);
        assert!((c.polar_angle() - FRAC_PI_2).abs() < 1e-9);
        assert!((c.target(true) - bb.center()).length() < 1e-9);
    }

    #[test]
    fn cover_needs_less_distance_for_wide_box() {
        let c = controls();
        let fit = c.get_distance_to_fit_box(4.0, 1.0, 0.0, false);
        let cover = c.get_distance_to_fit_box(4.0, 1.0, 0.0, true);
        assert!(cover < fit);
    }

    #[test]
    fn padding_pushes_camera_back() {
        let mut c = controls();
        let cube = Aabb::from_center_size(DVec3::ZERO, DVec3::splat(2.0));
        let _ = c.fit_to_box(&cube, false, FitOptions::default());
        let tight = c.distance();
        let padded = FitOptions {
            padding_left: 1.0,
            padding_right: 1.0,
            padding_top: 1.0,
            padding_bottom: 1.0,
            ..FitOptions::default()
        };
        let _ = c.fit_to_box(&cube, false, padded);
        assert!(c.distance() > tight);
    }

    #[test]
    fn empty_box_is_ignored() {
        let mut c = controls();
        let before = c.distance();
        let handle = c.fit_to_box(&Aabb::empty(), true, FitOptions::default());
        assert!(handle.is_resolved());
        assert_eq!(c.distance(), before);
    }

    #[test]
    fn fit_to_sphere_distance() {
        let mut c = controls();
        let sphere = BoundingSphere::new(DVec3::new(1.0, 2.0, 3.0), 2.0);
        let _ = c.fit_to_sphere(&sphere, false);
        // Square aspect uses the horizontal fov, which equals the vertical.
        let expected = 2.0 / 25.0_f64.to_radians().sin();
        assert!((c.distance() - expected).abs() < 1e-9);
        assert_eq!(c.target(true), sphere.center);
    }

    #[test]
    fn orthographic_fit_uses_zoom() {
        let camera = Camera::orthographic(-4.0, 4.0, 2.0, -2.0, 0.1, 100.0);
        let mut c = CameraControls::new(camera, ControlsOptions::default());
        let radius = c.distance();
        assert_eq!(c.get_distance_to_fit_box(1.0, 1.0, 1.0, false), radius);

        let bb = Aabb::from_center_size(DVec3::ZERO, DVec3::splat(2.0));
        let _ = c.fit_to_box(&bb, false, FitOptions::default());
        assert!((c.zoom_factor(true) - 2.0).abs() < 1e-9);
        let _ = c.fit_to_box(&bb, false, FitOptions { cover: true, ..FitOptions::default() });
        assert!((c.zoom_factor(true) - 4.0).abs() < 1e-9);
    }
}
