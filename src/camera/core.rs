use glam::{DMat3, DMat4, DQuat, DVec2, DVec3};

/// Projection kind and its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection.
    Perspective {
        /// Vertical field of view in degrees (before zoom).
        fov: f64,
        /// Viewport aspect ratio (width / height).
        aspect: f64,
    },
    /// Orthographic projection; extents are in view units before zoom.
    Orthographic {
        /// Left plane.
        left: f64,
        /// Right plane.
        right: f64,
        /// Top plane.
        top: f64,
        /// Bottom plane.
        bottom: f64,
    },
}

/// Camera pose and projection driven by the controller.
///
/// The camera looks down its local -Z axis; `rotation` maps local axes to
/// world space. Hosts read `position`/`rotation` each frame after
/// [`CameraControls::update`](crate::controls::CameraControls::update).
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position in world space.
    pub position: DVec3,
    /// World-space up direction the rig orbits around.
    pub up: DVec3,
    /// Orientation (local → world).
    pub rotation: DQuat,
    /// Projection kind.
    pub projection: Projection,
    /// Near clipping plane distance.
    pub near: f64,
    /// Far clipping plane distance.
    pub far: f64,
    /// Zoom factor applied to the projection.
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(50.0, 1.0, 0.1, 2000.0)
    }
}

impl Camera {
    /// Perspective camera at `(0, 0, 5)` looking at the origin.
    #[must_use]
    pub fn perspective(fov: f64, aspect: f64, near: f64, far: f64) -> Self {
        Self::with_projection(Projection::Perspective { fov, aspect }, near, far)
    }

    /// Orthographic camera at `(0, 0, 5)` looking at the origin.
    #[must_use]
    pub fn orthographic(
        left: f64,
        right: f64,
        top: f64,
        bottom: f64,
        near: f64,
        far: f64,
    ) -> Self {
        Self::with_projection(
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
            },
            near,
            far,
        )
    }

    fn with_projection(projection: Projection, near: f64, far: f64) -> Self {
        let mut camera = Self {
            position: DVec3::new(0.0, 0.0, 5.0),
            up: DVec3::Y,
            rotation: DQuat::IDENTITY,
            projection,
            near,
            far,
            zoom: 1.0,
        };
        camera.look_at(DVec3::ZERO);
        camera
    }

    /// Whether this is a perspective camera.
    #[must_use]
    pub fn is_perspective(&self) -> bool {
        matches!(self.projection, Projection::Perspective { .. })
    }

    /// Orient the camera so its -Z axis points at `target`, keeping `up`.
    pub fn look_at(&mut self, target: DVec3) {
        let mut z = self.position - target;
        if z.length_squared() == 0.0 {
            z.z = 1.0;
        }
        z = z.normalize();

        let up = self.up;
        let mut x = up.cross(z);
        if x.length_squared() == 0.0 {
            // `up` and the view direction are parallel: nudge z.
            if up.z.abs() == 1.0 {
                z.x += 1e-4;
            } else {
                z.z += 1e-4;
            }
            z = z.normalize();
            x = up.cross(z);
        }
        let x = x.normalize();
        let y = z.cross(x);

        self.rotation = DQuat::from_mat3(&DMat3::from_cols(x, y, z));
    }

    /// Local X (right), Y (up) and Z (back) axes in world space.
    #[must_use]
    pub fn basis(&self) -> (DVec3, DVec3, DVec3) {
        (
            self.rotation * DVec3::X,
            self.rotation * DVec3::Y,
            self.rotation * DVec3::Z,
        )
    }

    /// World-space viewing direction.
    #[must_use]
    pub fn direction(&self) -> DVec3 {
        self.rotation * DVec3::NEG_Z
    }

    /// Field of view in degrees after zoom, for perspective cameras.
    #[must_use]
    pub fn effective_fov(&self) -> Option<f64> {
        match self.projection {
            Projection::Perspective { fov, .. } => {
                let half = (fov.to_radians() * 0.5).tan() / self.zoom;
                Some((2.0 * half.atan()).to_degrees())
            }
            Projection::Orthographic { .. } => None,
        }
    }

    /// Viewport aspect ratio implied by the projection.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        match self.projection {
            Projection::Perspective { aspect, .. } => aspect,
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
            } => (right - left) / (top - bottom),
        }
    }

    /// World → view transform.
    #[must_use]
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// View → clip transform with `[0, 1]` depth.
    #[must_use]
    pub fn projection_matrix(&self) -> DMat4 {
        match self.projection {
            Projection::Perspective { aspect, .. } => {
                let fov = self.effective_fov().unwrap_or(50.0);
                DMat4::perspective_rh(fov.to_radians(), aspect, self.near, self.far)
            }
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
            } => {
                let zoom_inv = 1.0 / self.zoom;
                let cx = (left + right) * 0.5;
                let cy = (top + bottom) * 0.5;
                let hw = (right - left) * 0.5 * zoom_inv;
                let hh = (top - bottom) * 0.5 * zoom_inv;
                DMat4::orthographic_rh(
                    cx - hw,
                    cx + hw,
                    cy - hh,
                    cy + hh,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> DMat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Near-plane corners in view space, counter-clockwise from bottom-left.
    #[must_use]
    pub fn near_plane_corners(&self) -> [DVec3; 4] {
        let (half_w, half_h) = match self.projection {
            Projection::Perspective { aspect, .. } => {
                let fov = self.effective_fov().unwrap_or(50.0).to_radians();
                let half_h = (fov * 0.5).tan() * self.near;
                (half_h * aspect, half_h)
            }
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
            } => {
                let zoom_inv = 1.0 / self.zoom;
                (
                    (right - left) * 0.5 * zoom_inv,
                    (top - bottom) * 0.5 * zoom_inv,
                )
            }
        };
        [
            DVec3::new(-half_w, -half_h, 0.0),
            DVec3::new(half_w, -half_h, 0.0),
            DVec3::new(half_w, half_h, 0.0),
            DVec3::new(-half_w, half_h, 0.0),
        ]
    }

    /// World-space point on the camera's view plane (through `position`)
    /// under normalized device coordinates `ndc`. Orthographic cameras only.
    #[must_use]
    pub fn unproject_on_view_plane(&self, ndc: DVec2) -> Option<DVec3> {
        match self.projection {
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
            } => {
                let zoom_inv = 1.0 / self.zoom;
                let x = ((left + right) * 0.5 + ndc.x * (right - left) * 0.5)
                    * zoom_inv;
                let y = ((top + bottom) * 0.5 + ndc.y * (top - bottom) * 0.5)
                    * zoom_inv;
                let (right_axis, up_axis, _) = self.basis();
                Some(self.position + right_axis * x + up_axis * y)
            }
            Projection::Perspective { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = Camera::default();
        assert!((camera.direction() - DVec3::NEG_Z).length() < 1e-12);
        let (x, y, _) = camera.basis();
        assert!((x - DVec3::X).length() < 1e-12);
        assert!((y - DVec3::Y).length() < 1e-12);
    }

    #[test]
    fn look_at_from_above_does_not_degenerate() {
        let mut camera = Camera::default();
        camera.position = DVec3::new(0.0, 10.0, 0.0);
        camera.look_at(DVec3::ZERO);
        assert!(camera.rotation.is_finite());
        assert!(camera.direction().dot(DVec3::NEG_Y) > 0.999);
    }

    #[test]
    fn zoom_narrows_effective_fov() {
        let mut camera = Camera::perspective(60.0, 1.0, 0.1, 100.0);
        assert!((camera.effective_fov().unwrap_or(0.0) - 60.0).abs() < 1e-9);
        camera.zoom = 2.0;
        assert!(camera.effective_fov().unwrap_or(90.0) < 60.0);
        let ortho = Camera::orthographic(-1.0, 1.0, 1.0, -1.0, 0.1, 100.0);
        assert!(ortho.effective_fov().is_none());
    }

    #[test]
    fn near_plane_corners_scale_with_near() {
        let camera = Camera::perspective(90.0, 2.0, 1.0, 100.0);
        let corners = camera.near_plane_corners();
        assert!((corners[2].y - 1.0).abs() < 1e-12);
        assert!((corners[2].x - 2.0).abs() < 1e-12);
    }

    #[test]
    fn ortho_unproject_center_is_position() {
        let camera = Camera::orthographic(-4.0, 4.0, 2.0, -2.0, 0.1, 100.0);
        let p = camera.unproject_on_view_plane(DVec2::ZERO);
        assert!(p.is_some_and(|p| (p - camera.position).length() < 1e-12));
        let edge = camera.unproject_on_view_plane(DVec2::new(1.0, 0.0));
        assert!(edge.is_some_and(|p| (p.x - 4.0).abs() < 1e-12));
    }
}
