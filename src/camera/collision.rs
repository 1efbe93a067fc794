//! Ray-cast collision against scene geometry.
//!
//! Four rays run from the orbit target toward the camera, offset by the
//! near-plane corners, so the whole near plane stays clear of colliders.

use glam::{DMat3, DVec3};

use super::core::Camera;
use crate::util::bounds::Aabb;
use crate::util::ray::{ray_aabb, ray_triangle, Ray};

/// Geometry the camera must not pass through.
pub trait Collider {
    /// Distance along `ray` to the nearest hit within `max_distance`.
    fn raycast(&self, ray: &Ray, max_distance: f64) -> Option<f64>;
}

impl Collider for Aabb {
    fn raycast(&self, ray: &Ray, max_distance: f64) -> Option<f64> {
        ray_aabb(ray, self).filter(|&t| t <= max_distance)
    }
}

/// Indexed triangle soup in world space.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<DVec3>,
    /// Triangles as vertex index triples.
    pub indices: Vec<[u32; 3]>,
    bounds: Aabb,
}

impl TriangleMesh {
    /// Build a mesh; the bounding box is computed once for early rejection.
    #[must_use]
    pub fn new(vertices: Vec<DVec3>, indices: Vec<[u32; 3]>) -> Self {
        let bounds = Aabb::from_points(&vertices);
        Self {
            vertices,
            indices,
            bounds,
        }
    }

    fn triangle(&self, tri: [u32; 3]) -> Option<(DVec3, DVec3, DVec3)> {
        let v = |i: u32| self.vertices.get(i as usize).copied();
        Some((v(tri[0])?, v(tri[1])?, v(tri[2])?))
    }
}

impl Collider for TriangleMesh {
    fn raycast(&self, ray: &Ray, max_distance: f64) -> Option<f64> {
        if ray_aabb(ray, &self.bounds)
            .filter(|&t| t <= max_distance)
            .is_none()
        {
            return None;
        }

        self.indices
            .iter()
            .filter_map(|&tri| self.triangle(tri))
            .filter_map(|(a, b, c)| ray_triangle(ray, a, b, c))
            .filter(|&t| t <= max_distance)
            .min_by(f64::total_cmp)
    }
}

/// Largest orbit radius that keeps the near plane clear of `colliders`.
///
/// `to_camera` is the unit direction from `target` toward the camera. Returns
/// `f64::INFINITY` with no colliders or for orthographic cameras.
#[must_use]
pub fn collision_distance(
    camera: &Camera,
    colliders: &[Box<dyn Collider>],
    target: DVec3,
    to_camera: DVec3,
    radius: f64,
) -> f64 {
    if colliders.is_empty() || !camera.is_perspective() {
        return f64::INFINITY;
    }

    let z = -to_camera;
    let mut x = camera.up.cross(z);
    if x.length_squared() == 0.0 {
        x = DVec3::X.cross(z);
    }
    let x = x.normalize_or_zero();
    let y = z.cross(x);
    let rotation = DMat3::from_cols(x, y, z);

    let far = radius + 1.0;
    let mut distance = f64::INFINITY;
    for corner in camera.near_plane_corners() {
        let ray = Ray::new(target + rotation * corner, to_camera);
        for collider in colliders {
            if let Some(t) = collider.raycast(&ray, far) {
                distance = distance.min(t);
            }
        }
    }
    distance
}
