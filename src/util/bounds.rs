//! Axis-aligned boxes and bounding spheres.
//!
//! Used for fitting the camera to content, for the target boundary, and as
//! the simplest collider shape.

use glam::DVec3;

/// Axis-aligned bounding box. Any axis may be unbounded (`±inf`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl Aabb {
    /// A box covering all of space.
    pub const INFINITE: Self = Self {
        min: DVec3::NEG_INFINITY,
        max: DVec3::INFINITY,
    };

    /// Create from two corners.
    #[must_use]
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// An inverted (empty) box that any point expands.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: DVec3::INFINITY,
            max: DVec3::NEG_INFINITY,
        }
    }

    /// Box centered at `center` with full extents `size`.
    #[must_use]
    pub fn from_center_size(center: DVec3, size: DVec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box containing every point. Empty for an empty slice.
    #[must_use]
    pub fn from_points(points: &[DVec3]) -> Self {
        points.iter().fold(Self::empty(), |mut bb, &p| {
            bb.expand_by_point(p);
            bb
        })
    }

    /// `true` when the box contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x
            || self.max.y < self.min.y
            || self.max.z < self.min.z
    }

    /// Grow to include `point`.
    pub fn expand_by_point(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Full extents. Zero for an empty box.
    #[must_use]
    pub fn size(&self) -> DVec3 {
        if self.is_empty() {
            DVec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Center point. Zero for an empty box.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        if self.is_empty() {
            DVec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    /// Nearest point inside the box.
    #[must_use]
    pub fn clamp_point(&self, point: DVec3) -> DVec3 {
        point.clamp(self.min, self.max)
    }

    /// `true` when `point` lies inside or on the box.
    #[must_use]
    pub fn contains_point(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// The eight corners.
    #[must_use]
    pub fn corners(&self) -> [DVec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(a.x, b.y, b.z),
            DVec3::new(b.x, b.y, b.z),
        ]
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::INFINITE
    }
}

/// Sphere given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Sphere center.
    pub center: DVec3,
    /// Sphere radius.
    pub radius: f64,
}

impl BoundingSphere {
    /// Create from center and radius.
    #[must_use]
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Sphere around the bounding-box center that reaches every point.
    #[must_use]
    pub fn from_points(points: &[DVec3]) -> Self {
        let center = Aabb::from_points(points).center();
        let radius = points
            .iter()
            .map(|p| p.distance_squared(center))
            .fold(0.0_f64, f64::max)
            .sqrt();
        Self { center, radius }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_has_no_size() {
        let bb = Aabb::empty();
        assert!(bb.is_empty());
        assert_eq!(bb.size(), DVec3::ZERO);
        assert!(Aabb::from_points(&[]).is_empty());
    }

    #[test]
    fn from_points_bounds_all() {
        let bb = Aabb::from_points(&[
            DVec3::new(-1.0, 2.0, 0.0),
            DVec3::new(3.0, -4.0, 1.0),
        ]);
        assert_eq!(bb.min, DVec3::new(-1.0, -4.0, 0.0));
        assert_eq!(bb.max, DVec3::new(3.0, 2.0, 1.0));
        assert_eq!(bb.center(), DVec3::new(1.0, -1.0, 0.5));
    }

    #[test]
    fn infinite_box_clamps_nothing() {
        let p = DVec3::new(1e9, -1e9, 3.0);
        assert_eq!(Aabb::INFINITE.clamp_point(p), p);
        assert!(Aabb::INFINITE.contains_point(p));
    }

    #[test]
    fn partially_unbounded_box() {
        let bb = Aabb::new(
            DVec3::new(f64::NEG_INFINITY, 0.0, f64::NEG_INFINITY),
            DVec3::new(f64::INFINITY, 10.0, f64::INFINITY),
        );
        let p = bb.clamp_point(DVec3::new(50.0, -5.0, -50.0));
        assert_eq!(p, DVec3::new(50.0, 0.0, -50.0));
    }

    #[test]
    fn bounding_sphere_reaches_corners() {
        let s = BoundingSphere::from_points(&[
            DVec3::splat(-1.0),
            DVec3::splat(1.0),
        ]);
        assert_eq!(s.center, DVec3::ZERO);
        assert!((s.radius - 3.0_f64.sqrt()).abs() < 1e-12);
    }
}
