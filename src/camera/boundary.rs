//! Containment of the orbit target inside an axis-aligned box.

use glam::DVec3;

use crate::util::bounds::Aabb;

/// Axis-aligned region the orbit target must stay inside.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Boundary {
    /// The enclosing box; [`Aabb::INFINITE`] when unbounded.
    pub aabb: Aabb,
}

impl Boundary {
    /// Boundary from an optional box (`None` = unbounded).
    #[must_use]
    pub fn new(aabb: Option<Aabb>) -> Self {
        Self {
            aabb: aabb.unwrap_or(Aabb::INFINITE),
        }
    }

    /// Nearest point inside the boundary.
    #[must_use]
    pub fn clamp_point(&self, point: DVec3) -> DVec3 {
        self.aabb.clamp_point(point)
    }

    /// Move `position` by `offset` without leaving the boundary.
    ///
    /// With `friction == 0` the excess past the wall is removed exactly and
    /// the result lands on the wall. With `friction > 0` the free motion is
    /// scaled down in proportion to how far it would have overshot, which
    /// makes motion along the wall slow down ("soft wall").
    #[must_use]
    pub fn enclose(&self, position: DVec3, offset: DVec3, friction: f64) -> DVec3 {
        let offset_length_sq = offset.length_squared();
        if offset_length_sq == 0.0 {
            return position;
        }

        let new_target = position + offset;
        let clamped_delta = self.clamp_point(new_target) - new_target;
        let clamped_delta_length_sq = clamped_delta.length_squared();

        if clamped_delta_length_sq == 0.0 {
            // Fully inside.
            position + offset
        } else if clamped_delta_length_sq == offset_length_sq {
            // The whole offset pushes into the wall.
            position
        } else if friction == 0.0 {
            position + offset + clamped_delta
        } else {
            let offset_factor =
                1.0 + friction * clamped_delta_length_sq / offset.dot(clamped_delta);
            position + offset * offset_factor + clamped_delta * (1.0 - friction)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Boundary {
        Boundary::new(Some(Aabb::new(DVec3::splat(-1.0), DVec3::splat(1.0))))
    }

    #[test]
    fn unbounded_passes_through() {
        let b = Boundary::default();
        let p = b.enclose(DVec3::ZERO, DVec3::new(100.0, -5.0, 3.0), 0.0);
        assert_eq!(p, DVec3::new(100.0, -5.0, 3.0));
    }

    #[test]
    fn hard_stop_lands_on_wall() {
        let p = unit_box().enclose(DVec3::ZERO, DVec3::new(3.0, 0.5, 0.0), 0.0);
        assert_eq!(p, DVec3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn friction_slows_sliding_along_wall() {
        let b = Boundary::new(Some(Aabb::new(
            DVec3::new(-1.0, -10.0, -10.0),
            DVec3::new(1.0, 10.0, 10.0),
        )));
        let free = b.enclose(DVec3::ZERO, DVec3::new(3.0, 3.0, 0.0), 0.0);
        let soft = b.enclose(DVec3::ZERO, DVec3::new(3.0, 3.0, 0.0), 0.5);
        assert_eq!(free.x, 1.0);
        assert!((soft.x - 1.0).abs() < 1e-12);
        assert!(soft.y < free.y);
        assert!(b.aabb.contains_point(soft));
    }

    #[test]
    fn zero_offset_is_identity() {
        let p = DVec3::new(0.3, 0.2, 0.1);
        assert_eq!(unit_box().enclose(p, DVec3::ZERO, 0.7), p);
    }

    #[test]
    fn pushing_straight_into_wall_stays_put() {
        let on_wall = DVec3::new(1.0, 0.0, 0.0);
        let p = unit_box().enclose(on_wall, DVec3::new(2.0, 0.0, 0.0), 0.0);
        assert_eq!(p, on_wall);
    }
}
