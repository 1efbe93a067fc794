//! Spherical coordinates for the orbit rig.
//!
//! The rig works in a canonical y-up space: `theta` (azimuth) rotates about
//! +Y starting from +Z, `phi` (polar angle) is measured down from +Y.

use std::f64::consts::PI;

use glam::DVec3;

/// Distance from the poles kept by [`Spherical::make_safe`].
const POLE_EPSILON: f64 = 1e-6;

/// Radius, polar angle and azimuth of a point relative to the orbit target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    /// Distance from the origin.
    pub radius: f64,
    /// Polar angle from +Y, in radians, `[0, π]`.
    pub phi: f64,
    /// Azimuth about +Y from +Z, in radians. Accumulates past ±π.
    pub theta: f64,
}

impl Default for Spherical {
    fn default() -> Self {
        Self {
            radius: 1.0,
            phi: 0.0,
            theta: 0.0,
        }
    }
}

impl Spherical {
    /// Create from explicit components.
    #[must_use]
    pub fn new(radius: f64, phi: f64, theta: f64) -> Self {
        Self { radius, phi, theta }
    }

    /// Spherical coordinates of `v`. The zero vector maps to zero angles.
    #[must_use]
    pub fn from_vec3(v: DVec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    /// Cartesian point for these coordinates.
    #[must_use]
    pub fn to_vec3(self) -> DVec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        DVec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Unit direction for these angles, ignoring the radius.
    #[must_use]
    pub fn direction(self) -> DVec3 {
        Self { radius: 1.0, ..self }.to_vec3()
    }

    /// Keep `phi` off the exact poles so the view basis never degenerates.
    pub fn make_safe(&mut self) {
        self.phi = self.phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);
    }
}
