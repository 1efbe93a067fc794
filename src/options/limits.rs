use std::f64::consts::PI;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Limits", inline)]
#[serde(default)]
/// Clamp ranges applied to every orbit mutation. Unbounded limits are
/// `±inf` (written as `inf` in TOML).
pub struct LimitOptions {
    /// Minimum orbit distance (perspective only).
    #[schemars(title = "Min Distance")]
    pub min_distance: f64,
    /// Maximum orbit distance (perspective only).
    #[schemars(title = "Max Distance")]
    pub max_distance: f64,
    /// Minimum camera zoom.
    #[schemars(title = "Min Zoom")]
    pub min_zoom: f64,
    /// Maximum camera zoom.
    #[schemars(title = "Max Zoom")]
    pub max_zoom: f64,
    /// Minimum polar angle in radians (0 = looking straight down).
    #[schemars(title = "Min Polar Angle", range(min = 0.0, max = 3.141_592_653_589_793), extend("step" = 0.01))]
    pub min_polar_angle: f64,
    /// Maximum polar angle in radians.
    #[schemars(title = "Max Polar Angle", range(min = 0.0, max = 3.141_592_653_589_793), extend("step" = 0.01))]
    pub max_polar_angle: f64,
    /// Minimum azimuth angle in radians.
    #[schemars(title = "Min Azimuth Angle")]
    pub min_azimuth_angle: f64,
    /// Maximum azimuth angle in radians.
    #[schemars(title = "Max Azimuth Angle")]
    pub max_azimuth_angle: f64,
}

impl Default for LimitOptions {
    fn default() -> Self {
        Self {
            min_distance: f64::EPSILON,
            max_distance: f64::INFINITY,
            min_zoom: 0.01,
            max_zoom: f64::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            min_azimuth_angle: f64::NEG_INFINITY,
            max_azimuth_angle: f64::INFINITY,
        }
    }
}

impl LimitOptions {
    /// Clamp an orbit distance.
    #[must_use]
    pub fn clamp_distance(&self, distance: f64) -> f64 {
        distance.max(self.min_distance).min(self.max_distance)
    }

    /// Clamp a zoom factor.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }

    /// Clamp a polar angle.
    #[must_use]
    pub fn clamp_polar(&self, polar: f64) -> f64 {
        polar.max(self.min_polar_angle).min(self.max_polar_angle)
    }

    /// Clamp an azimuth angle.
    #[must_use]
    pub fn clamp_azimuth(&self, azimuth: f64) -> f64 {
        azimuth.max(self.min_azimuth_angle).min(self.max_azimuth_angle)
    }
}
