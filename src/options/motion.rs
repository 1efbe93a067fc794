use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Smoothing", inline)]
#[serde(default)]
/// Damping parameters for the per-frame integrator.
pub struct SmoothingOptions {
    /// Approximate seconds to reach a programmatic target.
    #[schemars(title = "Smooth Time", range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    pub smooth_time: f64,
    /// Approximate seconds to reach a target while the user is dragging.
    #[schemars(title = "Dragging Smooth Time", range(min = 0.0, max = 1.0), extend("step" = 0.005))]
    pub dragging_smooth_time: f64,
    /// Speed cap for every damped quantity.
    #[schemars(title = "Max Speed")]
    pub max_speed: f64,
    /// Distance below which current and end values count as settled.
    #[schemars(title = "Rest Threshold", range(min = 0.0, max = 0.1), extend("step" = 0.001))]
    pub rest_threshold: f64,
}

impl Default for SmoothingOptions {
    fn default() -> Self {
        Self {
            smooth_time: 0.25,
            dragging_smooth_time: 0.125,
            max_speed: f64::INFINITY,
            rest_threshold: 0.01,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Speeds", inline)]
#[serde(default)]
/// Input sensitivity multipliers.
pub struct SpeedOptions {
    /// Horizontal drag rotation multiplier.
    #[schemars(title = "Azimuth Rotate Speed", range(min = -2.0, max = 2.0), extend("step" = 0.05))]
    pub azimuth_rotate_speed: f64,
    /// Vertical drag rotation multiplier.
    #[schemars(title = "Polar Rotate Speed", range(min = -2.0, max = 2.0), extend("step" = 0.05))]
    pub polar_rotate_speed: f64,
    /// Wheel/drag/pinch dolly multiplier.
    #[schemars(title = "Dolly Speed", range(min = -2.0, max = 2.0), extend("step" = 0.05))]
    pub dolly_speed: f64,
    /// Truck/pan multiplier.
    #[schemars(title = "Truck Speed", range(min = -4.0, max = 4.0), extend("step" = 0.1))]
    pub truck_speed: f64,
    /// Invert the direction of drag dolly.
    #[schemars(title = "Invert Dolly Drag")]
    pub dolly_drag_inverted: bool,
}

impl Default for SpeedOptions {
    fn default() -> Self {
        Self {
            azimuth_rotate_speed: 1.0,
            polar_rotate_speed: 1.0,
            dolly_speed: 1.0,
            truck_speed: 2.0,
            dolly_drag_inverted: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[schemars(title = "Behavior", inline)]
#[serde(default)]
/// Interaction mode switches.
pub struct BehaviorOptions {
    /// Anchor dolly/zoom at the cursor instead of the orbit center.
    #[schemars(title = "Dolly To Cursor")]
    pub dolly_to_cursor: bool,
    /// Move the target once a distance limit is hit instead of stopping.
    #[schemars(title = "Infinity Dolly")]
    pub infinity_dolly: bool,
    /// Vertical truck drags move along the ground plane.
    #[schemars(title = "Vertical Drag To Forward")]
    pub vertical_drag_to_forward: bool,
    /// Resistance of the target boundary walls (0 = hard stop).
    #[schemars(title = "Boundary Friction", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub boundary_friction: f64,
    /// Also keep the camera position inside the boundary.
    #[schemars(title = "Boundary Encloses Camera")]
    pub boundary_encloses_camera: bool,
}
