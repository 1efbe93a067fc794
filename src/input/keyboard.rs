use serde::{Deserialize, Serialize};

/// Held-key camera actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// forward = "KeyW"
/// rotate_left = "ArrowLeft"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Move the target forward along the ground plane.
    Forward,
    /// Move the target backward.
    Backward,
    /// Truck left.
    TruckLeft,
    /// Truck right.
    TruckRight,
    /// Raise the target along the camera up vector.
    Up,
    /// Lower the target.
    Down,
    /// Orbit left (increase azimuth).
    RotateLeft,
    /// Orbit right.
    RotateRight,
    /// Orbit toward the top pole.
    RotateUp,
    /// Orbit toward the bottom pole.
    RotateDown,
}

impl KeyAction {
    /// Every action, in binding-table order.
    pub const ALL: [Self; 10] = [
        Self::Forward,
        Self::Backward,
        Self::TruckLeft,
        Self::TruckRight,
        Self::Up,
        Self::Down,
        Self::RotateLeft,
        Self::RotateRight,
        Self::RotateUp,
        Self::RotateDown,
    ];
}
