//! Camera object and the constraints applied to it.
//!
//! Provides the camera pose/projection the controller drives, target
//! boundary enclosure, and ray-cast collision against scene geometry.

/// Target containment inside an axis-aligned box.
pub mod boundary;
/// Collider trait and near-plane ray casting.
pub mod collision;
/// Camera pose and projection kinds.
pub mod core;

pub use self::boundary::Boundary;
pub use self::collision::{Collider, TriangleMesh};
pub use self::core::{Camera, Projection};
