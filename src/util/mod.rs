//! Shared math utilities for the camera controller.
//!
//! Helpers for critically damped smoothing, spherical coordinates, bounding
//! volumes, ray intersection, and frame timing.

pub mod bounds;
pub mod damping;
pub mod frame_timing;
pub mod ray;
pub mod spherical;
