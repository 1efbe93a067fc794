// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Damped orbit and fly camera controller for 3D model viewers.
//!
//! Orbitcam turns pointer drags, wheel ticks, touch gestures and held keys
//! into a smoothly animated camera pose. Every degree of freedom (azimuth,
//! polar angle, distance, target, focal offset, zoom) is integrated with a
//! critically damped spring once per frame, subject to angle/distance/zoom
//! clamps, an optional target boundary and collision against scene
//! geometry.
//!
//! # Key entry points
//!
//! - [`controls::CameraControls`] - the controller; call
//!   [`update`](controls::CameraControls::update) once per frame
//! - [`camera::Camera`] - the pose and projection it drives
//! - [`options::ControlsOptions`] - limits, smoothing, speeds and bindings,
//!   loadable from TOML presets
//! - [`rest::MotionHandle`] - future that completes when a motion settles
//! - [`dispatch::ControlsEvent`] - lifecycle events (`wake`, `update`,
//!   `rest`, `sleep`, `control*`, `transitionstart`)
//!
//! # Architecture
//!
//! Input events are converted to gestures by
//! [`input::InputProcessor`], which the controller applies as changes to
//! *end* values. Each [`update`](controls::CameraControls::update) moves the
//! *current* values toward the end values, applies dolly-to-cursor and
//! collision corrections, writes the camera pose and fires lifecycle events.
//! Hosts own the frame loop; the optional `web` feature binds the
//! controller to a DOM element.

pub mod camera;
pub mod controls;
pub mod dispatch;
pub mod error;
pub mod input;
pub mod options;
pub mod rest;
pub mod util;
#[cfg(feature = "web")]
pub mod web;
