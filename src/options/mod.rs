//! Controller options with TOML preset support.
//!
//! All tweakable settings (limits, smoothing, speeds, behavior switches,
//! input bindings, keyboard fly controls) are consolidated here. Options
//! serialize to/from TOML presets; unbounded limits are written as `inf`.

mod bindings;
mod keybindings;
mod limits;
mod motion;

use std::path::Path;

pub use bindings::{BindingOptions, MouseBindings, TouchBindings};
pub use keybindings::{KeybindingOptions, KeyboardOptions};
pub use limits::LimitOptions;
pub use motion::{BehaviorOptions, SmoothingOptions, SpeedOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::camera::Projection;
use crate::error::OrbitError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[limits]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[serde(default)]
pub struct ControlsOptions {
    /// Distance, zoom and angle clamps.
    pub limits: LimitOptions,
    /// Integrator timing and rest threshold.
    pub smoothing: SmoothingOptions,
    /// Input sensitivity.
    pub speeds: SpeedOptions,
    /// Dolly-to-cursor, infinity dolly and boundary switches.
    pub behavior: BehaviorOptions,
    /// Mouse and touch bindings.
    #[schemars(skip)]
    pub bindings: BindingOptions,
    /// Held-key fly speeds.
    pub keyboard: KeyboardOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl ControlsOptions {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ControlsOptions)
    }

    /// Defaults adapted to a camera kind (zoom bindings for orthographic).
    #[must_use]
    pub fn for_projection(projection: &Projection) -> Self {
        let mut opts = Self::default();
        opts.bindings = opts.bindings.for_projection(projection);
        opts
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, OrbitError> {
        let content = std::fs::read_to_string(path).map_err(OrbitError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, OrbitError> {
        toml::from_str(content).map_err(|e| OrbitError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), OrbitError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| OrbitError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(OrbitError::Io)?;
        }
        std::fs::write(path, content).map_err(OrbitError::Io)
    }
}
