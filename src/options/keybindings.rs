use rustc_hash::FxHashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::input::KeyAction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "KeybindingTable")]
/// Configurable keyboard bindings mapping actions to key codes.
///
/// A TOML table only needs the keys it changes; unlisted actions keep
/// their default key.
pub struct KeybindingOptions {
    /// Maps action → key string (e.g. `Forward` → `"KeyW"`).
    pub bindings: FxHashMap<KeyAction, String>,
    /// Reverse lookup cache (key string → action). Rebuilt on load.
    #[serde(skip)]
    key_to_action: FxHashMap<String, KeyAction>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct KeybindingTable {
    bindings: FxHashMap<KeyAction, String>,
}

impl From<KeybindingTable> for KeybindingOptions {
    fn from(table: KeybindingTable) -> Self {
        let mut opts = Self::default();
        opts.bindings.extend(table.bindings);
        opts.rebuild_reverse_map();
        opts
    }
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let bindings = [
            (KeyAction::Forward, "KeyW"),
            (KeyAction::Backward, "KeyS"),
            (KeyAction::TruckLeft, "KeyA"),
            (KeyAction::TruckRight, "KeyD"),
            (KeyAction::Up, "KeyE"),
            (KeyAction::Down, "KeyQ"),
            (KeyAction::RotateLeft, "ArrowLeft"),
            (KeyAction::RotateRight, "ArrowRight"),
            (KeyAction::RotateUp, "ArrowUp"),
            (KeyAction::RotateDown, "ArrowDown"),
        ]
        .into_iter()
        .map(|(action, key)| (action, key.to_owned()))
        .collect();

        let mut opts = Self {
            bindings,
            key_to_action: FxHashMap::default(),
        };
        opts.rebuild_reverse_map();
        opts
    }
}

impl KeybindingOptions {
    /// Rebuild the reverse lookup map (key string → action).
    pub fn rebuild_reverse_map(&mut self) {
        self.key_to_action.clear();
        for (action, key) in &self.bindings {
            let _ = self.key_to_action.insert(key.clone(), *action);
        }
    }

    /// Rebind an action and refresh the reverse map.
    pub fn bind(&mut self, action: KeyAction, key: &str) {
        let _ = self.bindings.insert(action, key.to_owned());
        self.rebuild_reverse_map();
    }

    /// Look up the action for a key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.key_to_action.get(key).copied()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Keyboard", inline)]
#[serde(default)]
/// Held-key fly speeds.
pub struct KeyboardOptions {
    /// World units per second for forward/truck/elevate keys.
    #[schemars(title = "Move Speed", range(min = 0.1, max = 50.0), extend("step" = 0.1))]
    pub move_speed: f64,
    /// Radians per second for rotate keys.
    #[schemars(title = "Rotate Speed", range(min = 0.1, max = 6.0), extend("step" = 0.05))]
    pub rotate_speed: f64,
}

impl Default for KeyboardOptions {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            rotate_speed: 1.0,
        }
    }
}
