use serde::{Deserialize, Serialize};

use crate::camera::Projection;
use crate::input::Action;

/// Actions bound to mouse buttons and the wheel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MouseBindings {
    /// Left button drag.
    pub left: Action,
    /// Middle button drag.
    pub middle: Action,
    /// Right button drag.
    pub right: Action,
    /// Wheel scroll.
    pub wheel: Action,
}

impl Default for MouseBindings {
    fn default() -> Self {
        Self {
            left: Action::ROTATE,
            middle: Action::DOLLY,
            right: Action::TRUCK,
            wheel: Action::DOLLY,
        }
    }
}

/// Actions bound to one-, two- and three-finger touch gestures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TouchBindings {
    /// One finger.
    pub one: Action,
    /// Two fingers.
    pub two: Action,
    /// Three or more fingers.
    pub three: Action,
}

impl Default for TouchBindings {
    fn default() -> Self {
        Self {
            one: Action::TOUCH_ROTATE,
            two: Action::TOUCH_DOLLY_TRUCK,
            three: Action::TOUCH_TRUCK,
        }
    }
}

/// Mouse and touch binding tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct BindingOptions {
    /// Mouse buttons and wheel.
    pub mouse: MouseBindings,
    /// Touch finger counts.
    pub touch: TouchBindings,
}

impl BindingOptions {
    /// Adapt the bindings to a camera kind. Orthographic cameras cannot
    /// dolly, so every dolly binding becomes the matching zoom binding.
    #[must_use]
    pub fn for_projection(mut self, projection: &Projection) -> Self {
        match projection {
            Projection::Perspective { .. } => self,
            Projection::Orthographic { .. } => {
                for action in [
                    &mut self.mouse.left,
                    &mut self.mouse.middle,
                    &mut self.mouse.right,
                    &mut self.mouse.wheel,
                    &mut self.touch.one,
                    &mut self.touch.two,
                    &mut self.touch.three,
                ] {
                    *action = dolly_to_zoom(*action);
                }
                self
            }
        }
    }
}

fn dolly_to_zoom(action: Action) -> Action {
    const SWAPS: [(Action, Action); 6] = [
        (Action::DOLLY, Action::ZOOM),
        (Action::TOUCH_DOLLY, Action::TOUCH_ZOOM),
        (Action::TOUCH_DOLLY_TRUCK, Action::TOUCH_ZOOM_TRUCK),
        (Action::TOUCH_DOLLY_SCREEN_PAN, Action::TOUCH_ZOOM_SCREEN_PAN),
        (Action::TOUCH_DOLLY_OFFSET, Action::TOUCH_ZOOM_OFFSET),
        (Action::TOUCH_DOLLY_ROTATE, Action::TOUCH_ZOOM_ROTATE),
    ];
    SWAPS.iter().fold(action, |acc, &(dolly, zoom)| {
        if acc.contains(dolly) {
            acc.difference(dolly).union(zoom)
        } else {
            acc
        }
    })
}
