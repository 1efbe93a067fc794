//! Camera actions bound to mouse buttons, the wheel, and touch gestures.

use bitflags::bitflags;

bitflags! {
    /// Orthogonal camera actions. Mouse bindings OR together the actions of
    /// every held button; touch bindings pick one composite action by
    /// finger count.
    ///
    /// Serializes as a `|`-separated flag list in TOML/JSON, e.g.
    /// `left = "ROTATE"` or `two = "TOUCH_DOLLY_TRUCK"`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[derive(serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct Action: u32 {
        /// Orbit around the target.
        const ROTATE = 1 << 0;
        /// Move the target across the ground plane or screen.
        const TRUCK = 1 << 1;
        /// Move the target parallel to the screen.
        const SCREEN_PAN = 1 << 2;
        /// Move the focal offset instead of the target.
        const OFFSET = 1 << 3;
        /// Change orbit distance.
        const DOLLY = 1 << 4;
        /// Change camera zoom.
        const ZOOM = 1 << 5;
        /// One-finger rotate.
        const TOUCH_ROTATE = 1 << 6;
        /// Finger-drag truck.
        const TOUCH_TRUCK = 1 << 7;
        /// Finger-drag screen pan.
        const TOUCH_SCREEN_PAN = 1 << 8;
        /// Finger-drag focal offset.
        const TOUCH_OFFSET = 1 << 9;
        /// Pinch dolly.
        const TOUCH_DOLLY = 1 << 10;
        /// Pinch zoom.
        const TOUCH_ZOOM = 1 << 11;
        /// Pinch dolly plus centroid truck.
        const TOUCH_DOLLY_TRUCK = 1 << 12;
        /// Pinch dolly plus centroid screen pan.
        const TOUCH_DOLLY_SCREEN_PAN = 1 << 13;
        /// Pinch dolly plus centroid focal offset.
        const TOUCH_DOLLY_OFFSET = 1 << 14;
        /// Pinch dolly plus centroid rotate.
        const TOUCH_DOLLY_ROTATE = 1 << 15;
        /// Pinch zoom plus centroid truck.
        const TOUCH_ZOOM_TRUCK = 1 << 16;
        /// Pinch zoom plus centroid focal offset.
        const TOUCH_ZOOM_OFFSET = 1 << 17;
        /// Pinch zoom plus centroid screen pan.
        const TOUCH_ZOOM_SCREEN_PAN = 1 << 18;
        /// Pinch zoom plus centroid rotate.
        const TOUCH_ZOOM_ROTATE = 1 << 19;
    }
}

impl Action {
    /// No action.
    pub const NONE: Self = Self::empty();

    const ROTATING: Self = Self::ROTATE
        .union(Self::TOUCH_ROTATE)
        .union(Self::TOUCH_DOLLY_ROTATE)
        .union(Self::TOUCH_ZOOM_ROTATE);
    const TRUCKING: Self = Self::TRUCK
        .union(Self::TOUCH_TRUCK)
        .union(Self::TOUCH_DOLLY_TRUCK)
        .union(Self::TOUCH_ZOOM_TRUCK);
    const SCREEN_PANNING: Self = Self::SCREEN_PAN
        .union(Self::TOUCH_SCREEN_PAN)
        .union(Self::TOUCH_DOLLY_SCREEN_PAN)
        .union(Self::TOUCH_ZOOM_SCREEN_PAN);
    const OFFSETTING: Self = Self::OFFSET
        .union(Self::TOUCH_OFFSET)
        .union(Self::TOUCH_DOLLY_OFFSET)
        .union(Self::TOUCH_ZOOM_OFFSET);
    const PINCH_DOLLY: Self = Self::TOUCH_DOLLY
        .union(Self::TOUCH_DOLLY_TRUCK)
        .union(Self::TOUCH_DOLLY_SCREEN_PAN)
        .union(Self::TOUCH_DOLLY_OFFSET)
        .union(Self::TOUCH_DOLLY_ROTATE);
    const PINCH_ZOOM: Self = Self::TOUCH_ZOOM
        .union(Self::TOUCH_ZOOM_TRUCK)
        .union(Self::TOUCH_ZOOM_SCREEN_PAN)
        .union(Self::TOUCH_ZOOM_OFFSET)
        .union(Self::TOUCH_ZOOM_ROTATE);

    /// Resolve the flag set into the operations a drag should perform.
    #[must_use]
    pub fn capabilities(self) -> ActionCapabilities {
        ActionCapabilities {
            rotate: self.intersects(Self::ROTATING),
            drag_dolly: self.contains(Self::DOLLY),
            drag_zoom: self.contains(Self::ZOOM) && !self.contains(Self::DOLLY),
            pinch_dolly: self.intersects(Self::PINCH_DOLLY),
            pinch_zoom: self.intersects(Self::PINCH_ZOOM)
                && !self.intersects(Self::PINCH_DOLLY),
            truck: self.intersects(Self::TRUCKING),
            screen_pan: self.intersects(Self::SCREEN_PANNING),
            offset: self.intersects(Self::OFFSETTING),
        }
    }

    /// Whether a touch gesture with this action needs a second finger.
    #[must_use]
    pub fn is_pinch(self) -> bool {
        self.intersects(Self::PINCH_DOLLY.union(Self::PINCH_ZOOM))
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::NONE
    }
}

/// Boolean view of an [`Action`], computed once per input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionCapabilities {
    /// Orbit by the drag delta.
    pub rotate: bool,
    /// Dolly by vertical drag.
    pub drag_dolly: bool,
    /// Zoom by vertical drag.
    pub drag_zoom: bool,
    /// Dolly by pinch distance change.
    pub pinch_dolly: bool,
    /// Zoom by pinch distance change.
    pub pinch_zoom: bool,
    /// Truck the target.
    pub truck: bool,
    /// Pan the target parallel to the screen.
    pub screen_pan: bool,
    /// Move the focal offset.
    pub offset: bool,
}

impl ActionCapabilities {
    /// Whether the action moves the orbit angles.
    #[must_use]
    pub fn moves_rotation(&self) -> bool {
        self.rotate
    }

    /// Whether the action moves the target point.
    #[must_use]
    pub fn moves_target(&self) -> bool {
        self.truck || self.screen_pan
    }
}
