use bitflags::bitflags;
use glam::DVec2;

/// Platform-agnostic input events.
///
/// These are fed into an [`InputProcessor`](super::InputProcessor) which
/// converts them into [`Gesture`](super::Gesture) values. Hosts normally
/// go through
/// [`CameraControls::handle_input`](crate::controls::CameraControls::handle_input).
///
/// # Example
///
/// ```ignore
/// let redraw = controls.handle_input(InputEvent::Wheel(WheelInput {
///     position: DVec2::new(400.0, 300.0),
///     delta: DVec2::new(0.0, -120.0),
///     delta_mode: WheelDeltaMode::Pixel,
///     ctrl_key: false,
/// }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A pointer became active (button press or finger down).
    PointerDown(PointerInput),
    /// An active pointer moved.
    PointerMove(PointerInput),
    /// A pointer was released.
    PointerUp(PointerInput),
    /// The platform cancelled a pointer (lost capture, palm rejection).
    PointerCancel(PointerInput),
    /// Wheel or trackpad scroll.
    Wheel(WheelInput),
    /// Pointer lock was acquired or lost outside the controller's control.
    PointerLockChanged {
        /// `true` when the element now owns pointer lock.
        locked: bool,
    },
}

/// Kind of device behind a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerType {
    /// Mouse (or anything button-driven).
    #[default]
    Mouse,
    /// Finger on a touch surface.
    Touch,
    /// Stylus; treated like a mouse.
    Pen,
}

bitflags! {
    /// Held mouse buttons, using the DOM `buttons` bit layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MouseButtons: u32 {
        /// Primary button.
        const LEFT = 1;
        /// Secondary button.
        const RIGHT = 2;
        /// Wheel click.
        const MIDDLE = 4;
    }
}

impl Default for MouseButtons {
    fn default() -> Self {
        Self::empty()
    }
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Middle mouse button (wheel click).
    Middle,
    /// Secondary (right) mouse button.
    Right,
}

impl MouseButton {
    /// The button a new mouse pointer claims, by priority left, middle, right.
    #[must_use]
    pub fn primary_of(buttons: MouseButtons) -> Option<Self> {
        if buttons.contains(MouseButtons::LEFT) {
            Some(Self::Left)
        } else if buttons.contains(MouseButtons::MIDDLE) {
            Some(Self::Middle)
        } else if buttons.contains(MouseButtons::RIGHT) {
            Some(Self::Right)
        } else {
            None
        }
    }
}

/// One pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerInput {
    /// Platform pointer id. `-1` is reserved for the locked pointer.
    pub pointer_id: i32,
    /// Device kind.
    pub pointer_type: PointerType,
    /// Position in client pixels (origin top-left).
    pub position: DVec2,
    /// Relative motion since the last sample, valid under pointer lock.
    pub movement: DVec2,
    /// Buttons held during this sample.
    pub buttons: MouseButtons,
}

/// Unit of a wheel delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WheelDeltaMode {
    /// Pixels (trackpads, most mice on macOS).
    #[default]
    Pixel,
    /// Lines (classic notched wheels).
    Line,
    /// Pages.
    Page,
}

/// One wheel sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelInput {
    /// Cursor position in client pixels.
    pub position: DVec2,
    /// Scroll delta; positive `y` scrolls down / toward the user.
    pub delta: DVec2,
    /// Unit of `delta`.
    pub delta_mode: WheelDeltaMode,
    /// Ctrl held; trackpad pinch arrives as ctrl+wheel.
    pub ctrl_key: bool,
}

/// Axis-aligned rectangle in pixels or normalised units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The unit square, used as the default interactive area.
    pub const UNIT: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// `true` when `point` is inside or on the edge.
    #[must_use]
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Map a client position into normalized device coordinates
    /// (`[-1, 1]`, y up).
    #[must_use]
    pub fn to_ndc(&self, point: DVec2) -> DVec2 {
        DVec2::new(
            (point.x - self.x) / self.width * 2.0 - 1.0,
            -(point.y - self.y) / self.height * 2.0 + 1.0,
        )
    }
}
