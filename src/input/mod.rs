//! Input handling: event types, pointer tracking, and the input processor
//! that converts raw pointer/wheel events into camera gestures.

/// Camera action flags and their capability view.
pub mod action;
/// Platform-agnostic input events.
pub mod event;
/// Held-key camera actions.
pub mod keyboard;
/// Active pointer records and stale-pointer eviction.
pub mod pointer;
/// Converts raw events into gestures.
pub mod processor;

pub use action::{Action, ActionCapabilities};
pub use event::{
    InputEvent, MouseButton, MouseButtons, PointerInput, PointerType, Rect,
    WheelDeltaMode, WheelInput,
};
pub use keyboard::KeyAction;
pub use processor::{DragInput, Gesture, InputProcessor, WheelGesture};
