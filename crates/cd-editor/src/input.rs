//! Input abstraction layer.
//!
//! Normalizes mouse, touch, and pen events into a unified `InputEvent`
//! consumed by the interaction controller. Pointer coordinates are viewport
//! (screen) pixels; conversion to canvas space happens in the controller.

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized input event from any pointing device or the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start, pen contact).
    PointerDown { x: f32, y: f32, pointer_id: i32 },

    /// Pointer moved.
    PointerMove { x: f32, y: f32, pointer_id: i32 },

    /// Pointer released.
    PointerUp { x: f32, y: f32, pointer_id: i32 },

    /// The platform took the pointer away (touch cancel, lost capture).
    PointerCancel { pointer_id: i32 },

    /// Key press (`KeyboardEvent.key` value).
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn pointer_down(x: f32, y: f32, pointer_id: i32) -> Self {
        Self::PointerDown { x, y, pointer_id }
    }

    pub fn pointer_move(x: f32, y: f32, pointer_id: i32) -> Self {
        Self::PointerMove { x, y, pointer_id }
    }

    pub fn pointer_up(x: f32, y: f32, pointer_id: i32) -> Self {
        Self::PointerUp { x, y, pointer_id }
    }

    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Extract position if this is a positioned pointer event.
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. } => Some((*x, *y)),
            _ => None,
        }
    }

    pub fn pointer_id(&self) -> Option<i32> {
        match self {
            Self::PointerDown { pointer_id, .. }
            | Self::PointerMove { pointer_id, .. }
            | Self::PointerUp { pointer_id, .. }
            | Self::PointerCancel { pointer_id } => Some(*pointer_id),
            Self::Key { .. } => None,
        }
    }
}
