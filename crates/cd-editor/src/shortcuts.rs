//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so the browser bridge and native hosts agree on bindings.

/// Pixels moved by an arrow key; Shift multiplies.
pub const NUDGE_STEP: f32 = 1.0;
pub const NUDGE_STEP_LARGE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Unit vector in canvas space (y grows downward).
    pub fn delta(self) -> (f32, f32) {
        match self {
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
        }
    }
}

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Delete,
    Duplicate,
    Nudge { direction: Direction, large: bool },

    // ── View ──
    ZoomIn,
    ZoomOut,
    ZoomToFit,

    // ── Z-order ──
    SendBackward,
    BringForward,
    SendToBack,
    BringToFront,

    // ── Selection ──
    Deselect,
}

impl ShortcutAction {
    /// Whether the action needs a selected element to do anything.
    pub fn needs_selection(self) -> bool {
        !matches!(
            self,
            ShortcutAction::ZoomIn
                | ShortcutAction::ZoomOut
                | ShortcutAction::ZoomToFit
                | ShortcutAction::Deselect
        )
    }
}

/// Resolves key events into shortcut actions.
///
/// On macOS `meta` is ⌘; elsewhere `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"d"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        // ── Modifier combos first (most specific) ──
        if cmd && shift {
            return match key {
                "[" | "{" => Some(ShortcutAction::SendToBack),
                "]" | "}" => Some(ShortcutAction::BringToFront),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ZoomToFit),
                "[" => Some(ShortcutAction::SendBackward),
                "]" => Some(ShortcutAction::BringForward),
                _ => None,
            };
        }

        if let Some(direction) = arrow(key) {
            return Some(ShortcutAction::Nudge {
                direction,
                large: shift,
            });
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}

fn arrow(key: &str) -> Option<Direction> {
    match key {
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        _ => None,
    }
}
