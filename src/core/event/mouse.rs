//=========================================================================
// Mouse & Scroll Payloads
//
// Mouse payloads carry a window-local integer position, the button that
// triggered the event (`MouseButton::None` for pure movement) and a
// snapshot of every button held at that moment.
//
//=========================================================================

//=== External Crates =====================================================

use bitflags::bitflags;

//=== MouseButton =========================================================

/// Button that triggered a mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    /// No button involved (cursor movement).
    #[default]
    None,
    Left,
    Middle,
    Right,
    Extra0,
    Extra1,
    Extra2,
    Extra3,
    Extra4,
}

impl MouseButton {
    /// The held-buttons bit for this button (empty for `None`).
    pub fn flag(self) -> ButtonFlags {
        match self {
            Self::None => ButtonFlags::empty(),
            Self::Left => ButtonFlags::LEFT,
            Self::Middle => ButtonFlags::MIDDLE,
            Self::Right => ButtonFlags::RIGHT,
            Self::Extra0 => ButtonFlags::EXTRA0,
            Self::Extra1 => ButtonFlags::EXTRA1,
            Self::Extra2 => ButtonFlags::EXTRA2,
            Self::Extra3 => ButtonFlags::EXTRA3,
            Self::Extra4 => ButtonFlags::EXTRA4,
        }
    }
}

//=== ButtonFlags =========================================================

bitflags! {
    /// Set of mouse buttons currently held.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ButtonFlags: u8 {
        const LEFT   = 1 << 0;
        const RIGHT  = 1 << 1;
        const MIDDLE = 1 << 2;
        const EXTRA0 = 1 << 3;
        const EXTRA1 = 1 << 4;
        const EXTRA2 = 1 << 5;
        const EXTRA3 = 1 << 6;
        const EXTRA4 = 1 << 7;
    }
}

//=== MouseEvent ==========================================================

/// Mouse button / movement payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    /// Window-local x in pixels, top-left origin.
    pub x: i32,
    /// Window-local y in pixels, top-left origin.
    pub y: i32,
    pub target_button: MouseButton,
    pub button_state: ButtonFlags,
}

impl MouseEvent {
    pub fn new(x: i32, y: i32, target_button: MouseButton, button_state: ButtonFlags) -> Self {
        Self {
            x,
            y,
            target_button,
            button_state,
        }
    }
}

//=== ScrollEvent =========================================================

/// Scroll wheel / trackpad payload, in toolkit scroll units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub x: f64,
    pub y: f64,
}

impl ScrollEvent {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_button_has_no_flag() {
        assert!(MouseButton::None.flag().is_empty());
    }

    #[test]
    fn every_real_button_owns_a_distinct_bit() {
        let buttons = [
            MouseButton::Left,
            MouseButton::Middle,
            MouseButton::Right,
            MouseButton::Extra0,
            MouseButton::Extra1,
            MouseButton::Extra2,
            MouseButton::Extra3,
            MouseButton::Extra4,
        ];

        let combined = buttons
            .iter()
            .fold(ButtonFlags::empty(), |acc, b| acc | b.flag());
        assert_eq!(combined, ButtonFlags::all());
    }

    #[test]
    fn mouse_event_keeps_fields() {
        let held = ButtonFlags::LEFT | ButtonFlags::RIGHT;
        let event = MouseEvent::new(-4, 12, MouseButton::Right, held);
        assert_eq!((event.x, event.y), (-4, 12));
        assert_eq!(event.target_button, MouseButton::Right);
        assert_eq!(event.button_state, held);
    }
}
