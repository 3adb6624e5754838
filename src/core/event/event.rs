//=========================================================================
// Event
//
// Engine-neutral event: a type discriminant, reserved flags, the
// receiving window (set at dispatch) and exactly one payload.
//
// Construction:
// - Family constructors (`Event::key`, `Event::mouse_button`, ...) are
//   infallible; their action argument can only name a type of the
//   matching family.
// - `Event::new` is the generic checked constructor. It rejects a payload
//   whose family does not match the requested type.
//
//=========================================================================

//=== External Crates =====================================================

use bitflags::bitflags;

//=== Internal Imports ====================================================

use super::keyboard::{Key, KeyInput, KeyModifiers, KeyboardEvent};
use super::mouse::{MouseEvent, ScrollEvent};
use super::window::WindowEvent;
use crate::core::error::EventError;
use crate::core::window::WindowId;

//=== EventType ===========================================================

/// Discriminant of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    KeyDown,
    KeyUp,
    KeyHeld,
    TextInput,
    MouseDown,
    MouseUp,
    MouseMove,
    Scroll,
    WindowResize,
    WindowMinimize,
    WindowFocusChanged,
    WindowClose,
}

impl EventType {
    /// Payload family this event type carries.
    pub fn payload_kind(self) -> PayloadKind {
        match self {
            Self::KeyDown | Self::KeyUp | Self::KeyHeld | Self::TextInput => PayloadKind::Keyboard,
            Self::MouseDown | Self::MouseUp | Self::MouseMove => PayloadKind::Mouse,
            Self::Scroll => PayloadKind::Scroll,
            Self::WindowResize
            | Self::WindowMinimize
            | Self::WindowFocusChanged
            | Self::WindowClose => PayloadKind::Window,
        }
    }
}

//=== EventFlags ==========================================================

bitflags! {
    /// Reserved per-event flags. No bit is assigned yet.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventFlags: u8 {
        const _ = !0;
    }
}

//=== Payload =============================================================

/// Payload family tag, used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Keyboard,
    Mouse,
    Scroll,
    Window,
}

/// The single active payload of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    Keyboard(KeyboardEvent),
    Mouse(MouseEvent),
    Scroll(ScrollEvent),
    Window(WindowEvent),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Keyboard(_) => PayloadKind::Keyboard,
            Self::Mouse(_) => PayloadKind::Mouse,
            Self::Scroll(_) => PayloadKind::Scroll,
            Self::Window(_) => PayloadKind::Window,
        }
    }
}

//=== Actions =============================================================

/// Key transition reported by the toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Down,
    Held,
    Up,
}

impl KeyAction {
    pub fn event_type(self) -> EventType {
        match self {
            Self::Down => EventType::KeyDown,
            Self::Held => EventType::KeyHeld,
            Self::Up => EventType::KeyUp,
        }
    }
}

/// Mouse button transition reported by the toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    Down,
    Up,
}

impl ButtonAction {
    pub fn event_type(self) -> EventType {
        match self {
            Self::Down => EventType::MouseDown,
            Self::Up => EventType::MouseUp,
        }
    }
}

/// Window lifecycle change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowChange {
    Resize,
    Minimize,
    FocusChanged,
    Close,
}

impl WindowChange {
    pub fn event_type(self) -> EventType {
        match self {
            Self::Resize => EventType::WindowResize,
            Self::Minimize => EventType::WindowMinimize,
            Self::FocusChanged => EventType::WindowFocusChanged,
            Self::Close => EventType::WindowClose,
        }
    }
}

//=== Event ===============================================================

/// A normalized input or window event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    ty: EventType,
    flags: EventFlags,
    receiver: Option<WindowId>,
    payload: Payload,
}

impl Event {
    //--- Construction -----------------------------------------------------

    /// Builds an event from an arbitrary type / payload pair.
    ///
    /// # Errors
    ///
    /// - [`EventError::PayloadMismatch`] if the payload family is not the
    ///   one `ty` requires.
    /// - [`EventError::KeyboardInputMismatch`] if a key event is given a
    ///   codepoint or text input is given a key code.
    pub fn new(ty: EventType, flags: EventFlags, payload: Payload) -> Result<Self, EventError> {
        let expected = ty.payload_kind();
        if payload.kind() != expected {
            return Err(EventError::PayloadMismatch {
                ty,
                payload: payload.kind(),
            });
        }

        if let Payload::Keyboard(keyboard) = &payload {
            let is_text = ty == EventType::TextInput;
            let has_codepoint = matches!(keyboard.input(), KeyInput::Codepoint(_));
            if is_text != has_codepoint {
                return Err(EventError::KeyboardInputMismatch { ty });
            }
        }

        Ok(Self::unchecked(ty, flags, payload))
    }

    fn unchecked(ty: EventType, flags: EventFlags, payload: Payload) -> Self {
        Self {
            ty,
            flags,
            receiver: None,
            payload,
        }
    }

    /// Key down / up / held event.
    pub fn key(action: KeyAction, key: Key, modifiers: KeyModifiers) -> Self {
        Self::unchecked(
            action.event_type(),
            EventFlags::empty(),
            Payload::Keyboard(KeyboardEvent::with_key(key, modifiers)),
        )
    }

    /// Text input event for one Unicode scalar value.
    pub fn text_input(codepoint: char) -> Self {
        Self::unchecked(
            EventType::TextInput,
            EventFlags::empty(),
            Payload::Keyboard(KeyboardEvent::with_codepoint(codepoint)),
        )
    }

    pub fn mouse_button(action: ButtonAction, mouse: MouseEvent) -> Self {
        Self::unchecked(action.event_type(), EventFlags::empty(), Payload::Mouse(mouse))
    }

    pub fn mouse_move(mouse: MouseEvent) -> Self {
        Self::unchecked(EventType::MouseMove, EventFlags::empty(), Payload::Mouse(mouse))
    }

    pub fn scroll(scroll: ScrollEvent) -> Self {
        Self::unchecked(EventType::Scroll, EventFlags::empty(), Payload::Scroll(scroll))
    }

    pub fn window(change: WindowChange, window: WindowEvent) -> Self {
        Self::unchecked(change.event_type(), EventFlags::empty(), Payload::Window(window))
    }

    /// Replaces the reserved flags.
    pub fn with_flags(mut self, flags: EventFlags) -> Self {
        self.flags = flags;
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn ty(&self) -> EventType {
        self.ty
    }

    pub fn flags(&self) -> EventFlags {
        self.flags
    }

    /// Window the event was dispatched to; `None` until dispatch.
    pub fn receiver(&self) -> Option<WindowId> {
        self.receiver
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn as_keyboard(&self) -> Option<&KeyboardEvent> {
        match &self.payload {
            Payload::Keyboard(keyboard) => Some(keyboard),
            _ => None,
        }
    }

    pub fn as_mouse(&self) -> Option<&MouseEvent> {
        match &self.payload {
            Payload::Mouse(mouse) => Some(mouse),
            _ => None,
        }
    }

    pub fn as_scroll(&self) -> Option<&ScrollEvent> {
        match &self.payload {
            Payload::Scroll(scroll) => Some(scroll),
            _ => None,
        }
    }

    pub fn as_window(&self) -> Option<&WindowEvent> {
        match &self.payload {
            Payload::Window(window) => Some(window),
            _ => None,
        }
    }

    //--- Dispatch ---------------------------------------------------------

    pub(crate) fn set_receiver(&mut self, receiver: WindowId) {
        self.receiver = Some(receiver);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{ButtonFlags, MouseButton, WindowStateFlags};

    //--- Test Helpers -----------------------------------------------------

    fn cursor(x: i32, y: i32) -> MouseEvent {
        MouseEvent::new(x, y, MouseButton::None, ButtonFlags::empty())
    }

    //--- Family Constructors ----------------------------------------------

    #[test]
    fn key_event_reads_back_inputs() {
        let mods = KeyModifiers::SHIFT | KeyModifiers::SUPER;
        let event = Event::key(KeyAction::Held, Key::F5, mods);

        assert_eq!(event.ty(), EventType::KeyHeld);
        let keyboard = event.as_keyboard().expect("keyboard payload");
        assert_eq!(keyboard.key(), Some(Key::F5));
        assert_eq!(keyboard.modifiers(), mods);
        assert_eq!(event.receiver(), None);
    }

    #[test]
    fn text_input_carries_no_modifiers() {
        let event = Event::text_input('ß');

        assert_eq!(event.ty(), EventType::TextInput);
        let keyboard = event.as_keyboard().expect("keyboard payload");
        assert_eq!(keyboard.codepoint(), Some('ß'));
        assert!(keyboard.modifiers().is_empty());
    }

    #[test]
    fn actions_select_matching_types() {
        assert_eq!(KeyAction::Down.event_type(), EventType::KeyDown);
        assert_eq!(KeyAction::Up.event_type(), EventType::KeyUp);
        assert_eq!(ButtonAction::Down.event_type(), EventType::MouseDown);
        assert_eq!(ButtonAction::Up.event_type(), EventType::MouseUp);
        assert_eq!(WindowChange::Close.event_type(), EventType::WindowClose);

        let event = Event::window(
            WindowChange::Minimize,
            WindowEvent::new(0, 0, WindowStateFlags::MINIMIZED),
        );
        assert_eq!(event.ty(), EventType::WindowMinimize);
        assert!(event.as_mouse().is_none());
    }

    #[test]
    fn flags_default_to_empty_and_can_be_set() {
        let event = Event::mouse_move(cursor(1, 2));
        assert!(event.flags().is_empty());

        let flagged = event.with_flags(EventFlags::from_bits_retain(0x80));
        assert_eq!(flagged.flags().bits(), 0x80);
    }

    //--- Checked Constructor ----------------------------------------------

    #[test]
    fn checked_constructor_accepts_matching_payload() {
        let event = Event::new(
            EventType::Scroll,
            EventFlags::empty(),
            Payload::Scroll(ScrollEvent::new(0.0, -1.5)),
        )
        .expect("scroll payload fits scroll event");

        assert_eq!(event.as_scroll(), Some(&ScrollEvent::new(0.0, -1.5)));
    }

    #[test]
    fn checked_constructor_rejects_wrong_family() {
        let result = Event::new(
            EventType::WindowResize,
            EventFlags::empty(),
            Payload::Mouse(cursor(0, 0)),
        );

        assert_eq!(
            result,
            Err(EventError::PayloadMismatch {
                ty: EventType::WindowResize,
                payload: PayloadKind::Mouse,
            })
        );
    }

    #[test]
    fn checked_constructor_rejects_codepoint_on_key_event() {
        let result = Event::new(
            EventType::KeyDown,
            EventFlags::empty(),
            Payload::Keyboard(KeyboardEvent::with_codepoint('a')),
        );
        assert_eq!(
            result,
            Err(EventError::KeyboardInputMismatch {
                ty: EventType::KeyDown
            })
        );

        let result = Event::new(
            EventType::TextInput,
            EventFlags::empty(),
            Payload::Keyboard(KeyboardEvent::with_key(Key::KeyA, KeyModifiers::empty())),
        );
        assert!(result.is_err());
    }

    //--- Dispatch ---------------------------------------------------------

    #[test]
    fn receiver_is_set_only_by_dispatch() {
        let mut event = Event::scroll(ScrollEvent::new(1.0, 0.0));
        assert_eq!(event.receiver(), None);

        event.set_receiver(WindowId::new(3));
        assert_eq!(event.receiver(), Some(WindowId::new(3)));
    }
}
