//=========================================================================
// Backend Adapter
//
// Translates raw toolkit signals into neutral events.
//
// Rules:
// - Every raw key code maps to a neutral `Key`; codes without a neutral
//   name pass through as `Key::Raw`. `KEY_UNKNOWN` suppresses the signal.
// - Modifier bits map 1:1.
// - The held-buttons mask is rebuilt by polling every raw button when the
//   signal is translated, never tracked incrementally.
// - Window signals re-query the window size from the backend.
// - Refresh is a render request, not an event.
//
//=========================================================================

//=== External Crates =====================================================

use log::trace;

//=== Internal Imports ====================================================

use super::raw;
use super::{Backend, RawSignal};
use crate::core::error::SignalError;
use crate::core::event::{
    ButtonAction, ButtonFlags, Event, Key, KeyAction, KeyModifiers, MouseButton, MouseEvent,
    ScrollEvent, WindowChange, WindowEvent, WindowStateFlags,
};
use crate::core::window::WindowId;

//=== Translation =========================================================

/// Outcome of translating one raw signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Translation {
    /// Deliver this event to the window's event callback.
    Dispatch(Event),
    /// Run the window's frame callback directly.
    Refresh,
    /// Intentionally dropped (unidentifiable key).
    Suppressed,
}

//=== Key Translation =====================================================

/// Maps a raw key code to a neutral key. `None` means "suppress".
pub fn convert_key(code: i32) -> Option<Key> {
    const DIGITS: [Key; 10] = [
        Key::Digit0,
        Key::Digit1,
        Key::Digit2,
        Key::Digit3,
        Key::Digit4,
        Key::Digit5,
        Key::Digit6,
        Key::Digit7,
        Key::Digit8,
        Key::Digit9,
    ];
    const LETTERS: [Key; 26] = [
        Key::KeyA, Key::KeyB, Key::KeyC, Key::KeyD, Key::KeyE, Key::KeyF, Key::KeyG, Key::KeyH,
        Key::KeyI, Key::KeyJ, Key::KeyK, Key::KeyL, Key::KeyM, Key::KeyN, Key::KeyO, Key::KeyP,
        Key::KeyQ, Key::KeyR, Key::KeyS, Key::KeyT, Key::KeyU, Key::KeyV, Key::KeyW, Key::KeyX,
        Key::KeyY, Key::KeyZ,
    ];
    const FUNCTION: [Key; 12] = [
        Key::F1, Key::F2, Key::F3, Key::F4, Key::F5, Key::F6, Key::F7, Key::F8, Key::F9, Key::F10,
        Key::F11, Key::F12,
    ];

    let key = match code {
        raw::KEY_UNKNOWN => return None,

        raw::KEY_ESCAPE => Key::Escape,
        raw::KEY_ENTER => Key::Enter,
        raw::KEY_TAB => Key::Tab,
        raw::KEY_BACKSPACE => Key::Backspace,
        raw::KEY_INSERT => Key::Insert,
        raw::KEY_DELETE => Key::Delete,
        raw::KEY_RIGHT => Key::ArrowRight,
        raw::KEY_LEFT => Key::ArrowLeft,
        raw::KEY_DOWN => Key::ArrowDown,
        raw::KEY_UP => Key::ArrowUp,
        raw::KEY_PAGE_UP => Key::PageUp,
        raw::KEY_PAGE_DOWN => Key::PageDown,
        raw::KEY_HOME => Key::Home,
        raw::KEY_END => Key::End,
        raw::KEY_KP_ENTER => Key::PadEnter,
        raw::KEY_SPACE => Key::Space,

        raw::KEY_0..=raw::KEY_9 => DIGITS[(code - raw::KEY_0) as usize],
        raw::KEY_A..=raw::KEY_Z => LETTERS[(code - raw::KEY_A) as usize],
        raw::KEY_F1..=raw::KEY_F12 => FUNCTION[(code - raw::KEY_F1) as usize],

        other => Key::Raw(other),
    };

    Some(key)
}

//=== Modifier / Button Translation =======================================

pub fn convert_modifiers(mods: i32) -> KeyModifiers {
    const TABLE: [(i32, KeyModifiers); 6] = [
        (raw::MOD_SHIFT, KeyModifiers::SHIFT),
        (raw::MOD_CONTROL, KeyModifiers::CONTROL),
        (raw::MOD_ALT, KeyModifiers::ALT),
        (raw::MOD_SUPER, KeyModifiers::SUPER),
        (raw::MOD_CAPS_LOCK, KeyModifiers::CAPS_LOCK),
        (raw::MOD_NUM_LOCK, KeyModifiers::NUM_LOCK),
    ];

    TABLE
        .iter()
        .filter(|(bit, _)| mods & bit != 0)
        .fold(KeyModifiers::empty(), |acc, (_, flag)| acc | *flag)
}

/// Maps a raw button index to the button that triggered an event.
/// Indices outside the supported range map to `MouseButton::None`.
pub fn convert_button(button: i32) -> MouseButton {
    match button {
        raw::MOUSE_BUTTON_LEFT => MouseButton::Left,
        raw::MOUSE_BUTTON_MIDDLE => MouseButton::Middle,
        raw::MOUSE_BUTTON_RIGHT => MouseButton::Right,
        raw::MOUSE_BUTTON_4 => MouseButton::Extra0,
        raw::MOUSE_BUTTON_5 => MouseButton::Extra1,
        raw::MOUSE_BUTTON_6 => MouseButton::Extra2,
        raw::MOUSE_BUTTON_7 => MouseButton::Extra3,
        raw::MOUSE_BUTTON_8 => MouseButton::Extra4,
        _ => MouseButton::None,
    }
}

/// Polls every raw button and rebuilds the held-buttons mask.
pub fn convert_button_state<B: Backend + ?Sized>(backend: &B, window: WindowId) -> ButtonFlags {
    (raw::MOUSE_BUTTON_1..=raw::MOUSE_BUTTON_LAST)
        .filter(|&button| backend.mouse_button(window, button) == raw::PRESS)
        .fold(ButtonFlags::empty(), |acc, button| {
            acc | ButtonFlags::from_bits_retain(1 << button)
        })
}

//=== Action Translation ==================================================

/// # Errors
///
/// [`SignalError::InvalidKeyAction`] for anything but press, repeat or
/// release.
pub fn convert_key_action(action: i32) -> Result<KeyAction, SignalError> {
    match action {
        raw::PRESS => Ok(KeyAction::Down),
        raw::REPEAT => Ok(KeyAction::Held),
        raw::RELEASE => Ok(KeyAction::Up),
        other => Err(SignalError::InvalidKeyAction(other)),
    }
}

/// # Errors
///
/// [`SignalError::InvalidButtonAction`] for anything but press or release.
pub fn convert_button_action(action: i32) -> Result<ButtonAction, SignalError> {
    match action {
        raw::PRESS => Ok(ButtonAction::Down),
        raw::RELEASE => Ok(ButtonAction::Up),
        other => Err(SignalError::InvalidButtonAction(other)),
    }
}

//=== Signal Translation ==================================================

fn window_event<B: Backend + ?Sized>(
    backend: &B,
    window: WindowId,
    change: WindowChange,
    state: WindowStateFlags,
) -> Translation {
    let (width, height) = backend.window_size(window);
    Translation::Dispatch(Event::window(change, WindowEvent::new(width, height, state)))
}

/// Translates one signal against the backend's current state.
///
/// The signal's state change must already be applied (see
/// [`Backend::next_signal`]).
///
/// # Errors
///
/// Returns a [`SignalError`] when the toolkit reports an action or
/// codepoint outside its own contract. Nothing must be dispatched then.
pub fn translate<B: Backend + ?Sized>(
    signal: &RawSignal,
    backend: &B,
) -> Result<Translation, SignalError> {
    let translation = match *signal {
        RawSignal::Key {
            key, action, mods, ..
        } => {
            let Some(key) = convert_key(key) else {
                trace!(target: "platform::input", "Unknown key suppressed");
                return Ok(Translation::Suppressed);
            };
            let action = convert_key_action(action)?;
            Translation::Dispatch(Event::key(action, key, convert_modifiers(mods)))
        }

        RawSignal::Char { codepoint, .. } => {
            let c = char::from_u32(codepoint).ok_or(SignalError::InvalidCodepoint(codepoint))?;
            Translation::Dispatch(Event::text_input(c))
        }

        RawSignal::CursorPos { window, x, y } => {
            let held = convert_button_state(backend, window);
            let mouse = MouseEvent::new(x as i32, y as i32, MouseButton::None, held);
            Translation::Dispatch(Event::mouse_move(mouse))
        }

        RawSignal::MouseButton {
            window,
            button,
            action,
            ..
        } => {
            let action = convert_button_action(action)?;
            let (x, y) = backend.cursor_pos(window);
            let held = convert_button_state(backend, window);
            let mouse = MouseEvent::new(x as i32, y as i32, convert_button(button), held);
            Translation::Dispatch(Event::mouse_button(action, mouse))
        }

        RawSignal::Scroll { x, y, .. } => {
            Translation::Dispatch(Event::scroll(ScrollEvent::new(x, y)))
        }

        RawSignal::Size { window, .. } => {
            window_event(backend, window, WindowChange::Resize, WindowStateFlags::empty())
        }

        RawSignal::Iconify { window, iconified } => {
            let state = if iconified {
                WindowStateFlags::MINIMIZED
            } else {
                WindowStateFlags::empty()
            };
            window_event(backend, window, WindowChange::Minimize, state)
        }

        RawSignal::Focus { window, focused } => {
            let state = if focused {
                WindowStateFlags::FOCUSED
            } else {
                WindowStateFlags::empty()
            };
            window_event(backend, window, WindowChange::FocusChanged, state)
        }

        RawSignal::Close { window } => {
            window_event(backend, window, WindowChange::Close, WindowStateFlags::empty())
        }

        RawSignal::Refresh { .. } => Translation::Refresh,
    };

    Ok(translation)
}

//=========================================================================
// Unit Tests
//=========================================================================
