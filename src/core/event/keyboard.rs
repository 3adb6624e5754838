//=========================================================================
// Keyboard Payload
//
// Engine-neutral key codes, modifier bits and the keyboard payload.
//
// A keyboard payload carries either a key code (key down / up / held)
// or a Unicode codepoint (text input), never both. Codepoint payloads
// carry no modifier state.
//
//=========================================================================

//=== External Crates =====================================================

use bitflags::bitflags;

//=== Key =================================================================

/// Physical key identifier, independent of any toolkit numbering.
///
/// Keys the neutral vocabulary does not name are carried as
/// [`Key::Raw`] with the toolkit's own code so engine code can still
/// special-case them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    //--- Navigation / Editing ---------------------------------------------

    Escape,
    Enter,
    Tab,
    Backspace,
    Insert,
    Delete,
    ArrowRight,
    ArrowLeft,
    ArrowDown,
    ArrowUp,
    PageUp,
    PageDown,
    Home,
    End,
    PadEnter,
    Space,

    //--- Numeric Keys -----------------------------------------------------

    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,

    //--- Function Keys ----------------------------------------------------

    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    //--- Pass-through -----------------------------------------------------

    /// Toolkit code with no neutral equivalent, passed through unchanged.
    Raw(i32),
}

//=== KeyModifiers ========================================================

bitflags! {
    /// Modifier keys and lock states active when a key event fired.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        const SHIFT     = 1 << 0;
        const CONTROL   = 1 << 1;
        const ALT       = 1 << 2;
        const SUPER     = 1 << 3;
        const CAPS_LOCK = 1 << 4;
        const NUM_LOCK  = 1 << 5;
    }
}

//=== KeyInput ============================================================

/// What a keyboard payload identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyInput {
    Key(Key),
    Codepoint(char),
}

//=== KeyboardEvent =======================================================

/// Keyboard payload.
///
/// Fields are private so a codepoint payload can never acquire modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyboardEvent {
    input: KeyInput,
    modifiers: KeyModifiers,
}

impl KeyboardEvent {
    //--- Construction -----------------------------------------------------

    /// Payload for key down / up / held events.
    pub fn with_key(key: Key, modifiers: KeyModifiers) -> Self {
        Self {
            input: KeyInput::Key(key),
            modifiers,
        }
    }

    /// Payload for text input events (modifiers always empty).
    pub fn with_codepoint(codepoint: char) -> Self {
        Self {
            input: KeyInput::Codepoint(codepoint),
            modifiers: KeyModifiers::empty(),
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn input(&self) -> KeyInput {
        self.input
    }

    /// The key code, if this is a key payload.
    pub fn key(&self) -> Option<Key> {
        match self.input {
            KeyInput::Key(key) => Some(key),
            KeyInput::Codepoint(_) => None,
        }
    }

    /// The codepoint, if this is a text payload.
    pub fn codepoint(&self) -> Option<char> {
        match self.input {
            KeyInput::Codepoint(c) => Some(c),
            KeyInput::Key(_) => None,
        }
    }

    pub fn modifiers(&self) -> KeyModifiers {
        self.modifiers
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
