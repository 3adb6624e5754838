//=========================================================================
// Event Model
//
// Closed set of engine-neutral events produced by the backend adapter
// and dispatched to a window's event callback.
//
//=========================================================================

//=== Submodules ==========================================================

#[allow(clippy::module_inception)]
mod event;
mod keyboard;
mod mouse;
mod window;

//=== Public API ==========================================================

pub use event::{
    ButtonAction, Event, EventFlags, EventType, KeyAction, Payload, PayloadKind, WindowChange,
};
pub use keyboard::{Key, KeyInput, KeyModifiers, KeyboardEvent};
pub use mouse::{ButtonFlags, MouseButton, MouseEvent, ScrollEvent};
pub use window::{WindowEvent, WindowStateFlags};
