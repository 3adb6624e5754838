//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_platform::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Platform context
pub use crate::platform::{gfx_api, GfxApi, Platform, PlatformBuilder, PumpReport};

// Main loop
pub use crate::platform::main_loop::{
    BlockingScheduler, DefaultScheduler, FrameHost, HostScheduler, LoopExit, ManualHost, Scheduler,
    StartError,
};

// Windows
pub use crate::core::window::{ClipboardKind, Window, WindowFlags, WindowId};

// Events
pub use crate::core::event::{
    ButtonFlags, Event, EventType, Key, KeyModifiers, KeyboardEvent, MouseButton, MouseEvent,
    Payload, ScrollEvent, WindowEvent, WindowStateFlags,
};

// Backends
pub use crate::backend::{Backend, HeadlessBackend};

#[cfg(all(feature = "winit", not(target_arch = "wasm32")))]
pub use crate::backend::WinitBackend;

// Errors
pub use crate::core::error::{PlatformError, SignalError};
