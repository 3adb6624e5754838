//=========================================================================
// Platform Errors
//
// Typed failures surfaced by the platform layer.
//
// Taxonomy:
// - `PlatformError`: failures of an operation the host called
//   (initialization, allocation, window creation, clipboard)
// - `SignalError`: malformed input coming *from* the toolkit; these never
//   abort a pump, they are reported and the signal is dropped
// - `EventError`: a payload that does not belong to the requested event
//   type was handed to the checked event constructor
//
//=========================================================================

//=== External Crates =====================================================

use thiserror::Error;

//=== Internal Imports ====================================================

use crate::core::event::{EventType, PayloadKind};
use crate::core::window::{ClipboardKind, WindowId};

//=== PlatformError =======================================================

/// Errors returned by [`crate::Platform`] and window operations.
///
/// Nothing in the platform layer retries; every operation is attempted
/// once and the failure is handed back to the host.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The windowing toolkit failed to start. No partial state is kept.
    #[error("platform initialization failed: {0}")]
    Init(String),

    /// The installed allocator returned null.
    #[error("allocator returned null for a {requested} byte request")]
    OutOfMemory { requested: usize },

    /// The toolkit refused to create a window handle.
    #[error("window creation failed: {0}")]
    WindowCreation(String),

    /// The id does not name a live window.
    #[error("no live window with id {0}")]
    UnknownWindow(WindowId),

    /// Only UTF-8 text is exchanged through the clipboard.
    #[error("clipboard data kind {0:?} is not supported")]
    UnsupportedClipboardKind(ClipboardKind),

    /// The toolkit's clipboard rejected the request.
    #[error("clipboard error: {0}")]
    Clipboard(String),
}

//=== SignalError =========================================================

/// Contract violations detected while translating raw toolkit signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignalError {
    /// Key signals only carry press, repeat or release.
    #[error("invalid key action code {0}")]
    InvalidKeyAction(i32),

    /// Mouse button signals only carry press or release.
    #[error("invalid mouse button action code {0}")]
    InvalidButtonAction(i32),

    /// Character signal outside the Unicode scalar value range.
    #[error("invalid unicode codepoint {0:#x}")]
    InvalidCodepoint(u32),
}

//=== EventError ==========================================================

/// Rejections from [`crate::core::event::Event::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EventError {
    /// Payload family differs from the family the event type requires.
    #[error("{ty:?} events cannot carry a {payload:?} payload")]
    PayloadMismatch { ty: EventType, payload: PayloadKind },

    /// Key events carry a key code, text input carries a codepoint.
    #[error("{ty:?} events cannot carry this keyboard input")]
    KeyboardInputMismatch { ty: EventType },
}

//=========================================================================
// Unit Tests
//=========================================================================
