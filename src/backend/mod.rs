//=========================================================================
// Backend
//
// Translation boundary between the platform layer and the external
// windowing toolkit.
//
// Responsibilities:
// - `Backend`: the toolkit contract (window handles, state queries,
//   raw signal queue, clipboard, monitor scale)
// - `RawSignal`: toolkit-shaped input / window notifications
// - `adapter`: translation of raw signals into neutral events
//
// Notes:
// All calls happen on the thread that owns the toolkit. A backend applies
// the state change a signal describes when the signal is popped from
// `next_signal`, so queries made while translating that signal (held
// buttons, cursor position, window size) observe the toolkit state at
// the moment the signal fired.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod adapter;
pub mod headless;
pub mod raw;

#[cfg(all(feature = "winit", not(target_arch = "wasm32")))]
pub mod winit_backend;

//=== Internal Imports ====================================================

use crate::core::error::PlatformError;
use crate::core::window::{WindowFlags, WindowId};

//=== Public API ==========================================================

pub use adapter::Translation;
pub use headless::{HeadlessBackend, HeadlessTracker, SignalInjector};

#[cfg(all(feature = "winit", not(target_arch = "wasm32")))]
pub use winit_backend::WinitBackend;

//=== ClientApi ===========================================================

/// Rendering API the toolkit prepares a window for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientApi {
    /// The toolkit creates a GL context, optionally shared.
    OpenGl,
    /// No context; the surface is created later (Vulkan).
    NoApi,
}

//=== WindowHints =========================================================

/// Creation hints handed to the toolkit before a handle exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHints {
    pub flags: WindowFlags,
    pub client_api: ClientApi,
}

impl WindowHints {
    pub fn new(flags: WindowFlags, client_api: ClientApi) -> Self {
        Self { flags, client_api }
    }

    pub fn resizable(&self) -> bool {
        self.flags.contains(WindowFlags::RESIZABLE)
    }

    pub fn visible(&self) -> bool {
        self.flags.contains(WindowFlags::VISIBLE)
    }

    pub fn decorated(&self) -> bool {
        self.flags.contains(WindowFlags::DECORATED)
    }

    pub fn maximized(&self) -> bool {
        self.flags.contains(WindowFlags::MAXIMIZED_ON_SHOW)
    }

    pub fn floating(&self) -> bool {
        self.flags.contains(WindowFlags::FLOATING)
    }

    pub fn focused(&self) -> bool {
        self.flags.contains(WindowFlags::FOCUSED)
    }

    pub fn focus_on_show(&self) -> bool {
        self.flags.contains(WindowFlags::FOCUSED_ON_SHOW)
    }
}

//=== WindowAttribute =====================================================

/// Current-state window attributes a toolkit can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowAttribute {
    Focused,
    Minimized,
    Hovered,
    Visible,
    Decorated,
    Resizable,
    Floating,
    Maximized,
}

//=== RawSignal ===========================================================

/// A toolkit notification, still in toolkit vocabulary.
///
/// Numeric fields use the codes in [`raw`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawSignal {
    Key {
        window: WindowId,
        key: i32,
        scancode: i32,
        action: i32,
        mods: i32,
    },
    Char {
        window: WindowId,
        codepoint: u32,
    },
    CursorPos {
        window: WindowId,
        x: f64,
        y: f64,
    },
    MouseButton {
        window: WindowId,
        button: i32,
        action: i32,
        mods: i32,
    },
    Scroll {
        window: WindowId,
        x: f64,
        y: f64,
    },
    Size {
        window: WindowId,
        width: i32,
        height: i32,
    },
    Iconify {
        window: WindowId,
        iconified: bool,
    },
    Focus {
        window: WindowId,
        focused: bool,
    },
    Close {
        window: WindowId,
    },
    /// The toolkit wants the window's contents redrawn.
    Refresh {
        window: WindowId,
    },
}

impl RawSignal {
    /// Window the signal is addressed to.
    pub fn window(&self) -> WindowId {
        match *self {
            Self::Key { window, .. }
            | Self::Char { window, .. }
            | Self::CursorPos { window, .. }
            | Self::MouseButton { window, .. }
            | Self::Scroll { window, .. }
            | Self::Size { window, .. }
            | Self::Iconify { window, .. }
            | Self::Focus { window, .. }
            | Self::Close { window }
            | Self::Refresh { window } => window,
        }
    }
}

//=== Backend =============================================================

/// Contract the platform layer requires from a windowing toolkit.
///
/// Queries addressed to a handle the backend does not know return neutral
/// values (zero sizes, `false`, released buttons); mutators ignore them.
pub trait Backend {
    //--- Lifecycle --------------------------------------------------------

    /// Starts the toolkit.
    ///
    /// # Errors
    ///
    /// [`PlatformError::Init`] if the toolkit cannot start.
    fn initialize(&mut self) -> Result<(), PlatformError>;

    /// Shuts the toolkit down. Called once, after every window is gone.
    fn terminate(&mut self);

    /// Creates a window handle using `hints`, sharing the GL context of
    /// `share` when given.
    ///
    /// # Errors
    ///
    /// [`PlatformError::WindowCreation`] if the toolkit refuses.
    fn create_window(
        &mut self,
        title: &str,
        width: i32,
        height: i32,
        hints: &WindowHints,
        share: Option<WindowId>,
    ) -> Result<WindowId, PlatformError>;

    fn destroy_window(&mut self, window: WindowId);

    //--- Signals ----------------------------------------------------------

    /// Collects every signal currently pending in the OS queue without
    /// blocking.
    fn pump(&mut self);

    /// Pops the oldest pending signal and applies its state change.
    fn next_signal(&mut self) -> Option<RawSignal>;

    //--- Window State -----------------------------------------------------

    fn window_size(&self, window: WindowId) -> (i32, i32);
    fn set_window_size(&mut self, window: WindowId, width: i32, height: i32);
    fn window_pos(&self, window: WindowId) -> (i32, i32);
    fn set_window_pos(&mut self, window: WindowId, x: i32, y: i32);
    fn attribute(&self, window: WindowId, attribute: WindowAttribute) -> bool;
    fn focus_window(&mut self, window: WindowId);
    fn show_window(&mut self, window: WindowId);
    fn set_title(&mut self, window: WindowId, title: &str);

    /// Best-effort opacity hint in `[0, 1]`.
    fn set_opacity(&mut self, window: WindowId, opacity: f32);

    fn should_close(&self, window: WindowId) -> bool;
    fn set_should_close(&mut self, window: WindowId, value: bool);

    /// Minimum client size; there is no maximum.
    fn set_size_limits(&mut self, window: WindowId, min_width: i32, min_height: i32);

    //--- Pointer ----------------------------------------------------------

    /// Instantaneous action ([`raw::PRESS`] or [`raw::RELEASE`]) of a raw
    /// mouse button.
    fn mouse_button(&self, window: WindowId, button: i32) -> i32;

    /// Cursor position in window-local pixels.
    fn cursor_pos(&self, window: WindowId) -> (f64, f64);

    //--- Services ---------------------------------------------------------

    /// # Errors
    ///
    /// [`PlatformError::Clipboard`] when the system clipboard is unavailable.
    fn clipboard_text(&mut self) -> Result<String, PlatformError>;

    /// # Errors
    ///
    /// [`PlatformError::Clipboard`] when the system clipboard is unavailable.
    fn set_clipboard_text(&mut self, text: &str) -> Result<(), PlatformError>;

    /// Content scale of the primary monitor as `(x, y)`.
    fn primary_monitor_scale(&self) -> (f32, f32);
}
