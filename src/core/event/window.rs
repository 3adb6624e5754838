//=========================================================================
// Window Payload
//=========================================================================

//=== External Crates =====================================================

use bitflags::bitflags;

//=== WindowStateFlags ====================================================

bitflags! {
    /// State bits attached to window events. Empty means "none".
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowStateFlags: u8 {
        const MINIMIZED = 1 << 0;
        const FOCUSED   = 1 << 1;
    }
}

//=== WindowEvent =========================================================

/// Window geometry / state payload.
///
/// `width` and `height` are re-queried from the toolkit when the event
/// is synthesized, not copied from the toolkit callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowEvent {
    pub width: i32,
    pub height: i32,
    pub state: WindowStateFlags,
}

impl WindowEvent {
    pub fn new(width: i32, height: i32, state: WindowStateFlags) -> Self {
        Self {
            width,
            height,
            state,
        }
    }
}
