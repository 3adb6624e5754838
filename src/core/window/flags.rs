//=========================================================================
// Window Creation Flags
//=========================================================================

//=== External Crates =====================================================

use bitflags::bitflags;

//=== WindowFlags =========================================================

bitflags! {
    /// Advisory hints consumed once when a window is created.
    ///
    /// They do not describe the window afterwards; query the window for
    /// its current state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u32 {
        const RESIZABLE         = 1 << 0;
        const VISIBLE           = 1 << 1;
        const DECORATED         = 1 << 2;
        const MAXIMIZED_ON_SHOW = 1 << 3;
        const FLOATING          = 1 << 4;
        const FOCUSED           = 1 << 5;
        const FOCUSED_ON_SHOW   = 1 << 6;

        const DEFAULT = Self::VISIBLE.bits()
            | Self::RESIZABLE.bits()
            | Self::MAXIMIZED_ON_SHOW.bits()
            | Self::FOCUSED.bits()
            | Self::DECORATED.bits();
    }
}

impl Default for WindowFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
