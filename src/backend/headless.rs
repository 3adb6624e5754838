//=========================================================================
// Headless Backend
//
// Deterministic in-memory windowing toolkit.
//
// Responsibilities:
// - Keep per-window state (geometry, attributes, cursor, buttons)
// - Honour creation hints the way a desktop toolkit does
// - Queue signals injected from any thread and hand them out in order
//
// Notes:
// Injected signals travel through a crossbeam channel and only enter the
// backend's queue on `pump`, mirroring an OS event queue that is polled
// once per tick. Their state change is applied when popped. Notifications
// the backend raises itself (resize through `set_window_size`, focus
// moves) have already been applied and are queued as-is.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

//=== External Crates =====================================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, trace};

//=== Internal Imports ====================================================

use super::raw;
use super::{Backend, RawSignal, WindowAttribute, WindowHints};
use crate::core::error::PlatformError;
use crate::core::window::WindowId;

//=== Pending =============================================================

#[derive(Debug, Clone, Copy)]
struct Pending {
    signal: RawSignal,
    /// Whether popping the signal still has to apply its state change.
    apply: bool,
}

//=== SignalInjector ======================================================

/// Thread-safe handle that feeds raw signals into a [`HeadlessBackend`].
#[derive(Debug, Clone)]
pub struct SignalInjector {
    sender: Sender<Pending>,
}

impl SignalInjector {
    /// Queues a signal. Returns `false` once the backend is gone.
    pub fn send(&self, signal: RawSignal) -> bool {
        self.sender
            .send(Pending {
                signal,
                apply: true,
            })
            .is_ok()
    }

    pub fn key(&self, window: WindowId, key: i32, action: i32, mods: i32) -> bool {
        self.send(RawSignal::Key {
            window,
            key,
            scancode: 0,
            action,
            mods,
        })
    }

    pub fn text(&self, window: WindowId, codepoint: char) -> bool {
        self.send(RawSignal::Char {
            window,
            codepoint: u32::from(codepoint),
        })
    }

    pub fn cursor(&self, window: WindowId, x: f64, y: f64) -> bool {
        self.send(RawSignal::CursorPos { window, x, y })
    }

    pub fn button(&self, window: WindowId, button: i32, action: i32) -> bool {
        self.send(RawSignal::MouseButton {
            window,
            button,
            action,
            mods: 0,
        })
    }

    pub fn scroll(&self, window: WindowId, x: f64, y: f64) -> bool {
        self.send(RawSignal::Scroll { window, x, y })
    }

    pub fn close(&self, window: WindowId) -> bool {
        self.send(RawSignal::Close { window })
    }

    pub fn refresh(&self, window: WindowId) -> bool {
        self.send(RawSignal::Refresh { window })
    }
}

//=== HeadlessTracker =====================================================

#[derive(Debug, Default)]
struct TrackerState {
    initialized: Cell<bool>,
    terminated: Cell<bool>,
    live_windows: Cell<usize>,
    created_windows: Cell<usize>,
}

/// Read-only view of backend lifecycle counters that stays valid after
/// the backend has been moved into (or dropped by) a platform.
#[derive(Debug, Clone)]
pub struct HeadlessTracker {
    state: Rc<TrackerState>,
}

impl HeadlessTracker {
    pub fn is_initialized(&self) -> bool {
        self.state.initialized.get()
    }

    pub fn is_terminated(&self) -> bool {
        self.state.terminated.get()
    }

    pub fn live_windows(&self) -> usize {
        self.state.live_windows.get()
    }

    pub fn created_windows(&self) -> usize {
        self.state.created_windows.get()
    }
}

//=== HeadlessWindow ======================================================

#[derive(Debug, Clone)]
struct HeadlessWindow {
    title: String,
    size: (i32, i32),
    position: (i32, i32),
    min_size: (i32, i32),
    hints: WindowHints,
    share: Option<WindowId>,
    visible: bool,
    decorated: bool,
    resizable: bool,
    floating: bool,
    maximized: bool,
    focused: bool,
    minimized: bool,
    hovered: bool,
    should_close: bool,
    opacity: f32,
    cursor: (f64, f64),
    buttons: [bool; 8],
}

impl HeadlessWindow {
    fn new(
        title: &str,
        width: i32,
        height: i32,
        hints: &WindowHints,
        share: Option<WindowId>,
    ) -> Self {
        Self {
            title: title.to_owned(),
            size: (width, height),
            position: (0, 0),
            min_size: (0, 0),
            hints: *hints,
            share,
            visible: hints.visible(),
            decorated: hints.decorated(),
            resizable: hints.resizable(),
            floating: hints.floating(),
            maximized: hints.maximized(),
            focused: hints.visible() && hints.focused(),
            minimized: false,
            hovered: false,
            should_close: false,
            opacity: 1.0,
            cursor: (0.0, 0.0),
            buttons: [false; 8],
        }
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x < f64::from(self.size.0) && y < f64::from(self.size.1)
    }
}

//=== HeadlessBackend =====================================================

/// In-memory toolkit used by tests and by hosts replaying recorded input.
#[derive(Debug)]
pub struct HeadlessBackend {
    windows: HashMap<WindowId, HeadlessWindow>,
    next_id: u64,
    sender: Sender<Pending>,
    receiver: Receiver<Pending>,
    queue: VecDeque<Pending>,
    clipboard: String,
    monitor_scale: (f32, f32),
    fail_init: bool,
    fail_next_create: bool,
    tracker: Rc<TrackerState>,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            windows: HashMap::new(),
            next_id: 1,
            sender,
            receiver,
            queue: VecDeque::new(),
            clipboard: String::new(),
            monitor_scale: (1.0, 1.0),
            fail_init: false,
            fail_next_create: false,
            tracker: Rc::new(TrackerState::default()),
        }
    }

    /// Primary monitor content scale reported to the platform.
    pub fn with_monitor_scale(mut self, x: f32, y: f32) -> Self {
        self.monitor_scale = (x, y);
        self
    }

    /// Makes `initialize` fail, as a toolkit without a display would.
    pub fn with_init_failure(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Makes the next `create_window` call fail.
    pub fn fail_next_create(&mut self) {
        self.fail_next_create = true;
    }

    pub fn injector(&self) -> SignalInjector {
        SignalInjector {
            sender: self.sender.clone(),
        }
    }

    pub fn tracker(&self) -> HeadlessTracker {
        HeadlessTracker {
            state: self.tracker.clone(),
        }
    }

    //--- Inspection -------------------------------------------------------

    pub fn is_live(&self, window: WindowId) -> bool {
        self.windows.contains_key(&window)
    }

    pub fn title(&self, window: WindowId) -> Option<&str> {
        self.windows.get(&window).map(|w| w.title.as_str())
    }

    pub fn opacity(&self, window: WindowId) -> Option<f32> {
        self.windows.get(&window).map(|w| w.opacity)
    }

    /// Window whose GL context `window` was created to share.
    pub fn shared_context(&self, window: WindowId) -> Option<WindowId> {
        self.windows.get(&window).and_then(|w| w.share)
    }

    pub fn hints(&self, window: WindowId) -> Option<WindowHints> {
        self.windows.get(&window).map(|w| w.hints)
    }

    pub fn size_limits(&self, window: WindowId) -> Option<(i32, i32)> {
        self.windows.get(&window).map(|w| w.min_size)
    }

    /// Signals pumped but not yet popped.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    //--- Internals --------------------------------------------------------

    fn notify(&mut self, signal: RawSignal) {
        self.queue.push_back(Pending {
            signal,
            apply: false,
        });
    }

    fn move_focus_to(&mut self, target: WindowId) {
        let mut changes = Vec::new();
        for (id, window) in self.windows.iter_mut() {
            let focused = *id == target;
            if window.focused != focused {
                window.focused = focused;
                changes.push(RawSignal::Focus {
                    window: *id,
                    focused,
                });
            }
        }

        // Losing focus is reported before gaining it.
        changes.sort_by_key(|signal| matches!(signal, RawSignal::Focus { focused: true, .. }));
        for signal in changes {
            self.notify(signal);
        }
    }

    fn apply(&mut self, signal: &RawSignal) {
        match *signal {
            RawSignal::CursorPos { window, x, y } => {
                if let Some(w) = self.windows.get_mut(&window) {
                    w.cursor = (x, y);
                    w.hovered = w.contains(x, y);
                }
            }
            RawSignal::MouseButton {
                window,
                button,
                action,
                ..
            } => {
                let index = usize::try_from(button);
                if let (Some(w), Ok(index)) = (self.windows.get_mut(&window), index) {
                    if let Some(held) = w.buttons.get_mut(index) {
                        *held = action != raw::RELEASE;
                    }
                }
            }
            RawSignal::Size {
                window,
                width,
                height,
            } => {
                if let Some(w) = self.windows.get_mut(&window) {
                    w.size = (width, height);
                }
            }
            RawSignal::Iconify { window, iconified } => {
                if let Some(w) = self.windows.get_mut(&window) {
                    w.minimized = iconified;
                }
            }
            RawSignal::Focus { window, focused } => {
                if let Some(w) = self.windows.get_mut(&window) {
                    w.focused = focused;
                }
            }
            RawSignal::Close { window } => {
                if let Some(w) = self.windows.get_mut(&window) {
                    w.should_close = true;
                }
            }
            RawSignal::Key { .. }
            | RawSignal::Char { .. }
            | RawSignal::Scroll { .. }
            | RawSignal::Refresh { .. } => {}
        }
    }
}

//=== Backend Implementation ==============================================

impl Backend for HeadlessBackend {
    fn initialize(&mut self) -> Result<(), PlatformError> {
        if self.fail_init {
            return Err(PlatformError::Init("headless display unavailable".into()));
        }
        self.tracker.initialized.set(true);
        debug!(target: "platform", "Headless backend initialized");
        Ok(())
    }

    fn terminate(&mut self) {
        self.windows.clear();
        self.queue.clear();
        self.tracker.live_windows.set(0);
        self.tracker.terminated.set(true);
        debug!(target: "platform", "Headless backend terminated");
    }

    fn create_window(
        &mut self,
        title: &str,
        width: i32,
        height: i32,
        hints: &WindowHints,
        share: Option<WindowId>,
    ) -> Result<WindowId, PlatformError> {
        if std::mem::take(&mut self.fail_next_create) {
            return Err(PlatformError::WindowCreation("headless creation failure requested".into()));
        }

        let id = WindowId::new(self.next_id);
        self.next_id += 1;

        let window = HeadlessWindow::new(title, width, height, hints, share);
        let focused = window.focused;
        self.windows.insert(id, window);
        if focused {
            self.move_focus_to(id);
        }

        self.tracker.live_windows.set(self.windows.len());
        self.tracker.created_windows.set(self.tracker.created_windows.get() + 1);
        trace!(target: "platform", "Headless window {} created with {:?}", id, hints);
        Ok(id)
    }

    fn destroy_window(&mut self, window: WindowId) {
        self.windows.remove(&window);
        self.tracker.live_windows.set(self.windows.len());
    }

    fn pump(&mut self) {
        self.queue.extend(self.receiver.try_iter());
    }

    fn next_signal(&mut self) -> Option<RawSignal> {
        let pending = self.queue.pop_front()?;
        if pending.apply {
            self.apply(&pending.signal);
        }
        Some(pending.signal)
    }

    fn window_size(&self, window: WindowId) -> (i32, i32) {
        self.windows.get(&window).map_or((0, 0), |w| w.size)
    }

    fn set_window_size(&mut self, window: WindowId, width: i32, height: i32) {
        let Some(w) = self.windows.get_mut(&window) else {
            return;
        };

        let size = (width.max(w.min_size.0), height.max(w.min_size.1));
        if w.size != size {
            w.size = size;
            self.notify(RawSignal::Size {
                window,
                width: size.0,
                height: size.1,
            });
        }
    }

    fn window_pos(&self, window: WindowId) -> (i32, i32) {
        self.windows.get(&window).map_or((0, 0), |w| w.position)
    }

    fn set_window_pos(&mut self, window: WindowId, x: i32, y: i32) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.position = (x, y);
        }
    }

    fn attribute(&self, window: WindowId, attribute: WindowAttribute) -> bool {
        let Some(w) = self.windows.get(&window) else {
            return false;
        };

        match attribute {
            WindowAttribute::Focused => w.focused,
            WindowAttribute::Minimized => w.minimized,
            WindowAttribute::Hovered => w.hovered,
            WindowAttribute::Visible => w.visible,
            WindowAttribute::Decorated => w.decorated,
            WindowAttribute::Resizable => w.resizable,
            WindowAttribute::Floating => w.floating,
            WindowAttribute::Maximized => w.maximized,
        }
    }

    fn focus_window(&mut self, window: WindowId) {
        if self.windows.contains_key(&window) {
            self.move_focus_to(window);
        }
    }

    fn show_window(&mut self, window: WindowId) {
        let Some(w) = self.windows.get_mut(&window) else {
            return;
        };

        w.visible = true;
        if w.hints.focus_on_show() {
            self.move_focus_to(window);
        }
    }

    fn set_title(&mut self, window: WindowId, title: &str) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.title = title.to_owned();
        }
    }

    fn set_opacity(&mut self, window: WindowId, opacity: f32) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.opacity = opacity;
        }
    }

    fn should_close(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.should_close)
    }

    fn set_should_close(&mut self, window: WindowId, value: bool) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.should_close = value;
        }
    }

    fn set_size_limits(&mut self, window: WindowId, min_width: i32, min_height: i32) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.min_size = (min_width, min_height);
            w.size = (w.size.0.max(min_width), w.size.1.max(min_height));
        }
    }

    fn mouse_button(&self, window: WindowId, button: i32) -> i32 {
        let held = self
            .windows
            .get(&window)
            .zip(usize::try_from(button).ok())
            .and_then(|(w, index)| w.buttons.get(index).copied())
            .unwrap_or(false);

        if held {
            raw::PRESS
        } else {
            raw::RELEASE
        }
    }

    fn cursor_pos(&self, window: WindowId) -> (f64, f64) {
        self.windows.get(&window).map_or((0.0, 0.0), |w| w.cursor)
    }

    fn clipboard_text(&mut self) -> Result<String, PlatformError> {
        Ok(self.clipboard.clone())
    }

    fn set_clipboard_text(&mut self, text: &str) -> Result<(), PlatformError> {
        self.clipboard = text.to_owned();
        Ok(())
    }

    fn primary_monitor_scale(&self) -> (f32, f32) {
        self.monitor_scale
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
