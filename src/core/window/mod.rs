//=========================================================================
// Window Abstraction
//
// A window owns exactly one toolkit handle and releases it when dropped.
// Every query and mutator forwards to the backend without caching, so
// each call observes the toolkit's current state.
//
// Callback slots:
// - `event_fn`: receives every neutral event addressed to the window
// - `frame_fn`: invoked once per main loop tick and on refresh requests
//
// Notes:
// Callbacks receive `&mut Window` and may freely call back into it,
// including replacing or clearing their own slot. A slot is taken out
// of the window for the duration of the call and only put back if the
// callback left the slot untouched.
//
//=========================================================================

//=== Submodules ==========================================================

mod flags;

//=== Standard Library Imports ============================================

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

//=== External Crates =====================================================

use log::{error, info, trace};

//=== Internal Imports ====================================================

use crate::backend::{Backend, WindowAttribute};
use crate::core::event::Event;

//=== Public API ==========================================================

pub use flags::WindowFlags;

//=== WindowId ============================================================

/// Opaque toolkit handle of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== ClipboardKind =======================================================

/// Clipboard data kinds. Only [`ClipboardKind::Utf8Text`] is exchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClipboardKind {
    #[default]
    Utf8Text,
    Image,
}

//=== Callback Slots ======================================================

pub type EventFn<B> = Box<dyn FnMut(&mut Window<B>, &Event)>;
pub type FrameFn<B> = Box<dyn FnMut(&mut Window<B>)>;

enum Slot<F> {
    Empty,
    Ready(F),
    /// Callback currently executing.
    Running,
}

impl<F> Slot<F> {
    fn begin(&mut self) -> Option<F> {
        match std::mem::replace(self, Slot::Running) {
            Slot::Ready(callback) => Some(callback),
            other => {
                *self = other;
                None
            }
        }
    }

    fn finish(&mut self, callback: F) {
        if matches!(self, Slot::Running) {
            *self = Slot::Ready(callback);
        }
    }

    fn is_set(&self) -> bool {
        !matches!(self, Slot::Empty)
    }
}

//=== Window ==============================================================

/// An OS window created through [`crate::Platform::create_window`].
pub struct Window<B: Backend> {
    handle: WindowId,
    backend: Rc<RefCell<B>>,
    event_fn: Slot<EventFn<B>>,
    frame_fn: Slot<FrameFn<B>>,

    /// Host-owned slot, never touched by the platform layer.
    pub user_data: Option<Box<dyn Any>>,
    /// Renderer-owned slot, never touched by the platform layer.
    pub renderer_data: Option<Box<dyn Any>>,
}

impl<B: Backend> Window<B> {
    pub(crate) fn new(handle: WindowId, backend: Rc<RefCell<B>>) -> Self {
        Self {
            handle,
            backend,
            event_fn: Slot::Empty,
            frame_fn: Slot::Empty,
            user_data: None,
            renderer_data: None,
        }
    }

    //--- Identity ---------------------------------------------------------

    pub fn id(&self) -> WindowId {
        self.handle
    }

    /// Toolkit handle, for graphics-surface collaborators.
    pub fn handle(&self) -> WindowId {
        self.handle
    }

    //--- Callbacks --------------------------------------------------------

    pub fn set_event_fn(&mut self, callback: impl FnMut(&mut Window<B>, &Event) + 'static) {
        self.event_fn = Slot::Ready(Box::new(callback));
    }

    pub fn clear_event_fn(&mut self) {
        self.event_fn = Slot::Empty;
    }

    pub fn has_event_fn(&self) -> bool {
        self.event_fn.is_set()
    }

    pub fn set_frame_fn(&mut self, callback: impl FnMut(&mut Window<B>) + 'static) {
        self.frame_fn = Slot::Ready(Box::new(callback));
    }

    pub fn clear_frame_fn(&mut self) {
        self.frame_fn = Slot::Empty;
    }

    pub fn has_frame_fn(&self) -> bool {
        self.frame_fn.is_set()
    }

    /// Stamps the receiver and hands the event to `event_fn`.
    ///
    /// Returns `false` when no callback is registered; the event is
    /// dropped in that case.
    pub(crate) fn dispatch(&mut self, mut event: Event) -> bool {
        event.set_receiver(self.handle);

        let Some(mut callback) = self.event_fn.begin() else {
            trace!(
                target: "platform::input",
                "{:?} for {} dropped: no event callback",
                event.ty(),
                self.handle
            );
            return false;
        };

        callback(self, &event);
        self.event_fn.finish(callback);
        true
    }

    /// Runs `frame_fn` once. Returns `false` if none is registered.
    pub(crate) fn run_frame(&mut self) -> bool {
        let Some(mut callback) = self.frame_fn.begin() else {
            return false;
        };

        callback(self);
        self.frame_fn.finish(callback);
        true
    }

    //--- Close Intent -----------------------------------------------------

    /// Whether the toolkit has recorded a close request.
    pub fn wants_to_close(&self) -> bool {
        self.backend.borrow().should_close(self.handle)
    }

    /// Requests (or vetoes) closing from the host side.
    pub fn set_wants_to_close(&mut self, value: bool) {
        self.backend.borrow_mut().set_should_close(self.handle, value);
    }

    //--- Geometry ---------------------------------------------------------

    pub fn show(&mut self) {
        self.backend.borrow_mut().show_window(self.handle);
    }

    pub fn position(&self) -> (i32, i32) {
        self.backend.borrow().window_pos(self.handle)
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.backend.borrow_mut().set_window_pos(self.handle, x, y);
    }

    pub fn size(&self) -> (i32, i32) {
        self.backend.borrow().window_size(self.handle)
    }

    pub fn set_size(&mut self, width: i32, height: i32) {
        self.backend
            .borrow_mut()
            .set_window_size(self.handle, width, height);
    }

    //--- Focus & State ----------------------------------------------------

    pub fn focus(&mut self) {
        self.backend.borrow_mut().focus_window(self.handle);
    }

    fn attribute(&self, attribute: WindowAttribute) -> bool {
        self.backend.borrow().attribute(self.handle, attribute)
    }

    pub fn is_focused(&self) -> bool {
        self.attribute(WindowAttribute::Focused)
    }

    pub fn is_minimized(&self) -> bool {
        self.attribute(WindowAttribute::Minimized)
    }

    pub fn is_hovered(&self) -> bool {
        self.attribute(WindowAttribute::Hovered)
    }

    pub fn is_visible(&self) -> bool {
        self.attribute(WindowAttribute::Visible)
    }

    pub fn is_decorated(&self) -> bool {
        self.attribute(WindowAttribute::Decorated)
    }

    pub fn is_resizable(&self) -> bool {
        self.attribute(WindowAttribute::Resizable)
    }

    pub fn is_floating(&self) -> bool {
        self.attribute(WindowAttribute::Floating)
    }

    pub fn is_maximized(&self) -> bool {
        self.attribute(WindowAttribute::Maximized)
    }

    //--- Appearance -------------------------------------------------------

    pub fn set_title(&mut self, title: &str) {
        self.backend.borrow_mut().set_title(self.handle, title);
    }

    /// Window opacity hint, clamped to `[0, 1]`.
    ///
    /// Browsers have no window opacity; there this does nothing.
    pub fn set_alpha(&mut self, alpha: f32) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let alpha = if alpha.is_nan() { 1.0 } else { alpha.clamp(0.0, 1.0) };
            self.backend.borrow_mut().set_opacity(self.handle, alpha);
        }

        #[cfg(target_arch = "wasm32")]
        let _ = alpha;
    }
}

impl<B: Backend> Drop for Window<B> {
    fn drop(&mut self) {
        match self.backend.try_borrow_mut() {
            Ok(mut backend) => {
                backend.destroy_window(self.handle);
                info!(target: "platform", "Window {} destroyed", self.handle);
            }
            Err(_) => {
                error!(
                    target: "platform",
                    "Window {} dropped while the backend was borrowed; handle leaked",
                    self.handle
                );
            }
        }
    }
}

impl<B: Backend> fmt::Debug for Window<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("handle", &self.handle)
            .field("event_fn", &self.event_fn.is_set())
            .field("frame_fn", &self.frame_fn.is_set())
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ClientApi, HeadlessBackend, WindowHints};
    use crate::core::event::{ScrollEvent, WindowStateFlags};
    use std::cell::Cell;

    //--- Test Helpers -----------------------------------------------------

    fn open_window(flags: WindowFlags) -> (Rc<RefCell<HeadlessBackend>>, Window<HeadlessBackend>) {
        let backend = Rc::new(RefCell::new(HeadlessBackend::new()));
        let handle = backend
            .borrow_mut()
            .create_window("test", 800, 600, &WindowHints::new(flags, ClientApi::NoApi), None)
            .expect("headless create");
        let window = Window::new(handle, backend.clone());
        (backend, window)
    }

    fn scroll_event() -> Event {
        Event::scroll(ScrollEvent::new(0.0, 1.0))
    }

    //--- Dispatch ---------------------------------------------------------

    #[test]
    fn dispatch_without_callback_drops_event() {
        let (_backend, mut window) = open_window(WindowFlags::DEFAULT);
        assert!(!window.dispatch(scroll_event()));
    }

    #[test]
    fn dispatch_sets_receiver() {
        let (_backend, mut window) = open_window(WindowFlags::DEFAULT);
        let seen = Rc::new(Cell::new(None));
        let sink = seen.clone();
        window.set_event_fn(move |_, event| sink.set(event.receiver()));

        assert!(window.dispatch(scroll_event()));
        assert_eq!(seen.get(), Some(window.id()));
    }

    #[test]
    fn callback_may_clear_itself() {
        let (_backend, mut window) = open_window(WindowFlags::DEFAULT);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        window.set_event_fn(move |w, _| {
            counter.set(counter.get() + 1);
            w.clear_event_fn();
        });

        window.dispatch(scroll_event());
        window.dispatch(scroll_event());
        assert_eq!(calls.get(), 1);
        assert!(!window.has_event_fn());
    }

    #[test]
    fn callback_may_replace_itself() {
        let (_backend, mut window) = open_window(WindowFlags::DEFAULT);
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = log.clone();
        window.set_frame_fn(move |w| {
            first.borrow_mut().push("first");
            let second = first.clone();
            w.set_frame_fn(move |_| second.borrow_mut().push("second"));
        });

        window.run_frame();
        window.run_frame();
        window.run_frame();
        assert_eq!(*log.borrow(), ["first", "second", "second"]);
    }

    #[test]
    fn callbacks_can_query_the_window() {
        let (_backend, mut window) = open_window(WindowFlags::DEFAULT);
        let size = Rc::new(Cell::new((0, 0)));
        let sink = size.clone();
        window.set_frame_fn(move |w| {
            w.set_size(1024, 768);
            sink.set(w.size());
        });

        assert!(window.run_frame());
        assert_eq!(size.get(), (1024, 768));
    }

    //--- Forwarding -------------------------------------------------------

    #[test]
    fn close_intent_round_trips() {
        let (_backend, mut window) = open_window(WindowFlags::DEFAULT);
        assert!(!window.wants_to_close());
        window.set_wants_to_close(true);
        assert!(window.wants_to_close());
        window.set_wants_to_close(false);
        assert!(!window.wants_to_close());
    }

    #[test]
    fn alpha_is_clamped() {
        let (backend, mut window) = open_window(WindowFlags::DEFAULT);
        window.set_alpha(3.5);
        assert_eq!(backend.borrow().opacity(window.id()), Some(1.0));
        window.set_alpha(-1.0);
        assert_eq!(backend.borrow().opacity(window.id()), Some(0.0));
    }

    #[test]
    fn dropping_window_releases_handle() {
        let (backend, window) = open_window(WindowFlags::DEFAULT);
        let id = window.id();
        assert!(backend.borrow().is_live(id));

        drop(window);
        assert!(!backend.borrow().is_live(id));
    }

    #[test]
    fn window_state_flags_default_to_none() {
        assert!(WindowStateFlags::default().is_empty());
    }
}
