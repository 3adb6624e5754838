//=========================================================================
// Platform
//
// Process-level context of the window layer: owns the toolkit, the
// allocator context and every window, and turns raw toolkit signals into
// dispatched events.
//
// Architecture:
// ```text
//  PlatformBuilder ──init(backend)──> Platform ──run_main_loop()──> Scheduler
//      │                                │
//      ├─ with_args()                   ├─ create_window() / destroy_window()
//      ├─ with_allocator()              ├─ pump_events()
//      ├─ with_user_data()              │    Backend::next_signal
//      └─ with_min_window_size()        │      → adapter::translate
//                                       │      → Window::dispatch / frame
//                                       └─ quit()
// ```
//
// Notes:
// - Single-threaded: every toolkit call, dispatch and frame callback runs
//   on the thread that owns the platform.
// - No backend borrow is held while a window callback runs, so callbacks
//   may query and mutate their window freely.
// - The main window is the first window ever created. It is a plain id,
//   never an owner, and it is not reassigned when that window goes away.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod main_loop;

#[cfg(target_arch = "wasm32")]
pub mod web;

//=== Standard Library Imports ============================================

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

//=== External Crates =====================================================

use log::{debug, info, trace, warn};

//=== Internal Imports ====================================================

use crate::backend::adapter::{self, Translation};
use crate::backend::{Backend, ClientApi, WindowHints};
use crate::core::error::{PlatformError, SignalError};
use crate::core::memory::{AllocBox, AllocatorContext, RawAllocator};
use crate::core::window::{ClipboardKind, Window, WindowFlags, WindowId};
use main_loop::{LoopExit, Scheduler, StartError};

//=== Graphics API ========================================================

#[cfg(not(any(feature = "vulkan", feature = "opengl")))]
compile_error!("enable one of the `vulkan` or `opengl` features");

/// Graphics API the crate was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GfxApi {
    Vulkan,
    OpenGl,
}

impl GfxApi {
    /// What the toolkit must prepare a window for.
    pub fn client_api(self) -> ClientApi {
        match self {
            Self::Vulkan => ClientApi::NoApi,
            Self::OpenGl => ClientApi::OpenGl,
        }
    }

    /// Whether windows share the main window's rendering context.
    pub fn shares_context(self) -> bool {
        matches!(self, Self::OpenGl)
    }
}

/// Build-time graphics API selection. `vulkan` wins when both features
/// are enabled.
pub const fn gfx_api() -> GfxApi {
    if cfg!(feature = "vulkan") {
        GfxApi::Vulkan
    } else {
        GfxApi::OpenGl
    }
}

//=== PumpReport ==========================================================

/// What one call to [`Platform::pump_events`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// Events handed to a window (with or without an event callback).
    pub dispatched: usize,
    /// Refresh requests answered with a frame callback.
    pub refreshed: usize,
    /// Signals dropped on purpose (unidentifiable keys).
    pub suppressed: usize,
    /// Signals addressed to windows that no longer exist.
    pub skipped: usize,
    /// Malformed signals, in arrival order.
    pub rejected: Vec<SignalError>,
}

impl PumpReport {
    /// Number of signals consumed.
    pub fn total(&self) -> usize {
        self.dispatched + self.refreshed + self.suppressed + self.skipped + self.rejected.len()
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

//=== PlatformBuilder =====================================================

/// Builder for configuring and initializing a [`Platform`].
///
/// # Default Values
///
/// - **Allocator**: [`crate::core::memory::DefaultAllocator`]
/// - **Minimum window size**: 300×70
/// - **Arguments / user data**: none
///
/// # Examples
///
/// ```
/// use aetheric_platform::backend::HeadlessBackend;
/// use aetheric_platform::core::window::WindowFlags;
/// use aetheric_platform::PlatformBuilder;
///
/// let mut platform = PlatformBuilder::new()
///     .with_args(["demo", "--windowed"])
///     .init(HeadlessBackend::new())?;
///
/// let window = platform.create_window("Demo", 1280, 720, WindowFlags::DEFAULT)?;
/// assert_eq!(platform.main_window(), Some(window));
///
/// platform.destroy_window(window);
/// platform.quit();
/// # Ok::<(), aetheric_platform::PlatformError>(())
/// ```
pub struct PlatformBuilder {
    args: Vec<String>,
    allocator: Option<Rc<dyn RawAllocator>>,
    user_data: Option<Box<dyn Any>>,
    min_window_size: (i32, i32),
}

impl Default for PlatformBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBuilder {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            allocator: None,
            user_data: None,
            min_window_size: (300, 70),
        }
    }

    //--- Configuration ----------------------------------------------------

    /// Process startup arguments, kept verbatim.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Allocator used for every block the platform allocates.
    pub fn with_allocator(mut self, allocator: Rc<dyn RawAllocator>) -> Self {
        self.allocator = Some(allocator);
        self
    }

    /// Opaque host data, retrievable through [`Platform::user_data`].
    pub fn with_user_data(mut self, data: impl Any) -> Self {
        self.user_data = Some(Box::new(data));
        self
    }

    /// Minimum client size applied to every window. Default: 300×70.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is negative.
    pub fn with_min_window_size(mut self, width: i32, height: i32) -> Self {
        assert!(
            width >= 0 && height >= 0,
            "Minimum window size must be non-negative, got {}x{}",
            width,
            height
        );
        self.min_window_size = (width, height);
        self
    }

    //--- Initialization ---------------------------------------------------

    /// Starts the toolkit and returns the platform context.
    ///
    /// # Errors
    ///
    /// [`PlatformError::Init`] if the toolkit fails to start. Nothing is
    /// left initialized in that case.
    pub fn init<B: Backend>(self, mut backend: B) -> Result<Platform<B>, PlatformError> {
        backend.initialize()?;

        debug!(
            target: "platform",
            "Platform configured: {} args, custom allocator: {}, min window size {}x{}",
            self.args.len(),
            self.allocator.is_some(),
            self.min_window_size.0,
            self.min_window_size.1
        );
        info!(target: "platform", "Platform initialized ({:?})", gfx_api());

        Ok(Platform {
            windows: HashMap::new(),
            main_window: None,
            min_window_size: self.min_window_size,
            context: AllocatorContext::new(self.allocator, self.user_data, self.args),
            backend: Rc::new(RefCell::new(backend)),
            terminated: false,
        })
    }
}

//=== Platform ============================================================

/// Initialized window layer.
///
/// Dropping the platform (or calling [`Platform::quit`]) destroys every
/// remaining window and then terminates the toolkit.
pub struct Platform<B: Backend> {
    windows: HashMap<WindowId, AllocBox<Window<B>>>,
    main_window: Option<WindowId>,
    min_window_size: (i32, i32),
    context: AllocatorContext,
    backend: Rc<RefCell<B>>,
    terminated: bool,
}

impl<B: Backend> Platform<B> {
    //--- Windows ----------------------------------------------------------

    /// Creates a window.
    ///
    /// Storage for the window is reserved before the toolkit is asked for
    /// a handle. The first window created becomes the main window.
    ///
    /// # Errors
    ///
    /// - [`PlatformError::OutOfMemory`] if the allocator returns null.
    /// - [`PlatformError::WindowCreation`] if the toolkit refuses.
    pub fn create_window(
        &mut self,
        title: &str,
        width: i32,
        height: i32,
        flags: WindowFlags,
    ) -> Result<WindowId, PlatformError> {
        self.create_window_for(gfx_api(), title, width, height, flags)
    }

    fn create_window_for(
        &mut self,
        api: GfxApi,
        title: &str,
        width: i32,
        height: i32,
        flags: WindowFlags,
    ) -> Result<WindowId, PlatformError> {
        let hints = WindowHints::new(flags, api.client_api());
        let share = if api.shares_context() {
            self.main_window()
        } else {
            None
        };

        debug!(
            target: "platform",
            "Creating window \"{}\" with {:?}, sharing {:?}",
            title,
            hints,
            share
        );

        let backend = &self.backend;
        let window = AllocBox::try_new_with(&self.context, || {
            let handle = backend
                .borrow_mut()
                .create_window(title, width, height, &hints, share)?;
            Ok::<_, PlatformError>(Window::new(handle, backend.clone()))
        })?;

        let id = window.id();
        {
            let (min_width, min_height) = self.min_window_size;
            self.backend
                .borrow_mut()
                .set_size_limits(id, min_width, min_height);
        }
        self.windows.insert(id, window);

        if self.main_window.is_none() {
            self.main_window = Some(id);
            debug!(target: "platform", "Window {} is the main window", id);
        }

        info!(target: "platform", "Window {} created: \"{}\" {}x{}", id, title, width, height);
        Ok(id)
    }

    /// Releases the window's toolkit handle, then its storage.
    ///
    /// Returns `false` if `id` does not name a live window.
    pub fn destroy_window(&mut self, id: WindowId) -> bool {
        self.windows.remove(&id).is_some()
    }

    pub fn window(&self, id: WindowId) -> Option<&Window<B>> {
        self.windows.get(&id).map(|window| &**window)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window<B>> {
        self.windows.get_mut(&id).map(|window| &mut **window)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// The first window created, while it is still alive.
    pub fn main_window(&self) -> Option<WindowId> {
        self.main_window.filter(|id| self.windows.contains_key(id))
    }

    //--- Events -----------------------------------------------------------

    /// Drains every pending toolkit signal and dispatches it.
    ///
    /// Never blocks. Malformed signals are logged, dropped and reported;
    /// they do not stop the pump.
    pub fn pump_events(&mut self) -> PumpReport {
        let mut report = PumpReport::default();
        self.backend.borrow_mut().pump();

        loop {
            let next = self.backend.borrow_mut().next_signal();
            let Some(signal) = next else {
                break;
            };

            let target = signal.window();
            if !self.windows.contains_key(&target) {
                trace!(target: "platform::input", "Signal for unknown window {} skipped", target);
                report.skipped += 1;
                continue;
            }

            let translated = {
                let backend = self.backend.borrow();
                adapter::translate(&signal, &*backend)
            };

            let Some(window) = self.windows.get_mut(&target) else {
                continue;
            };

            match translated {
                Ok(Translation::Dispatch(event)) => {
                    trace!(target: "platform::input", "{:?} -> {}", event.ty(), target);
                    window.dispatch(event);
                    report.dispatched += 1;
                }
                Ok(Translation::Refresh) => {
                    window.run_frame();
                    report.refreshed += 1;
                }
                Ok(Translation::Suppressed) => report.suppressed += 1,
                Err(err) => {
                    warn!(
                        target: "platform::input",
                        "Dropped signal for window {}: {}",
                        target,
                        err
                    );
                    report.rejected.push(err);
                }
            }
        }

        report
    }

    //--- Main Loop --------------------------------------------------------

    /// Runs pump-then-frame ticks until `main` wants to close.
    ///
    /// Returns the number of completed ticks.
    ///
    /// # Errors
    ///
    /// [`PlatformError::UnknownWindow`] if `main` is not a live window.
    pub fn run_blocking(&mut self, main: WindowId) -> Result<u64, PlatformError> {
        main_loop::run_blocking(self, main)
    }

    /// Hands the platform to the target's default scheduler.
    ///
    /// On desktop this blocks and gives the platform back once `main`
    /// wants to close. On the web the browser drives every tick and the
    /// call returns immediately.
    ///
    /// # Errors
    ///
    /// [`StartError`] carrying [`PlatformError::UnknownWindow`] if `main` is
    /// not a live window. The platform is handed back inside it.
    pub fn run_main_loop(self, main: WindowId) -> Result<LoopExit<B>, StartError<B>>
    where
        B: 'static,
    {
        main_loop::DefaultScheduler::default().start(self, main)
    }

    //--- Services ---------------------------------------------------------

    /// Build-time graphics API.
    pub fn gfx_api(&self) -> GfxApi {
        gfx_api()
    }

    /// Content scale of the primary monitor, never below 1.0.
    ///
    /// Other monitors are not consulted.
    pub fn dpi_scale(&self) -> f32 {
        let (x, y) = self.backend.borrow().primary_monitor_scale();
        if x > 1.0 || y > 1.0 {
            x.max(1.0)
        } else {
            1.0
        }
    }

    /// Reads the system clipboard.
    ///
    /// # Errors
    ///
    /// - [`PlatformError::UnsupportedClipboardKind`] for anything but UTF-8
    ///   text.
    /// - [`PlatformError::Clipboard`] if the toolkit cannot read it.
    pub fn clipboard(&self, kind: ClipboardKind) -> Result<String, PlatformError> {
        Self::check_clipboard_kind(kind)?;
        self.backend.borrow_mut().clipboard_text()
    }

    /// Writes the system clipboard.
    ///
    /// # Errors
    ///
    /// Same as [`Platform::clipboard`].
    pub fn set_clipboard(&self, kind: ClipboardKind, text: &str) -> Result<(), PlatformError> {
        Self::check_clipboard_kind(kind)?;
        self.backend.borrow_mut().set_clipboard_text(text)
    }

    fn check_clipboard_kind(kind: ClipboardKind) -> Result<(), PlatformError> {
        match kind {
            ClipboardKind::Utf8Text => Ok(()),
            other => Err(PlatformError::UnsupportedClipboardKind(other)),
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn args(&self) -> &[String] {
        self.context.args()
    }

    pub fn user_data(&self) -> Option<&dyn Any> {
        self.context.user_data()
    }

    /// Allocator context every platform allocation goes through.
    pub fn allocator(&self) -> &AllocatorContext {
        &self.context
    }

    /// Direct toolkit access.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a window callback while the platform
    /// holds the backend, which it never does across callbacks.
    pub fn backend(&self) -> Ref<'_, B> {
        self.backend.borrow()
    }

    /// Mutable toolkit access. Same borrowing rules as [`Platform::backend`].
    pub fn backend_mut(&self) -> RefMut<'_, B> {
        self.backend.borrow_mut()
    }

    //--- Shutdown ---------------------------------------------------------

    /// Destroys every remaining window, then terminates the toolkit.
    pub fn quit(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.terminated {
            return;
        }

        let remaining = self.windows.len();
        self.windows.clear();
        self.backend.borrow_mut().terminate();
        self.terminated = true;

        info!(target: "platform", "Platform terminated ({} windows closed on exit)", remaining);
    }
}

impl<B: Backend> Drop for Platform<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<B: Backend> fmt::Debug for Platform<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("windows", &self.windows.len())
            .field("main_window", &self.main_window)
            .field("min_window_size", &self.min_window_size)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{raw, HeadlessBackend, RawSignal, SignalInjector};
    use crate::core::event::{ButtonFlags, Event, EventType, Key};
    use crate::core::memory::CountingAllocator;
    use std::cell::Cell;

    //--- Test Helpers -----------------------------------------------------

    struct Fixture {
        platform: Platform<HeadlessBackend>,
        injector: SignalInjector,
        counting: Rc<CountingAllocator>,
    }

    fn fixture() -> Fixture {
        let backend = HeadlessBackend::new();
        let injector = backend.injector();
        let counting = Rc::new(CountingAllocator::new());
        let platform = PlatformBuilder::new()
            .with_allocator(counting.clone())
            .init(backend)
            .expect("headless init");

        Fixture {
            platform,
            injector,
            counting,
        }
    }

    fn record_events(window: &mut Window<HeadlessBackend>) -> Rc<RefCell<Vec<Event>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        window.set_event_fn(move |_, event| sink.borrow_mut().push(*event));
        log
    }

    //--- Initialization ---------------------------------------------------

    #[test]
    fn init_failure_is_reported() {
        let result = PlatformBuilder::new().init(HeadlessBackend::new().with_init_failure());
        assert!(matches!(result, Err(PlatformError::Init(_))));
    }

    #[test]
    fn builder_values_are_exposed() {
        let platform = PlatformBuilder::new()
            .with_args(["app", "-v"])
            .with_user_data(String::from("host state"))
            .init(HeadlessBackend::new())
            .expect("headless init");

        assert_eq!(platform.args(), ["app", "-v"]);
        let data = platform.user_data().and_then(|d| d.downcast_ref::<String>());
        assert_eq!(data.map(String::as_str), Some("host state"));
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn negative_min_size_panics() {
        let _ = PlatformBuilder::new().with_min_window_size(-1, 10);
    }

    //--- Window Lifecycle -------------------------------------------------

    #[test]
    fn create_resize_destroy_quit_leaves_nothing_behind() {
        let Fixture {
            mut platform,
            counting,
            ..
        } = fixture();
        let tracker = platform.backend().tracker();

        let id = platform
            .create_window("T", 800, 600, WindowFlags::DEFAULT)
            .expect("create");
        let window = platform.window_mut(id).expect("live window");
        assert!(!window.wants_to_close());

        window.set_size(640, 480);
        assert_eq!(window.size(), (640, 480));

        assert!(platform.destroy_window(id));
        assert_eq!(counting.live_blocks(), 0);
        assert_eq!(tracker.live_windows(), 0);

        platform.quit();
        assert!(tracker.is_terminated());
        assert_eq!(counting.live_bytes(), 0);
    }

    #[test]
    fn destroying_twice_reports_unknown() {
        let Fixture { mut platform, .. } = fixture();
        let id = platform
            .create_window("T", 800, 600, WindowFlags::DEFAULT)
            .expect("create");

        assert!(platform.destroy_window(id));
        assert!(!platform.destroy_window(id));
        assert!(platform.window(id).is_none());
    }

    #[test]
    fn out_of_memory_never_reaches_the_toolkit() {
        let Fixture {
            mut platform,
            counting,
            ..
        } = fixture();
        counting.fail_next_alloc();

        let result = platform.create_window("T", 800, 600, WindowFlags::DEFAULT);
        assert!(matches!(result, Err(PlatformError::OutOfMemory { .. })));
        assert_eq!(platform.backend().tracker().created_windows(), 0);
        assert_eq!(platform.main_window(), None);
    }

    #[test]
    fn toolkit_refusal_releases_reserved_storage() {
        let Fixture {
            mut platform,
            counting,
            ..
        } = fixture();
        platform.backend_mut().fail_next_create();

        let result = platform.create_window("T", 800, 600, WindowFlags::DEFAULT);
        assert!(matches!(result, Err(PlatformError::WindowCreation(_))));
        assert_eq!(counting.live_blocks(), 0);
    }

    #[test]
    fn minimum_size_is_applied() {
        let Fixture { mut platform, .. } = fixture();
        let id = platform
            .create_window("tiny", 10, 10, WindowFlags::DEFAULT)
            .expect("create");

        assert_eq!(platform.backend().size_limits(id), Some((300, 70)));
        assert_eq!(platform.window(id).map(|w| w.size()), Some((300, 70)));
    }

    #[test]
    fn flags_are_reflected_after_show() {
        let all = WindowFlags::all().bits();
        assert_eq!(all, 0x7f);

        for bits in 0..=all {
            let flags = WindowFlags::from_bits_truncate(bits);
            let Fixture { mut platform, .. } = fixture();
            let id = platform.create_window("flags", 800, 600, flags).expect("create");
            let window = platform.window_mut(id).expect("live window");
            window.show();

            // FOCUSED applies at creation and only to windows created
            // visible; show() itself focuses only with FOCUSED_ON_SHOW.
            let expect_focus = flags.contains(WindowFlags::VISIBLE | WindowFlags::FOCUSED)
                || flags.contains(WindowFlags::FOCUSED_ON_SHOW);

            assert!(window.is_visible(), "{:?}", flags);
            assert_eq!(window.is_focused(), expect_focus, "{:?}", flags);
            assert_eq!(
                window.is_decorated(),
                flags.contains(WindowFlags::DECORATED),
                "{:?}",
                flags
            );
            assert_eq!(
                window.is_floating(),
                flags.contains(WindowFlags::FLOATING),
                "{:?}",
                flags
            );
            assert_eq!(
                window.is_resizable(),
                flags.contains(WindowFlags::RESIZABLE),
                "{:?}",
                flags
            );
            assert_eq!(
                window.is_maximized(),
                flags.contains(WindowFlags::MAXIMIZED_ON_SHOW),
                "{:?}",
                flags
            );
        }
    }

    #[test]
    fn hidden_window_with_focus_hint_stays_unfocused_on_show() {
        let Fixture { mut platform, .. } = fixture();
        let id = platform
            .create_window("hidden", 800, 600, WindowFlags::FOCUSED)
            .expect("create");
        let window = platform.window_mut(id).expect("live window");
        assert!(!window.is_visible());

        window.show();
        assert!(window.is_visible());
        assert!(!window.is_focused());

        window.focus();
        assert!(window.is_focused());
    }

    //--- Main Window ------------------------------------------------------

    #[test]
    fn first_window_is_main_and_never_replaced() {
        let Fixture { mut platform, .. } = fixture();
        let first = platform.create_window("a", 800, 600, WindowFlags::DEFAULT).expect("a");
        let second = platform.create_window("b", 800, 600, WindowFlags::DEFAULT).expect("b");
        assert_eq!(platform.main_window(), Some(first));

        platform.destroy_window(first);
        assert_eq!(platform.main_window(), None);

        let third = platform.create_window("c", 800, 600, WindowFlags::DEFAULT).expect("c");
        assert_eq!(platform.main_window(), None);
        assert!(platform.window(second).is_some() && platform.window(third).is_some());
    }

    #[test]
    fn only_opengl_windows_share_the_main_context() {
        let Fixture { mut platform, .. } = fixture();
        let main = platform
            .create_window_for(GfxApi::OpenGl, "main", 800, 600, WindowFlags::DEFAULT)
            .expect("main");
        let gl = platform
            .create_window_for(GfxApi::OpenGl, "gl", 800, 600, WindowFlags::DEFAULT)
            .expect("gl");
        let vk = platform
            .create_window_for(GfxApi::Vulkan, "vk", 800, 600, WindowFlags::DEFAULT)
            .expect("vk");

        let backend = platform.backend();
        assert_eq!(backend.shared_context(main), None);
        assert_eq!(backend.shared_context(gl), Some(main));
        assert_eq!(backend.shared_context(vk), None);
        assert_eq!(backend.hints(gl).map(|h| h.client_api), Some(ClientApi::OpenGl));
        assert_eq!(backend.hints(vk).map(|h| h.client_api), Some(ClientApi::NoApi));
    }

    //--- Event Pumping ----------------------------------------------------

    #[test]
    fn pump_dispatches_in_arrival_order() {
        let Fixture {
            mut platform,
            injector,
            ..
        } = fixture();
        let id = platform.create_window("T", 800, 600, WindowFlags::DEFAULT).expect("create");
        let log = record_events(platform.window_mut(id).expect("live window"));

        injector.key(id, raw::KEY_ESCAPE, raw::PRESS, 0);
        injector.text(id, 'q');
        injector.scroll(id, 0.0, -2.0);

        let report = platform.pump_events();
        assert_eq!(report.dispatched, 3);
        assert!(report.is_clean());

        let log = log.borrow();
        let types: Vec<_> = log.iter().map(Event::ty).collect();
        assert_eq!(types, [EventType::KeyDown, EventType::TextInput, EventType::Scroll]);
        assert!(log.iter().all(|e| e.receiver() == Some(id)));
        assert_eq!(log[0].as_keyboard().and_then(|k| k.key()), Some(Key::Escape));
    }

    #[test]
    fn held_buttons_are_reported_on_move() {
        let Fixture {
            mut platform,
            injector,
            ..
        } = fixture();
        let id = platform.create_window("T", 800, 600, WindowFlags::DEFAULT).expect("create");
        let log = record_events(platform.window_mut(id).expect("live window"));

        injector.button(id, raw::MOUSE_BUTTON_RIGHT, raw::PRESS);
        injector.button(id, raw::MOUSE_BUTTON_LEFT, raw::PRESS);
        injector.cursor(id, 42.0, 24.0);
        platform.pump_events();

        let log = log.borrow();
        let moved = log.last().and_then(Event::as_mouse).expect("mouse move");
        assert_eq!(moved.button_state, ButtonFlags::LEFT | ButtonFlags::RIGHT);
    }

    #[test]
    fn rejected_signals_do_not_stop_the_pump() {
        let Fixture {
            mut platform,
            injector,
            ..
        } = fixture();
        let id = platform.create_window("T", 800, 600, WindowFlags::DEFAULT).expect("create");
        let log = record_events(platform.window_mut(id).expect("live window"));

        injector.key(id, raw::KEY_A, 42, 0);
        injector.button(id, raw::MOUSE_BUTTON_LEFT, raw::REPEAT);
        injector.key(id, raw::KEY_UNKNOWN, raw::PRESS, 0);
        injector.key(id, raw::KEY_A, raw::PRESS, 0);

        let report = platform.pump_events();
        assert_eq!(
            report.rejected,
            [
                SignalError::InvalidKeyAction(42),
                SignalError::InvalidButtonAction(raw::REPEAT)
            ]
        );
        assert_eq!(report.suppressed, 1);
        assert_eq!(report.dispatched, 1);
        assert_eq!(report.total(), 4);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn refresh_runs_frame_callback_directly() {
        let Fixture {
            mut platform,
            injector,
            ..
        } = fixture();
        let id = platform.create_window("T", 800, 600, WindowFlags::DEFAULT).expect("create");
        let frames = Rc::new(Cell::new(0));
        let counter = frames.clone();
        let window = platform.window_mut(id).expect("live window");
        window.set_frame_fn(move |_| counter.set(counter.get() + 1));
        let log = record_events(window);

        injector.refresh(id);
        let report = platform.pump_events();

        assert_eq!(report.refreshed, 1);
        assert_eq!(frames.get(), 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn signals_for_destroyed_windows_are_skipped() {
        let Fixture {
            mut platform,
            injector,
            ..
        } = fixture();
        let id = platform.create_window("T", 800, 600, WindowFlags::DEFAULT).expect("create");
        injector.scroll(id, 1.0, 1.0);
        platform.destroy_window(id);

        let report = platform.pump_events();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.dispatched, 0);
    }

    #[test]
    fn close_event_does_not_clear_close_intent() {
        let Fixture {
            mut platform,
            injector,
            ..
        } = fixture();
        let id = platform.create_window("T", 800, 600, WindowFlags::DEFAULT).expect("create");
        let log = record_events(platform.window_mut(id).expect("live window"));

        injector.close(id);
        platform.pump_events();

        assert_eq!(log.borrow()[0].ty(), EventType::WindowClose);
        assert!(platform.window(id).is_some_and(|w| w.wants_to_close()));
    }

    #[test]
    fn resize_from_callback_is_delivered_next_pump() {
        let Fixture { mut platform, .. } = fixture();
        let id = platform.create_window("T", 800, 600, WindowFlags::DEFAULT).expect("create");
        let window = platform.window_mut(id).expect("live window");
        let log = record_events(window);
        window.set_size(1024, 768);

        platform.pump_events();
        let log = log.borrow();
        let resized = log[0].as_window().expect("window payload");
        assert_eq!(log[0].ty(), EventType::WindowResize);
        assert_eq!((resized.width, resized.height), (1024, 768));
    }

    //--- Services ---------------------------------------------------------

    #[test]
    fn dpi_scale_uses_primary_monitor_and_floors_at_one() {
        let scaled = PlatformBuilder::new()
            .init(HeadlessBackend::new().with_monitor_scale(2.0, 2.0))
            .expect("init");
        assert_eq!(scaled.dpi_scale(), 2.0);

        let low = PlatformBuilder::new()
            .init(HeadlessBackend::new().with_monitor_scale(0.75, 0.75))
            .expect("init");
        assert_eq!(low.dpi_scale(), 1.0);

        let tall = PlatformBuilder::new()
            .init(HeadlessBackend::new().with_monitor_scale(0.5, 1.5))
            .expect("init");
        assert_eq!(tall.dpi_scale(), 1.0);
    }

    #[test]
    fn clipboard_round_trips_utf8() {
        let Fixture { platform, .. } = fixture();
        platform
            .set_clipboard(ClipboardKind::Utf8Text, "héllo")
            .expect("set");
        assert_eq!(platform.clipboard(ClipboardKind::Utf8Text).expect("get"), "héllo");
    }

    #[test]
    fn unsupported_clipboard_kind_is_typed_error() {
        let Fixture { platform, .. } = fixture();
        platform
            .set_clipboard(ClipboardKind::Utf8Text, "stale")
            .expect("set");

        assert!(matches!(
            platform.clipboard(ClipboardKind::Image),
            Err(PlatformError::UnsupportedClipboardKind(ClipboardKind::Image))
        ));
        assert!(platform.set_clipboard(ClipboardKind::Image, "x").is_err());
    }

    #[test]
    fn gfx_api_follows_features() {
        let expected = if cfg!(feature = "vulkan") {
            GfxApi::Vulkan
        } else {
            GfxApi::OpenGl
        };
        assert_eq!(gfx_api(), expected);
    }

    //--- Shutdown ---------------------------------------------------------

    #[test]
    fn quit_destroys_remaining_windows_first() {
        let Fixture {
            mut platform,
            counting,
            ..
        } = fixture();
        let tracker = platform.backend().tracker();
        platform.create_window("a", 800, 600, WindowFlags::DEFAULT).expect("a");
        platform.create_window("b", 800, 600, WindowFlags::DEFAULT).expect("b");

        platform.quit();
        assert_eq!(tracker.live_windows(), 0);
        assert!(tracker.is_terminated());
        assert_eq!(counting.live_blocks(), 0);
    }

    #[test]
    fn dropping_the_platform_terminates_the_toolkit() {
        let Fixture { platform, .. } = fixture();
        let tracker = platform.backend().tracker();
        drop(platform);
        assert!(tracker.is_terminated());
    }

    #[test]
    fn signals_name_their_window() {
        let signal = RawSignal::Focus {
            window: WindowId::new(8),
            focused: true,
        };
        assert_eq!(signal.window(), WindowId::new(8));
    }
}
