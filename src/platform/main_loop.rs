//=========================================================================
// Main Loop
//
// Tick scheduling for a platform and its main window.
//
// A tick always pumps every pending signal before the main window's frame
// callback runs. Two schedulers drive ticks:
//
// - `BlockingScheduler`: loops on the calling thread until the main window
//   wants to close, then hands the platform back.
// - `HostScheduler`: gives a step closure to a `FrameHost` (the browser's
//   animation frames, or a host-owned loop) and returns at once. The host
//   decides when ticks happen and when they stop.
//
// `DefaultScheduler` picks between them at build time.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

//=== External Crates =====================================================

use log::{debug, info, trace, warn};

//=== Internal Imports ====================================================

use super::{Platform, PumpReport};
use crate::backend::Backend;
use crate::core::error::PlatformError;
use crate::core::window::WindowId;

//=== Tick ================================================================

/// One tick: pump all pending signals, then run `main`'s frame callback.
///
/// A missing main window only skips the frame part.
pub fn step<B: Backend>(platform: &mut Platform<B>, main: WindowId) -> PumpReport {
    let report = platform.pump_events();

    if let Some(window) = platform.window_mut(main) {
        window.run_frame();
    }

    report
}

/// Ticks until `main` wants to close. Returns the number of ticks run.
///
/// The close intent is checked at the top of every tick, so a request
/// raised during a tick lets that tick finish and prevents the next one.
///
/// # Errors
///
/// [`PlatformError::UnknownWindow`] if `main` is not a live window.
pub fn run_blocking<B: Backend>(
    platform: &mut Platform<B>,
    main: WindowId,
) -> Result<u64, PlatformError> {
    if platform.window(main).is_none() {
        return Err(PlatformError::UnknownWindow(main));
    }

    info!(target: "platform::loop", "Entering blocking main loop for window {}", main);
    let mut ticks = 0u64;

    loop {
        match platform.window(main) {
            Some(window) if window.wants_to_close() => break,
            Some(_) => {}
            None => {
                warn!(target: "platform::loop", "Main window {} destroyed inside the loop", main);
                break;
            }
        }

        let report = step(platform, main);
        if !report.is_clean() {
            debug!(
                target: "platform::loop",
                "Tick {} dropped {} malformed signals",
                ticks,
                report.rejected.len()
            );
        }
        ticks += 1;
    }

    info!(target: "platform::loop", "Main loop stopped after {} ticks", ticks);
    Ok(ticks)
}

//=== LoopExit ============================================================

/// How a scheduler gave control back.
pub enum LoopExit<B: Backend> {
    /// The loop ran to completion; the platform is returned for teardown.
    Stopped(Platform<B>),
    /// The platform now lives inside the host's frame scheduler.
    HandedToHost,
}

impl<B: Backend> LoopExit<B> {
    pub fn into_platform(self) -> Option<Platform<B>> {
        match self {
            Self::Stopped(platform) => Some(platform),
            Self::HandedToHost => None,
        }
    }
}

impl<B: Backend> fmt::Debug for LoopExit<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped(platform) => f.debug_tuple("Stopped").field(platform).finish(),
            Self::HandedToHost => f.write_str("HandedToHost"),
        }
    }
}

//=== StartError ==========================================================

/// A scheduler refused to start. The platform comes back untouched, with
/// its windows alive and the toolkit still initialized.
pub struct StartError<B: Backend> {
    pub error: PlatformError,
    pub platform: Platform<B>,
}

impl<B: Backend> StartError<B> {
    pub fn new(error: PlatformError, platform: Platform<B>) -> Self {
        Self { error, platform }
    }

    pub fn into_parts(self) -> (PlatformError, Platform<B>) {
        (self.error, self.platform)
    }
}

impl<B: Backend> fmt::Debug for StartError<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartError")
            .field("error", &self.error)
            .field("platform", &self.platform)
            .finish()
    }
}

impl<B: Backend> fmt::Display for StartError<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "main loop did not start: {}", self.error)
    }
}

impl<B: Backend> std::error::Error for StartError<B> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Drops the platform. Use [`StartError::into_parts`] to keep it.
impl<B: Backend> From<StartError<B>> for PlatformError {
    fn from(err: StartError<B>) -> Self {
        err.error
    }
}

//=== Scheduler ===========================================================

/// Strategy that drives ticks for a platform.
pub trait Scheduler<B: Backend> {
    /// Takes ownership of the platform and starts ticking `main`.
    ///
    /// # Errors
    ///
    /// [`PlatformError::UnknownWindow`] if `main` is not a live window. The
    /// platform is returned inside the [`StartError`].
    fn start(self, platform: Platform<B>, main: WindowId) -> Result<LoopExit<B>, StartError<B>>;
}

//--- Blocking ------------------------------------------------------------

/// Runs ticks on the calling thread until the main window wants to close.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingScheduler;

impl<B: Backend> Scheduler<B> for BlockingScheduler {
    fn start(
        self,
        mut platform: Platform<B>,
        main: WindowId,
    ) -> Result<LoopExit<B>, StartError<B>> {
        match run_blocking(&mut platform, main) {
            Ok(_) => Ok(LoopExit::Stopped(platform)),
            Err(error) => Err(StartError::new(error, platform)),
        }
    }
}

//--- Host-Driven ---------------------------------------------------------

/// Something that calls a step function on its own cadence.
pub trait FrameHost {
    /// Installs the step function. Any previous one is replaced.
    fn set_main_loop(&mut self, step: Box<dyn FnMut()>);
}

/// Hands the tick to a [`FrameHost`] and returns immediately.
///
/// There is no stopped state: ticks keep coming until the host drops the
/// step function, which drops the platform and terminates the toolkit.
#[derive(Debug, Default)]
pub struct HostScheduler<H: FrameHost> {
    host: H,
}

impl<H: FrameHost> HostScheduler<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }
}

impl<B, H> Scheduler<B> for HostScheduler<H>
where
    B: Backend + 'static,
    H: FrameHost,
{
    fn start(
        mut self,
        mut platform: Platform<B>,
        main: WindowId,
    ) -> Result<LoopExit<B>, StartError<B>> {
        if platform.window(main).is_none() {
            warn!(target: "platform::loop", "Main window {} is not live; host not armed", main);
            return Err(StartError::new(PlatformError::UnknownWindow(main), platform));
        }

        self.host.set_main_loop(Box::new(move || {
            let report = step(&mut platform, main);
            trace!(target: "platform::loop", "Host tick consumed {} signals", report.total());
        }));

        info!(target: "platform::loop", "Main loop for window {} handed to host", main);
        Ok(LoopExit::HandedToHost)
    }
}

//--- ManualHost ----------------------------------------------------------

/// Frame host driven by explicit [`ManualHost::tick`] calls.
///
/// Clones share the installed step function, so a host can keep one clone
/// and give the other to a [`HostScheduler`].
#[derive(Clone, Default)]
pub struct ManualHost {
    step: Rc<RefCell<Option<Box<dyn FnMut()>>>>,
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_installed(&self) -> bool {
        self.step.borrow().is_some()
    }

    /// Runs the step function once. Returns `false` if none is installed.
    pub fn tick(&self) -> bool {
        let taken = self.step.borrow_mut().take();
        let Some(mut step) = taken else {
            return false;
        };

        step();

        let mut slot = self.step.borrow_mut();
        if slot.is_none() {
            *slot = Some(step);
        }
        true
    }

    /// Runs up to `count` ticks and returns how many ran.
    pub fn tick_n(&self, count: usize) -> usize {
        (0..count).take_while(|_| self.tick()).count()
    }

    /// Drops the step function and everything it owns.
    ///
    /// Returns `false` if nothing was installed.
    pub fn release(&self) -> bool {
        let taken = self.step.borrow_mut().take();
        let released = taken.is_some();
        drop(taken);

        if released {
            debug!(target: "platform::loop", "Manual host released its main loop");
        }
        released
    }
}

impl FrameHost for ManualHost {
    fn set_main_loop(&mut self, step: Box<dyn FnMut()>) {
        *self.step.borrow_mut() = Some(step);
    }
}

impl fmt::Debug for ManualHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualHost")
            .field("installed", &self.is_installed())
            .finish()
    }
}

//--- Default -------------------------------------------------------------

/// Scheduler used by [`Platform::run_main_loop`] on this target.
#[cfg(not(target_arch = "wasm32"))]
pub type DefaultScheduler = BlockingScheduler;

/// Scheduler used by [`Platform::run_main_loop`] on this target.
#[cfg(target_arch = "wasm32")]
pub type DefaultScheduler = HostScheduler<super::web::AnimationFrameHost>;

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{raw, HeadlessBackend, SignalInjector};
    use crate::core::event::EventType;
    use crate::core::window::WindowFlags;
    use crate::platform::PlatformBuilder;

    //--- Test Helpers -----------------------------------------------------

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Entry {
        Event(EventType),
        Frame,
    }

    type Journal = Rc<RefCell<Vec<Entry>>>;

    fn platform_with_window() -> (Platform<HeadlessBackend>, SignalInjector, WindowId, Journal) {
        let backend = HeadlessBackend::new();
        let injector = backend.injector();
        let mut platform = PlatformBuilder::new().init(backend).expect("headless init");
        let id = platform
            .create_window("loop", 800, 600, WindowFlags::DEFAULT)
            .expect("create");

        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let events = journal.clone();
        let frames = journal.clone();
        let window = platform.window_mut(id).expect("live window");
        window.set_event_fn(move |_, event| events.borrow_mut().push(Entry::Event(event.ty())));
        window.set_frame_fn(move |_| frames.borrow_mut().push(Entry::Frame));

        (platform, injector, id, journal)
    }

    fn inject_three(injector: &SignalInjector, id: WindowId) {
        injector.key(id, raw::KEY_A, raw::PRESS, 0);
        injector.text(id, 'a');
        injector.key(id, raw::KEY_A, raw::RELEASE, 0);
    }

    const THREE_THEN_FRAME: [Entry; 4] = [
        Entry::Event(EventType::KeyDown),
        Entry::Event(EventType::TextInput),
        Entry::Event(EventType::KeyUp),
        Entry::Frame,
    ];

    //--- Blocking ---------------------------------------------------------

    #[test]
    fn blocking_tick_pumps_before_frame() {
        let (mut platform, injector, id, journal) = platform_with_window();
        let frames = journal.clone();
        platform
            .window_mut(id)
            .expect("live window")
            .set_frame_fn(move |w| {
                frames.borrow_mut().push(Entry::Frame);
                w.set_wants_to_close(true);
            });

        inject_three(&injector, id);
        let ticks = platform.run_blocking(id).expect("main window");

        assert_eq!(ticks, 1);
        assert_eq!(*journal.borrow(), THREE_THEN_FRAME);
    }

    #[test]
    fn blocking_stops_before_first_tick_when_close_requested() {
        let (mut platform, injector, id, journal) = platform_with_window();
        platform.window_mut(id).expect("live window").set_wants_to_close(true);
        inject_three(&injector, id);

        assert_eq!(platform.run_blocking(id).expect("main window"), 0);
        assert!(journal.borrow().is_empty());
    }

    #[test]
    fn blocking_stops_on_toolkit_close_request() {
        let (mut platform, injector, id, journal) = platform_with_window();
        injector.close(id);

        assert_eq!(platform.run_blocking(id).expect("main window"), 1);
        assert_eq!(
            *journal.borrow(),
            [Entry::Event(EventType::WindowClose), Entry::Frame]
        );
    }

    #[test]
    fn blocking_rejects_unknown_main_window() {
        let (mut platform, _injector, id, _journal) = platform_with_window();
        platform.destroy_window(id);

        assert!(matches!(
            platform.run_blocking(id),
            Err(PlatformError::UnknownWindow(missing)) if missing == id
        ));
    }

    #[test]
    fn blocking_scheduler_returns_platform_for_teardown() {
        let (mut platform, _injector, id, _journal) = platform_with_window();
        let tracker = platform.backend().tracker();
        platform.window_mut(id).expect("live window").set_wants_to_close(true);

        let exit = BlockingScheduler.start(platform, id).expect("start");
        let mut platform = exit.into_platform().expect("stopped");
        assert!(platform.destroy_window(id));
        platform.quit();
        assert!(tracker.is_terminated());
    }

    #[test]
    fn blocking_refresh_runs_frame_after_queued_input() {
        let (mut platform, injector, id, journal) = platform_with_window();
        let frames = journal.clone();
        platform
            .window_mut(id)
            .expect("live window")
            .set_frame_fn(move |w| {
                frames.borrow_mut().push(Entry::Frame);
                w.set_wants_to_close(true);
            });

        inject_three(&injector, id);
        injector.refresh(id);
        let ticks = platform.run_blocking(id).expect("main window");

        // One frame for the refresh signal, one for the tick itself.
        assert_eq!(ticks, 1);
        assert_eq!(
            *journal.borrow(),
            [
                Entry::Event(EventType::KeyDown),
                Entry::Event(EventType::TextInput),
                Entry::Event(EventType::KeyUp),
                Entry::Frame,
                Entry::Frame,
            ]
        );
    }

    #[test]
    fn blocking_scheduler_hands_platform_back_on_unknown_main_window() {
        let (mut platform, _injector, id, journal) = platform_with_window();
        let tracker = platform.backend().tracker();
        platform.window_mut(id).expect("live window").set_wants_to_close(true);

        let err = BlockingScheduler
            .start(platform, WindowId::new(999))
            .expect_err("unknown main window");
        assert!(matches!(
            err.error,
            PlatformError::UnknownWindow(missing) if missing == WindowId::new(999)
        ));
        assert!(!tracker.is_terminated());
        assert_eq!(tracker.live_windows(), 1);
        assert!(journal.borrow().is_empty());

        let exit = BlockingScheduler.start(err.platform, id).expect("start");
        let platform = exit.into_platform().expect("stopped");
        assert!(platform.window(id).is_some());
        platform.quit();
        assert!(tracker.is_terminated());
    }

    #[test]
    fn start_error_converts_into_platform_error() {
        let (platform, _injector, _id, _journal) = platform_with_window();
        let tracker = platform.backend().tracker();

        let err = BlockingScheduler
            .start(platform, WindowId::new(7))
            .expect_err("unknown main window");
        assert!(err.to_string().contains("did not start"));

        let error: PlatformError = err.into();
        assert!(matches!(error, PlatformError::UnknownWindow(_)));
        assert!(tracker.is_terminated());
    }

    //--- Host-Driven ------------------------------------------------------

    #[test]
    fn host_tick_pumps_before_frame() {
        let (platform, injector, id, journal) = platform_with_window();
        let host = ManualHost::new();

        let exit = HostScheduler::new(host.clone()).start(platform, id).expect("start");
        assert!(matches!(exit, LoopExit::HandedToHost));
        assert!(journal.borrow().is_empty());

        inject_three(&injector, id);
        assert!(host.tick());
        assert_eq!(*journal.borrow(), THREE_THEN_FRAME);

        assert!(host.tick());
        assert_eq!(journal.borrow().last(), Some(&Entry::Frame));
        assert_eq!(journal.borrow().len(), 5);
    }

    #[test]
    fn host_ticks_continue_after_close_request() {
        let (mut platform, _injector, id, journal) = platform_with_window();
        platform.window_mut(id).expect("live window").set_wants_to_close(true);
        let host = ManualHost::new();
        HostScheduler::new(host.clone()).start(platform, id).expect("start");

        assert_eq!(host.tick_n(3), 3);
        assert_eq!(*journal.borrow(), [Entry::Frame; 3]);
    }

    #[test]
    fn signals_raised_by_a_frame_arrive_next_tick() {
        let (mut platform, _injector, id, journal) = platform_with_window();
        let frames = journal.clone();
        platform
            .window_mut(id)
            .expect("live window")
            .set_frame_fn(move |w| {
                frames.borrow_mut().push(Entry::Frame);
                w.set_size(1024, 768);
            });

        let host = ManualHost::new();
        HostScheduler::new(host.clone()).start(platform, id).expect("start");
        host.tick_n(2);

        assert_eq!(
            *journal.borrow(),
            [
                Entry::Frame,
                Entry::Event(EventType::WindowResize),
                Entry::Frame
            ]
        );
    }

    #[test]
    fn releasing_the_host_terminates_the_toolkit() {
        let (platform, _injector, id, _journal) = platform_with_window();
        let tracker = platform.backend().tracker();
        let host = ManualHost::new();
        HostScheduler::new(host.clone()).start(platform, id).expect("start");

        assert!(host.tick());
        assert!(!tracker.is_terminated());

        assert!(host.release());
        assert!(tracker.is_terminated());
        assert_eq!(tracker.live_windows(), 0);
        assert!(!host.tick());
        assert!(!host.release());
    }

    #[test]
    fn host_scheduler_rejects_unknown_main_window() {
        let (platform, _injector, id, journal) = platform_with_window();
        let tracker = platform.backend().tracker();
        let host = ManualHost::new();

        let err = HostScheduler::new(host.clone())
            .start(platform, WindowId::new(404))
            .expect_err("unknown main window");
        assert!(!host.is_installed());
        assert!(!tracker.is_terminated());
        assert_eq!(tracker.live_windows(), 1);

        let (error, platform) = err.into_parts();
        assert!(matches!(
            error,
            PlatformError::UnknownWindow(missing) if missing == WindowId::new(404)
        ));
        assert!(platform.window(id).is_some());

        HostScheduler::new(host.clone()).start(platform, id).expect("start");
        assert!(host.tick());
        assert_eq!(*journal.borrow(), [Entry::Frame]);
    }

    #[test]
    fn manual_host_without_step_does_nothing() {
        let host = ManualHost::new();
        assert!(!host.tick());
        assert_eq!(host.tick_n(5), 0);
    }
}
