//=========================================================================
// Winit Backend
//
// Desktop toolkit built on winit's pump-style event loop.
//
// Architecture:
// ```text
//  Platform::pump_events
//     └─ Backend::pump
//          └─ EventLoop::pump_app_events(timeout = 0)
//               └─ Collector (ApplicationHandler)
//                    ├─ winit WindowEvent → RawSignal (GLFW-style codes)
//                    └─ queue: VecDeque<RawSignal>
//  Backend::next_signal
//     └─ pop front, apply cursor / button / close state, hand it out
// ```
//
// Notes:
// - Geometry and most attributes are queried from the live winit window.
//   Cursor, held buttons, hover and close intent are tracked here because
//   winit only reports them as events.
// - winit has no minimized notification; a zero-sized resize is reported
//   as iconify and the next non-zero resize as restore.
// - Rendering contexts are not created here. `ClientApi::OpenGl` windows
//   record the window they share with for the renderer to honour.
// - Window opacity has no winit counterpart; `set_opacity` only logs.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

//=== External Crates =====================================================

use log::{debug, info, trace, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{
        ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, StartCause, WindowEvent,
    },
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window as NativeHandle, WindowId as NativeId, WindowLevel},
};

//=== Internal Imports ====================================================

use super::raw;
use super::{Backend, RawSignal, WindowAttribute, WindowHints};
use crate::core::error::PlatformError;
use crate::core::window::WindowId;

//=== Constants ===========================================================

/// Pixel-precise scroll deltas are divided by this to get line units.
const PIXELS_PER_LINE: f64 = 40.0;

//=== Code Tables =========================================================

const LETTERS: [KeyCode; 26] = [
    KeyCode::KeyA,
    KeyCode::KeyB,
    KeyCode::KeyC,
    KeyCode::KeyD,
    KeyCode::KeyE,
    KeyCode::KeyF,
    KeyCode::KeyG,
    KeyCode::KeyH,
    KeyCode::KeyI,
    KeyCode::KeyJ,
    KeyCode::KeyK,
    KeyCode::KeyL,
    KeyCode::KeyM,
    KeyCode::KeyN,
    KeyCode::KeyO,
    KeyCode::KeyP,
    KeyCode::KeyQ,
    KeyCode::KeyR,
    KeyCode::KeyS,
    KeyCode::KeyT,
    KeyCode::KeyU,
    KeyCode::KeyV,
    KeyCode::KeyW,
    KeyCode::KeyX,
    KeyCode::KeyY,
    KeyCode::KeyZ,
];

const DIGITS: [KeyCode; 10] = [
    KeyCode::Digit0,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

const NUMPAD_DIGITS: [KeyCode; 10] = [
    KeyCode::Numpad0,
    KeyCode::Numpad1,
    KeyCode::Numpad2,
    KeyCode::Numpad3,
    KeyCode::Numpad4,
    KeyCode::Numpad5,
    KeyCode::Numpad6,
    KeyCode::Numpad7,
    KeyCode::Numpad8,
    KeyCode::Numpad9,
];

const FUNCTION_KEYS: [KeyCode; 24] = [
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
    KeyCode::F7,
    KeyCode::F8,
    KeyCode::F9,
    KeyCode::F10,
    KeyCode::F11,
    KeyCode::F12,
    KeyCode::F13,
    KeyCode::F14,
    KeyCode::F15,
    KeyCode::F16,
    KeyCode::F17,
    KeyCode::F18,
    KeyCode::F19,
    KeyCode::F20,
    KeyCode::F21,
    KeyCode::F22,
    KeyCode::F23,
    KeyCode::F24,
];

fn table_offset(table: &[KeyCode], code: KeyCode) -> Option<i32> {
    table
        .iter()
        .position(|&entry| entry == code)
        .and_then(|index| i32::try_from(index).ok())
}

//=== Winit Conversions ===================================================

/// Raw key code for a physical key, [`raw::KEY_UNKNOWN`] if it has none.
pub(crate) fn raw_key(key: PhysicalKey) -> i32 {
    let PhysicalKey::Code(code) = key else {
        return raw::KEY_UNKNOWN;
    };

    if let Some(offset) = table_offset(&LETTERS, code) {
        return raw::KEY_A + offset;
    }
    if let Some(offset) = table_offset(&DIGITS, code) {
        return raw::KEY_0 + offset;
    }
    if let Some(offset) = table_offset(&NUMPAD_DIGITS, code) {
        return raw::KEY_KP_0 + offset;
    }
    if let Some(offset) = table_offset(&FUNCTION_KEYS, code) {
        return raw::KEY_F1 + offset;
    }

    match code {
        KeyCode::Space => raw::KEY_SPACE,
        KeyCode::Quote => raw::KEY_APOSTROPHE,
        KeyCode::Comma => raw::KEY_COMMA,
        KeyCode::Minus => raw::KEY_MINUS,
        KeyCode::Period => raw::KEY_PERIOD,
        KeyCode::Slash => raw::KEY_SLASH,
        KeyCode::Semicolon => raw::KEY_SEMICOLON,
        KeyCode::Equal => raw::KEY_EQUAL,
        KeyCode::BracketLeft => raw::KEY_LEFT_BRACKET,
        KeyCode::Backslash => raw::KEY_BACKSLASH,
        KeyCode::BracketRight => raw::KEY_RIGHT_BRACKET,
        KeyCode::Backquote => raw::KEY_GRAVE_ACCENT,

        KeyCode::Escape => raw::KEY_ESCAPE,
        KeyCode::Enter => raw::KEY_ENTER,
        KeyCode::Tab => raw::KEY_TAB,
        KeyCode::Backspace => raw::KEY_BACKSPACE,
        KeyCode::Insert => raw::KEY_INSERT,
        KeyCode::Delete => raw::KEY_DELETE,
        KeyCode::ArrowRight => raw::KEY_RIGHT,
        KeyCode::ArrowLeft => raw::KEY_LEFT,
        KeyCode::ArrowDown => raw::KEY_DOWN,
        KeyCode::ArrowUp => raw::KEY_UP,
        KeyCode::PageUp => raw::KEY_PAGE_UP,
        KeyCode::PageDown => raw::KEY_PAGE_DOWN,
        KeyCode::Home => raw::KEY_HOME,
        KeyCode::End => raw::KEY_END,
        KeyCode::CapsLock => raw::KEY_CAPS_LOCK,
        KeyCode::ScrollLock => raw::KEY_SCROLL_LOCK,
        KeyCode::NumLock => raw::KEY_NUM_LOCK,
        KeyCode::PrintScreen => raw::KEY_PRINT_SCREEN,
        KeyCode::Pause => raw::KEY_PAUSE,

        KeyCode::NumpadDecimal => raw::KEY_KP_DECIMAL,
        KeyCode::NumpadDivide => raw::KEY_KP_DIVIDE,
        KeyCode::NumpadMultiply => raw::KEY_KP_MULTIPLY,
        KeyCode::NumpadSubtract => raw::KEY_KP_SUBTRACT,
        KeyCode::NumpadAdd => raw::KEY_KP_ADD,
        KeyCode::NumpadEnter => raw::KEY_KP_ENTER,
        KeyCode::NumpadEqual => raw::KEY_KP_EQUAL,

        KeyCode::ShiftLeft => raw::KEY_LEFT_SHIFT,
        KeyCode::ControlLeft => raw::KEY_LEFT_CONTROL,
        KeyCode::AltLeft => raw::KEY_LEFT_ALT,
        KeyCode::SuperLeft => raw::KEY_LEFT_SUPER,
        KeyCode::ShiftRight => raw::KEY_RIGHT_SHIFT,
        KeyCode::ControlRight => raw::KEY_RIGHT_CONTROL,
        KeyCode::AltRight => raw::KEY_RIGHT_ALT,
        KeyCode::SuperRight => raw::KEY_RIGHT_SUPER,
        KeyCode::ContextMenu => raw::KEY_MENU,

        _ => raw::KEY_UNKNOWN,
    }
}

/// Raw modifier bits. winit does not report lock keys as modifiers.
pub(crate) fn raw_modifiers(state: ModifiersState) -> i32 {
    let mut mods = 0;
    if state.shift_key() {
        mods |= raw::MOD_SHIFT;
    }
    if state.control_key() {
        mods |= raw::MOD_CONTROL;
    }
    if state.alt_key() {
        mods |= raw::MOD_ALT;
    }
    if state.super_key() {
        mods |= raw::MOD_SUPER;
    }
    mods
}

pub(crate) fn raw_button(button: WinitMouseButton) -> i32 {
    match button {
        WinitMouseButton::Left => raw::MOUSE_BUTTON_LEFT,
        WinitMouseButton::Right => raw::MOUSE_BUTTON_RIGHT,
        WinitMouseButton::Middle => raw::MOUSE_BUTTON_MIDDLE,
        WinitMouseButton::Back => raw::MOUSE_BUTTON_4,
        WinitMouseButton::Forward => raw::MOUSE_BUTTON_5,
        WinitMouseButton::Other(index) => i32::from(index),
    }
}

pub(crate) fn raw_key_action(state: ElementState, repeat: bool) -> i32 {
    match (state, repeat) {
        (ElementState::Released, _) => raw::RELEASE,
        (ElementState::Pressed, false) => raw::PRESS,
        (ElementState::Pressed, true) => raw::REPEAT,
    }
}

pub(crate) fn scroll_lines(delta: MouseScrollDelta) -> (f64, f64) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (f64::from(x), f64::from(y)),
        MouseScrollDelta::PixelDelta(PhysicalPosition { x, y }) => {
            (x / PIXELS_PER_LINE, y / PIXELS_PER_LINE)
        }
    }
}

fn physical_size(width: i32, height: i32) -> PhysicalSize<u32> {
    PhysicalSize::new(width.max(1).unsigned_abs(), height.max(1).unsigned_abs())
}

fn clamp_to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

//=== NativeWindow ========================================================

struct NativeWindow {
    handle: NativeHandle,
    hints: WindowHints,
    share: Option<WindowId>,
    floating: bool,
    iconified: bool,
    hovered: bool,
    should_close: bool,
    cursor: (f64, f64),
    buttons: [bool; 8],
}

//=== Collector ===========================================================

/// Event loop handler that turns winit events into raw signals.
#[derive(Default)]
struct Collector {
    windows: HashMap<WindowId, NativeWindow>,
    by_native: HashMap<NativeId, WindowId>,
    queue: VecDeque<RawSignal>,
    modifiers: ModifiersState,
    monitor_scale: Option<(f32, f32)>,
}

impl Collector {
    fn apply(&mut self, signal: &RawSignal) {
        match *signal {
            RawSignal::CursorPos { window, x, y } => {
                if let Some(w) = self.windows.get_mut(&window) {
                    w.cursor = (x, y);
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
            RawSignal::Close { window } => {
                if let Some(w) = self.windows.get_mut(&window) {
                    w.should_close = true;
                }
            }
            _ => {}
        }
    }

    fn set_hovered(&mut self, window: WindowId, hovered: bool) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.hovered = hovered;
        }
    }

    fn on_resize(&mut self, window: WindowId, size: PhysicalSize<u32>) {
        let Some(w) = self.windows.get_mut(&window) else {
            return;
        };

        let minimized = size.width == 0 && size.height == 0;
        if minimized != w.iconified {
            w.iconified = minimized;
            self.queue.push_back(RawSignal::Iconify {
                window,
                iconified: minimized,
            });
        }

        if !minimized {
            self.queue.push_back(RawSignal::Size {
                window,
                width: clamp_to_i32(size.width),
                height: clamp_to_i32(size.height),
            });
        }
    }
}

impl ApplicationHandler for Collector {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        if matches!(cause, StartCause::Init) || self.monitor_scale.is_none() {
            self.monitor_scale = event_loop.primary_monitor().map(|monitor| {
                let scale = monitor.scale_factor() as f32;
                (scale, scale)
            });
        }
    }

    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        debug!(target: "platform", "winit event loop resumed");
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        native: NativeId,
        event: WindowEvent,
    ) {
        let Some(&window) = self.by_native.get(&native) else {
            trace!(target: "platform::input", "Event for unregistered winit window ignored");
            return;
        };

        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let mods = raw_modifiers(self.modifiers);
                self.queue.push_back(RawSignal::Key {
                    window,
                    key: raw_key(event.physical_key),
                    scancode: 0,
                    action: raw_key_action(event.state, event.repeat),
                    mods,
                });

                if event.state == ElementState::Pressed {
                    let text = event.text.as_deref().unwrap_or_default();
                    for c in text.chars().filter(|c| !c.is_control()) {
                        self.queue.push_back(RawSignal::Char {
                            window,
                            codepoint: u32::from(c),
                        });
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.queue.push_back(RawSignal::CursorPos {
                    window,
                    x: position.x,
                    y: position.y,
                });
            }

            WindowEvent::CursorEntered { .. } => self.set_hovered(window, true),
            WindowEvent::CursorLeft { .. } => self.set_hovered(window, false),

            WindowEvent::MouseInput { state, button, .. } => {
                let action = match state {
                    ElementState::Pressed => raw::PRESS,
                    ElementState::Released => raw::RELEASE,
                };
                self.queue.push_back(RawSignal::MouseButton {
                    window,
                    button: raw_button(button),
                    action,
                    mods: raw_modifiers(self.modifiers),
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let (x, y) = scroll_lines(delta);
                self.queue.push_back(RawSignal::Scroll { window, x, y });
            }

            WindowEvent::Resized(size) => self.on_resize(window, size),

            WindowEvent::Focused(focused) => {
                self.queue.push_back(RawSignal::Focus { window, focused });
            }

            WindowEvent::CloseRequested => {
                self.queue.push_back(RawSignal::Close { window });
            }

            WindowEvent::RedrawRequested => {
                self.queue.push_back(RawSignal::Refresh { window });
            }

            _ => {}
        }
    }
}

//=== WinitBackend ========================================================

/// Desktop [`Backend`] backed by winit and arboard.
///
/// # Panics
///
/// winit requires the event loop on the main thread on macOS; creating
/// the platform elsewhere panics inside winit there.
pub struct WinitBackend {
    event_loop: Option<EventLoop<()>>,
    collector: Collector,
    clipboard: Option<arboard::Clipboard>,
    next_id: u64,
}

impl Default for WinitBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl WinitBackend {
    pub fn new() -> Self {
        Self {
            event_loop: None,
            collector: Collector::default(),
            clipboard: None,
            next_id: 1,
        }
    }

    fn native(&self, window: WindowId) -> Option<&NativeWindow> {
        self.collector.windows.get(&window)
    }

    fn clipboard(&mut self) -> Result<&mut arboard::Clipboard, PlatformError> {
        self.clipboard
            .as_mut()
            .ok_or_else(|| PlatformError::Clipboard("system clipboard unavailable".into()))
    }
}

impl Backend for WinitBackend {
    fn initialize(&mut self) -> Result<(), PlatformError> {
        let event_loop = EventLoop::new().map_err(|e| PlatformError::Init(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop = Some(event_loop);

        self.clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                warn!(target: "platform", "Clipboard unavailable: {}", err);
                None
            }
        };

        info!(target: "platform", "winit backend initialized");
        Ok(())
    }

    fn terminate(&mut self) {
        self.collector.windows.clear();
        self.collector.by_native.clear();
        self.collector.queue.clear();
        self.clipboard = None;
        self.event_loop = None;
        info!(target: "platform", "winit backend terminated");
    }

    fn create_window(
        &mut self,
        title: &str,
        width: i32,
        height: i32,
        hints: &WindowHints,
        share: Option<WindowId>,
    ) -> Result<WindowId, PlatformError> {
        let event_loop = self
            .event_loop
            .as_ref()
            .ok_or_else(|| PlatformError::WindowCreation("winit backend not initialized".into()))?;

        let level = if hints.floating() {
            WindowLevel::AlwaysOnTop
        } else {
            WindowLevel::Normal
        };
        let attributes = NativeHandle::default_attributes()
            .with_title(title)
            .with_inner_size(physical_size(width, height))
            .with_visible(hints.visible())
            .with_decorations(hints.decorated())
            .with_resizable(hints.resizable())
            .with_maximized(hints.maximized())
            .with_window_level(level)
            .with_active(hints.focused());

        // Windows are created ahead of the first pump, outside a handler.
        #[allow(deprecated)]
        let handle = event_loop
            .create_window(attributes)
            .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;

        if share.is_some() {
            debug!(target: "platform", "GL context sharing with {:?} left to the renderer", share);
        }

        let id = WindowId::new(self.next_id);
        self.next_id += 1;

        self.collector.by_native.insert(handle.id(), id);
        self.collector.windows.insert(
            id,
            NativeWindow {
                handle,
                hints: *hints,
                share,
                floating: hints.floating(),
                iconified: false,
                hovered: false,
                should_close: false,
                cursor: (0.0, 0.0),
                buttons: [false; 8],
            },
        );

        Ok(id)
    }

    fn destroy_window(&mut self, window: WindowId) {
        if let Some(native) = self.collector.windows.remove(&window) {
            self.collector.by_native.remove(&native.handle.id());
        }
    }

    fn pump(&mut self) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };

        let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.collector);
        if let PumpStatus::Exit(code) = status {
            warn!(target: "platform", "winit event loop exited with code {}", code);
        }
    }

    fn next_signal(&mut self) -> Option<RawSignal> {
        let signal = self.collector.queue.pop_front()?;
        self.collector.apply(&signal);
        Some(signal)
    }

    fn window_size(&self, window: WindowId) -> (i32, i32) {
        self.native(window).map_or((0, 0), |w| {
            let size = w.handle.inner_size();
            (clamp_to_i32(size.width), clamp_to_i32(size.height))
        })
    }

    fn set_window_size(&mut self, window: WindowId, width: i32, height: i32) {
        let Some(w) = self.collector.windows.get(&window) else {
            return;
        };

        // Some platforms apply the size synchronously and send no event.
        if let Some(size) = w.handle.request_inner_size(physical_size(width, height)) {
            self.collector.queue.push_back(RawSignal::Size {
                window,
                width: clamp_to_i32(size.width),
                height: clamp_to_i32(size.height),
            });
        }
    }

    fn window_pos(&self, window: WindowId) -> (i32, i32) {
        self.native(window)
            .and_then(|w| w.handle.outer_position().ok())
            .map_or((0, 0), |pos| (pos.x, pos.y))
    }

    fn set_window_pos(&mut self, window: WindowId, x: i32, y: i32) {
        if let Some(w) = self.native(window) {
            w.handle.set_outer_position(PhysicalPosition::new(x, y));
        }
    }

    fn attribute(&self, window: WindowId, attribute: WindowAttribute) -> bool {
        let Some(w) = self.native(window) else {
            return false;
        };

        match attribute {
            WindowAttribute::Focused => w.handle.has_focus(),
            WindowAttribute::Minimized => w.handle.is_minimized().unwrap_or(w.iconified),
            WindowAttribute::Hovered => w.hovered,
            WindowAttribute::Visible => w.handle.is_visible().unwrap_or(w.hints.visible()),
            WindowAttribute::Decorated => w.handle.is_decorated(),
            WindowAttribute::Resizable => w.handle.is_resizable(),
            WindowAttribute::Floating => w.floating,
            WindowAttribute::Maximized => w.handle.is_maximized(),
        }
    }

    fn focus_window(&mut self, window: WindowId) {
        if let Some(w) = self.native(window) {
            w.handle.focus_window();
        }
    }

    fn show_window(&mut self, window: WindowId) {
        if let Some(w) = self.native(window) {
            w.handle.set_visible(true);
            if w.hints.focus_on_show() {
                w.handle.focus_window();
            }
        }
    }

    fn set_title(&mut self, window: WindowId, title: &str) {
        if let Some(w) = self.native(window) {
            w.handle.set_title(title);
        }
    }

    fn set_opacity(&mut self, window: WindowId, opacity: f32) {
        trace!(
            target: "platform",
            "Opacity {} for window {} not supported by winit",
            opacity,
            window
        );
    }

    fn should_close(&self, window: WindowId) -> bool {
        self.native(window).is_some_and(|w| w.should_close)
    }

    fn set_should_close(&mut self, window: WindowId, value: bool) {
        if let Some(w) = self.collector.windows.get_mut(&window) {
            w.should_close = value;
        }
    }

    fn set_size_limits(&mut self, window: WindowId, min_width: i32, min_height: i32) {
        if let Some(w) = self.native(window) {
            w.handle
                .set_min_inner_size(Some(physical_size(min_width, min_height)));
        }
    }

    fn mouse_button(&self, window: WindowId, button: i32) -> i32 {
        let held = self
            .native(window)
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
        self.native(window).map_or((0.0, 0.0), |w| w.cursor)
    }

    fn clipboard_text(&mut self) -> Result<String, PlatformError> {
        self.clipboard()?
            .get_text()
            .map_err(|e| PlatformError::Clipboard(e.to_string()))
    }

    fn set_clipboard_text(&mut self, text: &str) -> Result<(), PlatformError> {
        self.clipboard()?
            .set_text(text)
            .map_err(|e| PlatformError::Clipboard(e.to_string()))
    }

    fn primary_monitor_scale(&self) -> (f32, f32) {
        self.collector
            .monitor_scale
            .or_else(|| {
                let window = self.collector.windows.values().next()?;
                let scale = window.handle.primary_monitor()?.scale_factor() as f32;
                Some((scale, scale))
            })
            .unwrap_or((1.0, 1.0))
    }
}

impl std::fmt::Debug for WinitBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared: Vec<_> = self
            .collector
            .windows
            .iter()
            .filter_map(|(id, w)| w.share.map(|share| (*id, share)))
            .collect();

        f.debug_struct("WinitBackend")
            .field("initialized", &self.event_loop.is_some())
            .field("windows", &self.collector.windows.len())
            .field("shared_contexts", &shared)
            .field("queued", &self.collector.queue.len())
            .field("clipboard", &self.clipboard.is_some())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
