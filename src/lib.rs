//=========================================================================
// Aetheric Platform — Library Root
//
// Window and input layer of the Aetheric engine: one process-level
// context, toolkit windows with event and frame callbacks, and a main
// loop that pumps input before every frame.
//
// Responsibilities:
// - Expose the platform context (`Platform`, `PlatformBuilder`)
// - Expose the engine-neutral event model and window abstraction
// - Keep toolkit specifics behind the `Backend` trait
//
// Typical usage:
// ```no_run
// use aetheric_platform::backend::WinitBackend;
// use aetheric_platform::core::window::WindowFlags;
// use aetheric_platform::PlatformBuilder;
//
// fn main() -> Result<(), aetheric_platform::PlatformError> {
//     let mut platform = PlatformBuilder::new().init(WinitBackend::new())?;
//     let main = platform.create_window("Aetheric", 1280, 720, WindowFlags::DEFAULT)?;
//
//     if let Some(mut platform) = platform.run_main_loop(main)?.into_platform() {
//         platform.destroy_window(main);
//         platform.quit();
//     }
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the toolkit-independent types (events, windows, memory,
// errors). `backend` is the toolkit boundary: the contract, the raw code
// vocabulary, the signal adapter and the bundled toolkits.
//
pub mod backend;
pub mod core;
pub mod platform;
pub mod prelude;

//--- Public Exports ------------------------------------------------------
//
// The handful of types every host touches, importable from the root.
//
pub use crate::core::error::{EventError, PlatformError, SignalError};
pub use crate::core::event::{Event, EventType};
pub use crate::core::window::{Window, WindowFlags, WindowId};
pub use platform::{gfx_api, GfxApi, Platform, PlatformBuilder, PumpReport};
