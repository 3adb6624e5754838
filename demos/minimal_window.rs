//=========================================================================
// Minimal Window
//
// Opens one window, logs every event it receives and closes on Escape.
//
// Run with:
//   RUST_LOG=debug cargo run --example minimal_window
//
//=========================================================================

use aetheric_platform::backend::WinitBackend;
use aetheric_platform::core::event::{Key, Payload};
use aetheric_platform::prelude::*;
use log::info;

fn main() -> Result<(), PlatformError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut platform = PlatformBuilder::new()
        .with_args(std::env::args())
        .init(WinitBackend::new())?;

    let main = platform.create_window("Aetheric Platform", 1280, 720, WindowFlags::DEFAULT)?;
    info!("Graphics API: {:?}, DPI scale {}", platform.gfx_api(), platform.dpi_scale());

    if let Some(window) = platform.window_mut(main) {
        window.set_event_fn(|window, event| {
            info!("{:?} {:?}", event.ty(), event.payload());

            if let Payload::Keyboard(keyboard) = event.payload() {
                if event.ty() == EventType::KeyDown && keyboard.key() == Some(Key::Escape) {
                    window.set_wants_to_close(true);
                }
            }
        });

        let mut frames = 0u64;
        window.set_frame_fn(move |window| {
            frames += 1;
            if frames % 600 == 0 {
                info!("{} frames, window size {:?}", frames, window.size());
            }
        });

        window.show();
    }

    if let Some(mut platform) = platform.run_main_loop(main)?.into_platform() {
        platform.destroy_window(main);
        platform.quit();
    }

    Ok(())
}
