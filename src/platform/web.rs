//=========================================================================
// Web Frame Host
//
// Drives the main loop from the browser's `requestAnimationFrame`, so the
// tick rate follows the display refresh. The browser owns termination:
// the loop runs until the page goes away.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

//=== External Crates =====================================================

use log::{debug, error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

//=== Internal Imports ====================================================

use super::main_loop::FrameHost;

//=== AnimationFrameHost ==================================================

type FrameCallback = Closure<dyn FnMut(f64)>;

/// [`FrameHost`] backed by `window.requestAnimationFrame`.
///
/// Installing a new step function stops the previous loop at its next
/// frame.
#[derive(Debug, Default)]
pub struct AnimationFrameHost {
    generation: Rc<Cell<u64>>,
}

impl AnimationFrameHost {
    pub fn new() -> Self {
        Self::default()
    }
}

fn request_frame(callback: &FrameCallback) -> bool {
    let Some(window) = web_sys::window() else {
        error!(target: "platform::loop", "No browser window; animation loop stopped");
        return false;
    };

    match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        Ok(_) => true,
        Err(err) => {
            error!(target: "platform::loop", "requestAnimationFrame failed: {:?}", err);
            false
        }
    }
}

impl FrameHost for AnimationFrameHost {
    fn set_main_loop(&mut self, mut step: Box<dyn FnMut()>) {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        let current = self.generation.clone();

        // The callback re-arms itself through this slot, so it lives as
        // long as the loop does.
        let slot: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let next = slot.clone();

        *slot.borrow_mut() = Some(Closure::wrap(Box::new(move |_timestamp: f64| {
            if current.get() != generation {
                debug!(target: "platform::loop", "Animation loop {} superseded", generation);
                return;
            }

            step();

            if let Some(callback) = next.borrow().as_ref() {
                request_frame(callback);
            }
        }) as Box<dyn FnMut(f64)>));

        let started = slot.borrow().as_ref().is_some_and(request_frame);
        if started {
            info!(target: "platform::loop", "Animation frame loop {} started", generation);
        }
    }
}
