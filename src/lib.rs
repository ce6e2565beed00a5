//! Portfolio effects core crate.
//!
//! Ambient and interactive effects for a single-page portfolio: matrix rain,
//! floating particles, the hero typewriter, glitch pulses, scroll-triggered
//! reveals, counters and pointer micro-interactions. Effect logic runs against
//! the [`Surface`] abstraction; `start_effects()` wires it to the live page.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod effects;
pub mod engine;
pub mod error;
pub mod governor;
pub mod interaction;
pub mod navigation;
pub mod registry;
pub mod rng;
pub mod scheduler;
pub mod surface;
pub mod visibility;
mod web;

pub use config::EffectsConfig;
pub use engine::Engine;
pub use error::EffectsError;
pub use registry::{Registry, Role};
pub use rng::FxRng;
pub use surface::{MemorySurface, NodeId, Rect, Surface, Viewport};
pub use web::{DomSurface, registry_report, start_effects};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

/// Milliseconds from the page's time origin; 0 outside a browser.
pub(crate) fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
