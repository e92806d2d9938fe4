//! Carousel block decorator WASM module
//!
//! Turns an authored carousel block (rows of media, copy and style
//! keywords) into a rotating carousel. The core (`models`, `parse`,
//! `carousel`, `renderers`) is pure Rust and runs natively; `api` binds it
//! to the browser DOM.

pub mod models;
pub mod parse;
pub mod carousel;
pub mod renderers;
pub mod api;

// Re-export commonly used types
pub use models::{CarouselConfig, DecorateOptions, Placeholders, SlideRecord, VariantTag};
pub use carousel::{decorate, CarouselController, CarouselHost, DecoratedBlock, Rotation};
pub use renderers::{decorate_markup, DecorateError, RenderedCarousel};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    init_logging();
    log::info!("Carousel WASM module initialized");
}

#[cfg(feature = "console_log")]
fn init_logging() {
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        wasm_warn!("logger already initialized: {}", e);
    }
}

#[cfg(not(feature = "console_log"))]
fn init_logging() {}
