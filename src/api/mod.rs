//! Carousel WASM API
//!
//! This module provides the JavaScript-facing API for the carousel block.
//! It binds the headless engine to the live DOM through web-sys.
//!
//! # Module Structure
//!
//! - `helpers`: Logging macros, serde conversions and error handling at the JS boundary
//! - `dom`: Snapshots, materialization of rendered trees and listener guards
//! - `streaming`: Page-wide streaming library loader and session calls
//! - `host`: `DomHost`, the browser implementation of `CarouselHost`
//! - `carousel`: `decorateCarousel`, `CarouselHandle` and the markup-only entry point
//! - `blocks`: `decorateCards` and `decorateQuote`, the one-shot rewrites

pub mod helpers;
pub mod dom;
pub mod streaming;
pub mod host;
pub mod carousel;
pub mod blocks;

pub use blocks::{decorate_cards, decorate_quote};
pub use carousel::{active_carousel_count, decorate_carousel, render_carousel_markup, CarouselHandle};
pub use host::{DomHost, SlideView};
