//! Models module for the carousel block decorator
//!
//! This module contains the data models shared by the parser,
//! the rotation engine and the renderers.

pub mod markup;
pub mod authored;
pub mod variant;
pub mod slide;
pub mod config;

// Re-export commonly used types
pub use markup::{Element, Node};
pub use authored::{AuthoredBlock, AuthoredRow, DEFAULT_CONTENT_WRAPPER};
pub use variant::{DisplayMode, VariantTag};
pub use slide::{ImageRef, MediaRef, SlideContent, SlideRecord, VideoKind, VideoRef, DEFAULT_TAG};
pub use config::{CarouselConfig, DecorateOptions, ImageBreakpoint, Placeholders};
