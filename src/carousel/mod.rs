//! Headless carousel engine
//!
//! Decoration (row classification and slide extraction) plus the
//! per-instance controller that drives rotation, autoplay and lazy media
//! loading through a `CarouselHost`. Nothing here depends on a browser.

pub mod decorate;
pub mod rotation;
pub mod host;
pub mod media;
pub mod autoplay;
pub mod controller;

pub use decorate::{decorate, DecoratedBlock};
pub use rotation::{Placement, Rotation};
pub use host::{CarouselHost, PlayWhen, SessionId, TimerId};
pub use media::{LibraryState, LoadOutcome, LoadTrigger, MediaSlot, SlotState, StreamingLibrary};
pub use autoplay::Autoplay;
pub use controller::{CarouselController, Lifecycle};
