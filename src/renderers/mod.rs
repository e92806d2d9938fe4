//! Renderers module for the carousel block decorator
//!
//! This module turns decorated blocks into output markup: the HTML
//! serializer, optimized pictures, video slots, the carousel tree and the
//! card grid and pull quote blocks that share its pieces.

pub mod html;
pub mod picture;
pub mod video;
pub mod carousel;
pub mod cards;
pub mod quote;

// Re-export commonly used types
pub use html::element_to_html;
pub use picture::{responsive_picture, EdsImageOptimizer, ImageOptimizer};
pub use video::{progress_bar, show_more_less, video_container, video_element, PROGRESS_BAR_CLASS};
pub use carousel::{
    decorate_markup,
    render_carousel,
    render_nav_buttons,
    render_slide,
    DecorateError,
    RenderError,
    RenderedCarousel,
};
pub use cards::{decorate_cards_markup, render_card, render_cards};
pub use quote::{decorate_quote_markup, render_quote};
