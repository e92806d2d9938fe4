//! Carousel output tree
//!
//! Builds the replacement block content from a `DecoratedBlock`:
//!
//! ```text
//! div.carousel-container
//!   ul.carousel-slides[.<variant>]   (--items-per-view)
//!     li.carousel-slide[.<style>][.active-slide]
//!       div.carousel-slide-image > picture   | div.video-container > video + progress bar
//!       div.carousel-slide-body  > heading + body
//!   div.carousel-nav-buttons > button.slide-prev + button.slide-next
//! ```
//!
//! plus the `div.default-content-wrapper` side panel for ancillary rows.

use crate::carousel::{decorate, DecoratedBlock};
use crate::models::{CarouselConfig, DecorateOptions, Element, MediaRef, Placeholders, SlideRecord, VariantTag};
use crate::parse::{parse_block_with_sibling, MarkupError};
use super::html::element_to_html;
use super::picture::{responsive_picture, EdsImageOptimizer, ImageOptimizer};
use super::video::{show_more_less, video_container};
use crate::models::Node;
use serde::Serialize;
use thiserror::Error;

pub const CONTAINER_CLASS: &str = "carousel-container";
pub const SLIDES_CLASS: &str = "carousel-slides";
pub const SLIDE_CLASS: &str = "carousel-slide";
pub const ACTIVE_CLASS: &str = "active-slide";
pub const NAV_CLASS: &str = "carousel-nav-buttons";
pub const BUTTON_CONTAINER_CLASS: &str = "button-container";
pub const LEFT_CONTENT_CLASS: &str = "default-content-wrapper";

const NAV_TEMPLATE: &str = include_str!("templates/nav_buttons.html.mustache");

#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("Template rendering failed: {0}")]
    Template(String),
}

/// Top-level failure of the markup-in, markup-out entry point
#[derive(Debug, Clone, Error)]
pub enum DecorateError {
    #[error(transparent)]
    Markup(#[from] MarkupError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Rendered block content plus the decoration it came from
#[derive(Debug, Clone)]
pub struct RenderedCarousel {
    pub container: Element,
    /// `None` when every row became a slide (or was dropped)
    pub left_content: Option<Element>,
    pub decorated: DecoratedBlock,
}

impl RenderedCarousel {
    pub fn container_html(&self) -> String {
        element_to_html(&self.container)
    }

    pub fn left_content_html(&self) -> Option<String> {
        self.left_content.as_ref().map(element_to_html)
    }
}

#[derive(Serialize)]
struct NavLabels<'a> {
    previous_label: &'a str,
    next_label: &'a str,
}

/// Previous/next button pair, labels from the placeholders
pub fn render_nav_buttons(placeholders: &Placeholders) -> Result<String, RenderError> {
    let labels = NavLabels {
        previous_label: placeholders.get_or("previousSlide", "Previous Slides"),
        next_label: placeholders.get_or("nextSlide", "Next Slides"),
    };
    let template = mustache::compile_str(NAV_TEMPLATE).map_err(|e| RenderError::Template(e.to_string()))?;
    template
        .render_to_string(&labels)
        .map_err(|e| RenderError::Template(e.to_string()))
}

/// Replace the mutually exclusive CTA classes on every button container
pub(crate) fn restyle_buttons(el: &mut Element, cta_tag: &str, cta_classes: &[String]) {
    let mut apply = |el: &mut Element| {
        if el.has_class(BUTTON_CONTAINER_CLASS) {
            for class in cta_classes {
                el.remove_class(class);
            }
            el.add_class(cta_tag);
        }
    };
    apply(el);
    el.for_each_mut(&mut apply);
}

fn is_description(el: &Element) -> bool {
    el.is("p") && !el.has_class(BUTTON_CONTAINER_CLASS)
}

fn render_media(record: &SlideRecord, config: &CarouselConfig, optimizer: &dyn ImageOptimizer) -> Option<Element> {
    match record.media.as_ref()? {
        MediaRef::Image(image) => {
            let picture = match &record.alternate {
                Some(alternate) => responsive_picture(
                    optimizer,
                    image,
                    alternate,
                    &config.image_breakpoints,
                    config.mobile_max_width,
                    config.desktop_min_width,
                ),
                None => optimizer.optimized_picture(image, false, &config.image_breakpoints),
            };
            Some(Element::new("div").with_class("carousel-slide-image").with_child(picture))
        }
        MediaRef::Video(video) => Some(video_container(video)),
    }
}

fn render_body(record: &SlideRecord, config: &CarouselConfig) -> Element {
    let mut body = Element::new("div").with_class("carousel-slide-body");
    if let Some(heading) = &record.content.heading {
        body.children.push(heading.clone().into());
    }

    let clamp = config.clamp_descriptions && record.video().is_some();
    let mut clamped = false;
    for el in &record.content.body {
        let mut el = el.clone();
        restyle_buttons(&mut el, &record.cta_tag, &config.cta_classes);
        let toggle = clamp && !clamped && is_description(&el);
        if toggle {
            el.add_class("clamp-text");
            clamped = true;
        }
        body.children.push(el.into());
        if toggle {
            body.children.push(show_more_less().into());
        }
    }
    body
}

/// One `li` per slide record
pub fn render_slide(
    index: usize,
    record: &SlideRecord,
    config: &CarouselConfig,
    optimizer: &dyn ImageOptimizer,
) -> Element {
    let mut li = Element::new("li").with_class(SLIDE_CLASS);
    if record.has_custom_style() {
        for class in record.style_tag.split_whitespace() {
            li.add_class(class);
        }
    }
    if index == 0 {
        li.add_class(ACTIVE_CLASS);
    }
    li.set_attr("data-slide-index", index.to_string());
    for (name, value) in &record.row_attrs {
        if name != "class" {
            li.set_attr(name, value.as_str());
        }
    }

    if let Some(media) = render_media(record, config, optimizer) {
        li.children.push(media.into());
    }
    li.children.push(render_body(record, config).into());
    li
}

fn slides_list(decorated: &DecoratedBlock, config: &CarouselConfig, optimizer: &dyn ImageOptimizer) -> Element {
    let tag: VariantTag = decorated.variant_tag();
    let mut ul = Element::new("ul").with_class(SLIDES_CLASS);
    if let Some(label) = tag.label() {
        ul.add_class(label);
    }
    ul.set_attr("style", format!("--items-per-view: {}", tag.items_per_view()));
    for (index, record) in decorated.slides.iter().enumerate() {
        ul.children.push(render_slide(index, record, config, optimizer).into());
    }
    ul
}

/// Render the block content and the side panel
pub fn render_carousel(
    decorated: DecoratedBlock,
    options: &DecorateOptions,
    optimizer: &dyn ImageOptimizer,
) -> Result<RenderedCarousel, RenderError> {
    let nav = Element::new("div")
        .with_class(NAV_CLASS)
        .with_child(Node::Raw(render_nav_buttons(&options.placeholders)?));

    let container = Element::new("div")
        .with_class(CONTAINER_CLASS)
        .with_child(slides_list(&decorated, &options.config, optimizer))
        .with_child(nav);

    let left_content = if decorated.left_content.is_empty() {
        None
    } else {
        let mut panel = Element::new("div").with_class(LEFT_CONTENT_CLASS);
        for (name, value) in &decorated.left_content_attrs {
            panel.set_attr(name, value.as_str());
        }
        panel.children = decorated.left_content.iter().cloned().map(Node::Element).collect();
        Some(panel)
    };

    Ok(RenderedCarousel {
        container,
        left_content,
        decorated,
    })
}

/// Markup in, markup out: parse a serialized block (and optional preceding
/// sibling), decorate it and render the result.
pub fn decorate_markup(
    block_xhtml: &str,
    sibling_xhtml: Option<&str>,
    in_wide_container: bool,
    options: &DecorateOptions,
) -> Result<RenderedCarousel, DecorateError> {
    let block = parse_block_with_sibling(block_xhtml, sibling_xhtml)?.in_wide_container(in_wide_container);
    let decorated = decorate(block, &options.config);
    let optimizer = EdsImageOptimizer::new(options.page_url.as_deref());
    Ok(render_carousel(decorated, options, &optimizer)?)
}
