//! Row classification and slide extraction
//!
//! Columns are positional: media, content, style keyword, CTA keyword and an
//! optional small-viewport image. `parse_row` turns one authored row into a
//! `SlideRecord` without touching any live view.

use crate::models::{
    AuthoredRow, CarouselConfig, Element, ImageRef, MediaRef, SlideContent, SlideRecord, VariantTag, VideoRef,
    DEFAULT_TAG,
};
use super::detect::row_variant;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a row is not a slide
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIssue {
    #[error("row has {found} columns, at least {required} required")]
    TooFewColumns { found: usize, required: usize },

    #[error("first column has no image or video")]
    MissingMedia,
}

/// What a row turns into
#[derive(Debug, Clone, PartialEq)]
pub enum RowClass {
    /// The row only declares a display variant
    Variant(VariantTag),
    Slide(SlideRecord),
    /// Non-slide content moved to the side panel
    Ancillary(Vec<Element>),
    /// Non-slide media row; dropped so no detached media leaks out of the carousel
    Dropped(ParseIssue),
}

/// Classify one row. Stateless; order is preserved by the caller.
pub fn classify_row(row: &AuthoredRow, config: &CarouselConfig) -> RowClass {
    if let Some(tag) = row_variant(row) {
        return RowClass::Variant(tag);
    }

    match parse_row(row, config) {
        Ok(record) => RowClass::Slide(record),
        Err(issue) if row.contains_image() => RowClass::Dropped(issue),
        Err(_) => RowClass::Ancillary(row.element.child_elements().cloned().collect()),
    }
}

/// Extract a slide record from a row that qualifies as a slide
pub fn parse_row(row: &AuthoredRow, config: &CarouselConfig) -> Result<SlideRecord, ParseIssue> {
    let columns = row.columns();
    if columns.len() < config.min_columns {
        return Err(ParseIssue::TooFewColumns {
            found: columns.len(),
            required: config.min_columns,
        });
    }

    let Some(first) = columns.first() else {
        return Err(ParseIssue::MissingMedia);
    };
    let media = extract_media(first).ok_or(ParseIssue::MissingMedia)?;

    Ok(SlideRecord {
        media: Some(media),
        alternate: columns.get(4).and_then(|col| extract_image(col)),
        content: columns.get(1).map(|col| extract_content(col)).unwrap_or_default(),
        style_tag: columns.get(2).map(|col| keyword(col)).unwrap_or_else(|| DEFAULT_TAG.to_string()),
        cta_tag: columns.get(3).map(|col| keyword(col)).unwrap_or_else(|| DEFAULT_TAG.to_string()),
        row_attrs: row.element.attrs.clone(),
    })
}

/// Image first, then video links, then a bare URL
pub fn extract_media(column: &Element) -> Option<MediaRef> {
    if let Some(image) = extract_image(column) {
        return Some(MediaRef::Image(image));
    }
    extract_video_url(column).map(|url| MediaRef::Video(VideoRef::new(url)))
}

pub fn extract_image(column: &Element) -> Option<ImageRef> {
    let img = if column.is("img") {
        Some(column)
    } else {
        column.find_first(&|el| el.is("img"))
    }?;
    let src = img.attr("src").filter(|s| !s.trim().is_empty())?;
    Some(ImageRef {
        src: src.to_string(),
        alt: img.attr("alt").unwrap_or("").to_string(),
    })
}

fn is_video_href(href: &str) -> bool {
    href.ends_with(".mp4") || href.contains(".m3u8")
}

pub fn extract_video_url(column: &Element) -> Option<String> {
    let anchor = column.find_first(&|el| el.is("a") && el.attr("href").map_or(false, is_video_href));
    if let Some(href) = anchor.and_then(|a| a.attr("href")) {
        return Some(href.to_string());
    }

    let text = column.text_content();
    let text = text.trim();
    if text.starts_with("http") {
        return Some(text.to_string());
    }
    None
}

/// Style and CTA keywords: first paragraph, else the column text; empty means default
pub fn keyword(column: &Element) -> String {
    let text = match column.find_first(&|el| el.is("p")) {
        Some(p) => p.text_content(),
        None => column.text_content(),
    };
    let text = text.trim();
    if text.is_empty() {
        DEFAULT_TAG.to_string()
    } else {
        text.to_string()
    }
}

fn is_heading(el: &Element) -> bool {
    matches!(el.tag.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

fn is_button(el: &Element) -> bool {
    el.has_class("button-container")
}

/// Heading plus body. Without an authored heading, a leading plain paragraph
/// is promoted to an `h4`.
pub fn extract_content(column: &Element) -> SlideContent {
    let mut body: Vec<Element> = column.child_elements().cloned().collect();

    if let Some(pos) = body.iter().position(is_heading) {
        let heading = body.remove(pos);
        return SlideContent {
            heading: Some(heading),
            body,
        };
    }

    let promote = body
        .first()
        .map_or(false, |first| first.is("p") && !is_button(first) && !first.text_content().trim().is_empty());
    if promote {
        let first = body.remove(0);
        let heading = Element::new("h4").with_text(first.text_content().trim());
        return SlideContent {
            heading: Some(heading),
            body,
        };
    }

    // bare text column
    let text = column.text_content();
    if body.is_empty() && !text.trim().is_empty() {
        return SlideContent {
            heading: Some(Element::new("h4").with_text(text.trim())),
            body,
        };
    }

    SlideContent { heading: None, body }
}
