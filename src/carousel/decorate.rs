//! Block decoration
//!
//! Runs variant detection once, then classifies every remaining row in order.
//! The result is a plain value; rendering and mounting happen elsewhere.

use crate::models::{AuthoredBlock, CarouselConfig, DisplayMode, Element, SlideRecord, VariantTag};
use crate::parse::{classify_row, detect_variant, ParseIssue, RowClass, VariantOutcome};
use serde::{Deserialize, Serialize};

/// Everything the renderers and the controller need from one block
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DecoratedBlock {
    pub variant: VariantOutcome,
    pub slides: Vec<SlideRecord>,
    /// Columns of every ancillary row, in row order
    pub left_content: Vec<Element>,
    /// Non-class attributes of the ancillary rows; later rows win
    #[serde(default)]
    pub left_content_attrs: Vec<(String, String)>,
    /// Media rows that did not qualify as slides
    pub dropped: Vec<ParseIssue>,
    pub mode: DisplayMode,
}

impl DecoratedBlock {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn variant_tag(&self) -> VariantTag {
        self.variant.tag
    }
}

/// Classify and extract. Never fails: malformed rows degrade to side content or are dropped.
pub fn decorate(mut block: AuthoredBlock, config: &CarouselConfig) -> DecoratedBlock {
    let mut variant = detect_variant(&mut block);

    let mut slides = Vec::new();
    let mut left_content = Vec::new();
    let mut left_content_attrs: Vec<(String, String)> = Vec::new();
    let mut dropped = Vec::new();

    for row in &block.rows {
        match classify_row(row, config) {
            RowClass::Variant(tag) => {
                // source stays None: declared by a row the chain did not look at
                if !variant.tag.is_set() {
                    variant.tag = tag;
                }
            }
            RowClass::Slide(record) => slides.push(record),
            RowClass::Ancillary(columns) => {
                left_content.extend(columns);
                for (name, value) in row.element.attrs.iter().filter(|(name, _)| name != "class") {
                    match left_content_attrs.iter_mut().find(|(existing, _)| existing == name) {
                        Some(entry) => entry.1 = value.clone(),
                        None => left_content_attrs.push((name.clone(), value.clone())),
                    }
                }
            }
            RowClass::Dropped(issue) => {
                log::debug!("dropping media row: {}", issue);
                dropped.push(issue);
            }
        }
    }

    let mode = variant.tag.display_mode(config.window_size(block.in_wide_container));
    log::debug!(
        "decorated carousel: {} slides, {} side elements, {} dropped, mode {:?}",
        slides.len(),
        left_content.len(),
        dropped.len(),
        mode
    );

    DecoratedBlock {
        variant,
        slides,
        left_content,
        left_content_attrs,
        dropped,
        mode,
    }
}
