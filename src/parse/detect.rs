//! Variant detection
//!
//! Authors declare the display variant in one of several places depending on
//! the editing surface. Each place is a `Detector`; detectors run in priority
//! order and the first hit wins. The declaring paragraph, row or marker is
//! then consumed so it never renders as content.

use crate::models::{AuthoredBlock, AuthoredRow, Element, VariantTag};
use serde::{Deserialize, Serialize};

/// Attribute value marking the editor's variant property element
pub const VARIANT_PROPERTY: &str = "carouselVariant";

/// Where a variant declaration was found
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Detector {
    /// A paragraph in the `default-content-wrapper` just before the block
    SiblingBlock,
    /// The block's first row
    FirstRow,
    /// An element tagged `data-aue-prop="carouselVariant"` anywhere in the block
    PropertyElement,
    /// A label class already present on the block root
    BlockClass,
}

/// What has to be removed once a detection is accepted
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    /// The n-th `p` (document order) of the sibling wrapper
    SiblingParagraph { index: usize },
    /// A whole row
    Row { index: usize },
    /// The property marker inside a row
    PropertyMarker { row: usize },
    Nothing,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Detection {
    pub tag: VariantTag,
    pub source: Detector,
    pub removal: Removal,
}

/// Changes the live sibling wrapper needs after detection
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SiblingUpdate {
    /// Index (among the wrapper's `p` descendants) of the paragraph to remove
    pub paragraph_index: Option<usize>,
    /// The wrapper has no text left and is removed as well
    pub remove_wrapper: bool,
}

/// Result of running the detector chain
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct VariantOutcome {
    pub tag: VariantTag,
    pub source: Option<Detector>,
    pub sibling: SiblingUpdate,
}

impl Detector {
    /// Priority order
    pub const CHAIN: [Detector; 4] = [
        Detector::SiblingBlock,
        Detector::FirstRow,
        Detector::PropertyElement,
        Detector::BlockClass,
    ];

    /// Pure lookup; nothing is removed here
    pub fn detect(self, block: &AuthoredBlock) -> Option<Detection> {
        match self {
            Detector::SiblingBlock => {
                let sibling = block.sibling.as_ref()?;
                sibling
                    .find_all(&|el| el.is("p"))
                    .iter()
                    .enumerate()
                    .find_map(|(index, p)| {
                        VariantTag::from_label(&p.text_content()).map(|tag| Detection {
                            tag,
                            source: self,
                            removal: Removal::SiblingParagraph { index },
                        })
                    })
            }
            Detector::FirstRow => {
                let row = block.rows.first()?;
                row_variant(row).map(|tag| Detection {
                    tag,
                    source: self,
                    removal: Removal::Row { index: 0 },
                })
            }
            Detector::PropertyElement => block.rows.iter().enumerate().find_map(|(index, row)| {
                let marker = row.element.find_first(&is_property_marker)?;
                VariantTag::from_label(&marker.text_content()).map(|tag| Detection {
                    tag,
                    source: self,
                    removal: Removal::PropertyMarker { row: index },
                })
            }),
            Detector::BlockClass => VariantTag::LABELS
                .iter()
                .find(|(label, _)| block.has_class(label))
                .map(|(_, tag)| Detection {
                    tag: *tag,
                    source: self,
                    removal: Removal::Nothing,
                }),
        }
    }
}

/// A row declares a variant when one of its paragraphs, or its whole text, is a label
pub fn row_variant(row: &AuthoredRow) -> Option<VariantTag> {
    row.element
        .find_all(&|el| el.is("p"))
        .iter()
        .find_map(|p| VariantTag::from_label(&p.text_content()))
        .or_else(|| VariantTag::from_label(&row.text()))
}

fn is_property_marker(el: &Element) -> bool {
    el.attr("data-aue-prop") == Some(VARIANT_PROPERTY)
}

/// Run the chain, consume the winning declaration and strip leftover markers
pub fn detect_variant(block: &mut AuthoredBlock) -> VariantOutcome {
    let detection = Detector::CHAIN.iter().find_map(|detector| detector.detect(block));

    let mut outcome = VariantOutcome::default();
    if let Some(found) = detection {
        log::debug!("variant {:?} declared via {:?}", found.tag, found.source);
        outcome.tag = found.tag;
        outcome.source = Some(found.source);
        match found.removal {
            Removal::SiblingParagraph { index } => {
                outcome.sibling = consume_sibling_paragraph(block, index);
            }
            Removal::Row { index } => {
                block.rows.remove(index);
            }
            // leftover-marker pass below removes it
            Removal::PropertyMarker { .. } | Removal::Nothing => {}
        }
    }

    strip_property_markers(block);
    outcome
}

fn consume_sibling_paragraph(block: &mut AuthoredBlock, index: usize) -> SiblingUpdate {
    let Some(sibling) = block.sibling.as_mut() else {
        return SiblingUpdate::default();
    };

    let mut seen = 0usize;
    remove_nth_paragraph(sibling, index, &mut seen);

    let remove_wrapper = sibling.text_content().trim().is_empty();
    if remove_wrapper {
        block.sibling = None;
    }
    SiblingUpdate {
        paragraph_index: Some(index),
        remove_wrapper,
    }
}

fn remove_nth_paragraph(el: &mut Element, target: usize, seen: &mut usize) -> bool {
    let mut i = 0;
    while i < el.children.len() {
        if let Some(child) = el.children[i].as_element_mut() {
            if child.is("p") {
                if *seen == target {
                    el.children.remove(i);
                    return true;
                }
                *seen += 1;
            }
            if remove_nth_paragraph(child, target, seen) {
                return true;
            }
        }
        i += 1;
    }
    false
}

/// Variant markers are authoring metadata, never content. A row left blank by
/// the removal goes with it.
fn strip_property_markers(block: &mut AuthoredBlock) {
    block.rows.retain_mut(|row| {
        let mut touched = false;
        while row.element.remove_first(&is_property_marker) {
            touched = true;
        }
        !(touched && row.element.is_blank())
    });
}
