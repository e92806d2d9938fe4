//! Carousel display variants

use serde::{Deserialize, Serialize};

/// Named display mode declared by the author
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VariantTag {
    SingleSlide,
    MultiSlide,
    #[default]
    Unset,
}

/// How many slides the rotation shows at once
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    /// A contiguous, wrapping window of `slides_to_show` slides starting at the active one
    Windowed { slides_to_show: usize },
    /// Only the active slide is visible
    SingleActive,
}

impl VariantTag {
    /// Literal labels, in scan order
    pub const LABELS: [(&'static str, VariantTag); 2] = [
        ("single-slide-carousel", VariantTag::SingleSlide),
        ("multislide-carousel", VariantTag::MultiSlide),
    ];

    /// Match an authored label exactly (after trimming)
    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::LABELS
            .iter()
            .find(|(label, _)| *label == text)
            .map(|(_, tag)| *tag)
    }

    pub fn label(self) -> Option<&'static str> {
        match self {
            VariantTag::SingleSlide => Some("single-slide-carousel"),
            VariantTag::MultiSlide => Some("multislide-carousel"),
            VariantTag::Unset => None,
        }
    }

    pub fn is_set(self) -> bool {
        self != VariantTag::Unset
    }

    /// Value of the `--items-per-view` custom property on the slides list
    pub fn items_per_view(self) -> usize {
        match self {
            VariantTag::SingleSlide => 1,
            VariantTag::MultiSlide => 5,
            VariantTag::Unset => 2,
        }
    }

    /// Rotation mode for this variant
    pub fn display_mode(self, slides_to_show: usize) -> DisplayMode {
        match self {
            VariantTag::SingleSlide => DisplayMode::SingleActive,
            _ => DisplayMode::Windowed { slides_to_show },
        }
    }

    /// Only the single-slide variant rotates on its own
    pub fn autoplays(self) -> bool {
        self == VariantTag::SingleSlide
    }
}

impl DisplayMode {
    pub fn slides_to_show(self) -> usize {
        match self {
            DisplayMode::Windowed { slides_to_show } => slides_to_show,
            DisplayMode::SingleActive => 1,
        }
    }
}
