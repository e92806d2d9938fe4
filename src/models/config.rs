//! Decorator configuration
//!
//! Every field has a default matching the production block, so an empty
//! JS object (or `{}` JSON) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tunables for classification, rendering and the rotation engine
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselConfig {
    /// Minimum number of columns for a row to be considered a slide
    pub min_columns: usize,

    /// Autoplay period for the single-slide variant (milliseconds)
    pub autoplay_period_ms: u32,

    /// Fraction of a video that must be visible to start loading it
    pub visibility_threshold: f64,

    /// Alternate (mobile) media applies up to this width (pixels)
    pub mobile_max_width: u32,

    /// Primary media applies from this width (pixels)
    pub desktop_min_width: u32,

    /// Ancestors that widen the window to `wide_slides_to_show`
    pub wide_container_selector: String,

    /// Window size for the windowed variants
    pub slides_to_show: usize,

    /// Window size inside a wide container
    pub wide_slides_to_show: usize,

    /// CTA classes that are mutually exclusive with the authored CTA style
    pub cta_classes: Vec<String>,

    /// Renditions requested from the image optimizer; the last one is the `img` fallback
    pub image_breakpoints: Vec<ImageBreakpoint>,

    /// Client library used when the browser cannot play manifests natively
    pub streaming_library_url: String,

    /// Delay before the single playback retry (milliseconds)
    pub play_retry_delay_ms: u32,

    /// Add a show more / show less toggle to video descriptions
    pub clamp_descriptions: bool,

    /// Destroy the controller automatically once the block leaves the document
    pub watch_detach: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            min_columns: 4,
            autoplay_period_ms: 3000,
            visibility_threshold: 0.1,
            mobile_max_width: 767,
            desktop_min_width: 768,
            wide_container_selector: ".fixed-width-container, .bg-black-3, #keyHighlights, .overview".to_string(),
            slides_to_show: 4,
            wide_slides_to_show: 5,
            cta_classes: ["default", "cta-button", "cta-button-secondary", "cta-button-dark", "cta-default"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            image_breakpoints: vec![ImageBreakpoint { media: None, width: 750 }],
            streaming_library_url: "https://cdn.jsdelivr.net/npm/hls.js@latest".to_string(),
            play_retry_delay_ms: 100,
            clamp_descriptions: true,
            watch_detach: false,
        }
    }
}

impl CarouselConfig {
    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Window size for a non-single variant
    pub fn window_size(&self, in_wide_container: bool) -> usize {
        if in_wide_container {
            self.wide_slides_to_show
        } else {
            self.slides_to_show
        }
    }
}

/// One rendition of an optimized picture
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ImageBreakpoint {
    /// Media query, e.g. `(min-width: 600px)`
    #[serde(default)]
    pub media: Option<String>,
    pub width: u32,
}

/// Everything a caller can pass to the decorator
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct DecorateOptions {
    pub config: CarouselConfig,
    pub placeholders: Placeholders,
    /// Base for resolving relative media URLs
    pub page_url: Option<String>,
}

/// Localized UI labels
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(transparent)]
pub struct Placeholders {
    entries: HashMap<String, String>,
}

#[derive(Deserialize)]
struct PlaceholderSheet {
    data: Vec<PlaceholderRow>,
}

#[derive(Deserialize)]
struct PlaceholderRow {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Text")]
    text: String,
}

impl Placeholders {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Build from a placeholders sheet (`{"data": [{"Key": "Previous Slide", "Text": "..."}]}`).
    /// Keys are camelCased the same way the site runtime does it.
    pub fn from_sheet_json(json: &str) -> Result<Self, serde_json::Error> {
        let sheet: PlaceholderSheet = serde_json::from_str(json)?;
        let entries = sheet
            .data
            .into_iter()
            .map(|row| (to_camel_case(&row.key), row.text))
            .collect();
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get(key).unwrap_or(fallback)
    }
}

/// "Previous Slide" -> "previousSlide"
fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let words = key
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty());
    for (i, word) in words.enumerate() {
        let lower = word.to_ascii_lowercase();
        if i == 0 {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}
