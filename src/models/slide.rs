//! Typed slide records extracted from authored rows

use serde::{Deserialize, Serialize};
use super::markup::Element;

/// Style keyword used when a style/CTA column is absent or empty
pub const DEFAULT_TAG: &str = "default";

/// An image reference (the `img` inside an authored `picture`)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

/// How a video reference is fetched
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoKind {
    /// A single progressive file (mp4)
    Progressive,
    /// An adaptive-streaming manifest (m3u8)
    Adaptive,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VideoRef {
    pub url: String,
    pub kind: VideoKind,
}

impl VideoRef {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = if url.contains(".m3u8") {
            VideoKind::Adaptive
        } else {
            VideoKind::Progressive
        };
        Self { url, kind }
    }
}

/// Media found in a slide's first column
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum MediaRef {
    Image(ImageRef),
    Video(VideoRef),
}

impl MediaRef {
    pub fn as_video(&self) -> Option<&VideoRef> {
        match self {
            MediaRef::Video(v) => Some(v),
            MediaRef::Image(_) => None,
        }
    }
}

/// Heading plus body markup of a slide
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct SlideContent {
    pub heading: Option<Element>,
    pub body: Vec<Element>,
}

impl SlideContent {
    pub fn is_empty(&self) -> bool {
        self.heading.is_none() && self.body.is_empty()
    }
}

/// One navigable slide, detached from the view tree
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SlideRecord {
    pub media: Option<MediaRef>,
    /// Small-viewport image shown below the mobile breakpoint
    pub alternate: Option<ImageRef>,
    pub content: SlideContent,
    pub style_tag: String,
    pub cta_tag: String,
    /// Attributes of the authored row (editor instrumentation)
    pub row_attrs: Vec<(String, String)>,
}

impl SlideRecord {
    pub fn video(&self) -> Option<&VideoRef> {
        self.media.as_ref().and_then(MediaRef::as_video)
    }

    pub fn has_custom_style(&self) -> bool {
        self.style_tag != DEFAULT_TAG
    }
}
