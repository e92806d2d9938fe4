//! Video slide markup
//!
//! Videos are emitted unloaded: the real URL sits in a placeholder attribute
//! (`data-src` on the `source`, or `data-hls-src` on the video for manifests)
//! until the controller decides to load it.

use crate::models::{Element, VideoKind, VideoRef};

pub const PROGRESS_BAR_CLASS: &str = "progress-bar";

/// A muted, inline, non-preloading video with its placeholder source
pub fn video_element(video: &VideoRef) -> Element {
    let mut el = Element::new("video")
        .with_attr("muted", "muted")
        .with_attr("playsinline", "true")
        .with_attr("preload", "none")
        .with_class("video-element")
        .with_class("lazy-load");

    match video.kind {
        VideoKind::Adaptive => el.set_attr("data-hls-src", video.url.as_str()),
        VideoKind::Progressive => {
            let source = Element::new("source")
                .with_attr("data-src", video.url.as_str())
                .with_attr("type", "video/mp4");
            el.children.push(source.into());
        }
    }
    el
}

pub fn progress_bar() -> Element {
    Element::new("div").with_class("progress-bar-container").with_child(
        Element::new("div")
            .with_class("progress")
            .with_class(PROGRESS_BAR_CLASS)
            .with_attr("style", "width: 0%"),
    )
}

/// `div.video-container` holding the video and its progress bar
pub fn video_container(video: &VideoRef) -> Element {
    Element::new("div")
        .with_class("video-container")
        .with_child(video_element(video))
        .with_child(progress_bar())
}

/// Toggle pair for a clamped description
pub fn show_more_less() -> Element {
    Element::new("div")
        .with_class("show-more-container")
        .with_child(
            Element::new("span")
                .with_class("show-more")
                .with_attr("style", "display: inline")
                .with_text("Show more"),
        )
        .with_child(
            Element::new("span")
                .with_class("show-less")
                .with_attr("style", "display: none")
                .with_text("Show less"),
        )
}
