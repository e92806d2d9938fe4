//! Optimized and responsive pictures
//!
//! The image service serves renditions of any media path through query
//! parameters (`?width=750&format=webply&optimize=medium`). A picture gets
//! one webp `source` per breakpoint, an original-format `source` per
//! non-final breakpoint, and an original-format `img` fallback.

use crate::models::{Element, ImageBreakpoint, ImageRef};
use url::Url;

const DEFAULT_BASE: &str = "http://localhost/";

/// Turns an image reference into a `picture` element
pub trait ImageOptimizer {
    fn optimized_picture(&self, image: &ImageRef, eager: bool, breakpoints: &[ImageBreakpoint]) -> Element;
}

/// Optimizer for the site's built-in image delivery
#[derive(Clone, Debug)]
pub struct EdsImageOptimizer {
    base: Option<Url>,
}

impl Default for EdsImageOptimizer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl EdsImageOptimizer {
    /// `page_url` resolves relative sources; an unparsable URL falls back to a neutral base
    pub fn new(page_url: Option<&str>) -> Self {
        let base = page_url
            .and_then(|u| Url::parse(u).ok())
            .or_else(|| Url::parse(DEFAULT_BASE).ok());
        Self { base }
    }

    fn pathname(&self, src: &str) -> String {
        match self.base.as_ref().and_then(|base| base.join(src).ok()) {
            Some(url) => url.path().to_string(),
            None => src.split(['?', '#']).next().unwrap_or(src).to_string(),
        }
    }
}

fn extension(pathname: &str) -> &str {
    pathname.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}

impl ImageOptimizer for EdsImageOptimizer {
    fn optimized_picture(&self, image: &ImageRef, eager: bool, breakpoints: &[ImageBreakpoint]) -> Element {
        let pathname = self.pathname(&image.src);
        let ext = extension(&pathname);
        let mut picture = Element::new("picture");

        for bp in breakpoints {
            let mut source = Element::new("source");
            if let Some(media) = &bp.media {
                source.set_attr("media", media.as_str());
            }
            source.set_attr("type", "image/webp");
            source.set_attr("srcset", format!("{}?width={}&format=webply&optimize=medium", pathname, bp.width));
            picture.children.push(source.into());
        }

        for (i, bp) in breakpoints.iter().enumerate() {
            let rendition = format!("{}?width={}&format={}&optimize=medium", pathname, bp.width, ext);
            if i + 1 < breakpoints.len() {
                let mut source = Element::new("source");
                if let Some(media) = &bp.media {
                    source.set_attr("media", media.as_str());
                }
                source.set_attr("srcset", rendition);
                picture.children.push(source.into());
            } else {
                let img = Element::new("img")
                    .with_attr("loading", if eager { "eager" } else { "lazy" })
                    .with_attr("alt", image.alt.as_str())
                    .with_attr("src", rendition);
                picture.children.push(img.into());
            }
        }

        picture
    }
}

/// Merge a primary and an alternate (small viewport) picture into one:
/// the alternate's first source, then every primary source restricted to
/// wide viewports, then the primary fallback `img`.
pub fn responsive_picture(
    optimizer: &dyn ImageOptimizer,
    primary: &ImageRef,
    alternate: &ImageRef,
    breakpoints: &[ImageBreakpoint],
    mobile_max_width: u32,
    desktop_min_width: u32,
) -> Element {
    let desktop = optimizer.optimized_picture(primary, false, breakpoints);
    let mobile = optimizer.optimized_picture(alternate, false, breakpoints);
    let mut picture = Element::new("picture");

    if let Some(source) = mobile.children_by_tag("source").next() {
        let mut source = source.clone();
        source.set_attr("media", format!("(max-width: {}px)", mobile_max_width));
        picture.children.push(source.into());
    }

    let desktop_query = format!("(min-width: {}px)", desktop_min_width);
    for source in desktop.children_by_tag("source") {
        let mut source = source.clone();
        let media = match source.attr("media") {
            Some(existing) => format!("{} and {}", desktop_query, existing),
            None => desktop_query.clone(),
        };
        source.set_attr("media", media);
        picture.children.push(source.into());
    }

    if let Some(img) = desktop.children_by_tag("img").next() {
        picture.children.push(img.clone().into());
    }

    picture
}
