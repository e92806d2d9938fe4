//! Pull quote
//!
//! Rewrites a quote block into `blockquote > div.quote-quotation +
//! div.quote-attribution`. Fields are found by their editor property first,
//! then by position. A block that already holds a `blockquote` is only
//! normalized in place.

use super::carousel::DecorateError;
use crate::models::{Element, Node};
use crate::parse::parse_fragment;

pub const QUOTATION_CLASS: &str = "quote-quotation";
pub const ATTRIBUTION_CLASS: &str = "quote-attribution";

fn is_field(el: &Element, name: &str) -> bool {
    el.attr("data-richtext-prop") == Some(name) || el.attr("data-aue-prop") == Some(name)
}

fn find_field<'a>(block: &'a Element, name: &str, class: &str) -> Option<&'a Element> {
    block
        .find_first(&|el| is_field(el, name))
        .or_else(|| block.find_first(&|el| el.has_class(class)))
}

/// Paragraphs of the source, else its text as one paragraph, else its children
fn wrap_field(source: &Element, class: &str) -> Element {
    let mut wrapper = Element::new("div").with_class(class);
    let paragraphs = source.find_all(&|el| el.is("p"));
    if !paragraphs.is_empty() {
        wrapper.children = paragraphs.into_iter().cloned().map(Node::Element).collect();
        return wrapper;
    }
    let text = source.text_content();
    let text = text.trim();
    if text.is_empty() {
        wrapper.children = source.children.clone();
    } else {
        wrapper.children.push(Element::new("p").with_text(text).into());
    }
    wrapper
}

/// `em` becomes `cite`, keeping its content
fn emphasis_to_cite(el: &mut Element) {
    el.for_each_mut(&mut |child: &mut Element| {
        if child.is("em") {
            child.tag = "cite".to_string();
            child.attrs.clear();
        }
    });
}

fn build_blockquote(block: &Element) -> Element {
    let rows: Vec<&Element> = block.child_elements().collect();
    let quotation = find_field(block, "quotation", QUOTATION_CLASS).or_else(|| rows.first().copied());
    let attribution = find_field(block, "attribution", ATTRIBUTION_CLASS).or_else(|| rows.get(1).copied());

    let mut blockquote = Element::new("blockquote");
    if let Some(quotation) = quotation {
        blockquote.children.push(wrap_field(quotation, QUOTATION_CLASS).into());
    }
    if let Some(attribution) = attribution {
        let mut wrapper = wrap_field(attribution, ATTRIBUTION_CLASS);
        emphasis_to_cite(&mut wrapper);
        blockquote.children.push(wrapper.into());
    }
    blockquote
}

/// Tag the property-marked fields of an existing blockquote
fn normalize_blockquote(blockquote: &mut Element) {
    for (name, class) in [("quotation", QUOTATION_CLASS), ("attribution", ATTRIBUTION_CLASS)] {
        let tagged = blockquote.find_first(&|el| el.has_class(class)).is_some();
        let mut done = tagged;
        blockquote.for_each_mut(&mut |el: &mut Element| {
            if !done && is_field(el, name) {
                el.set_attr("class", class);
                done = true;
            }
        });
    }
    blockquote.for_each_mut(&mut |el: &mut Element| {
        if el.has_class(ATTRIBUTION_CLASS) {
            emphasis_to_cite(el);
        }
    });
}

/// The block root with its new content
pub fn render_quote(block: &Element) -> Element {
    let mut out = block.clone();
    if block.find_first(&|el| el.is("blockquote")).is_some() {
        let mut normalized = false;
        out.for_each_mut(&mut |el: &mut Element| {
            if !normalized && el.is("blockquote") {
                normalize_blockquote(el);
                normalized = true;
            }
        });
        return out;
    }
    out.children = vec![build_blockquote(block).into()];
    out
}

pub fn decorate_quote_markup(block_xhtml: &str) -> Result<Element, DecorateError> {
    let block = parse_fragment(block_xhtml)?;
    Ok(render_quote(&block))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emphasis_becomes_cite() {
        let mut el = Element::new("div").with_child(
            Element::new("p").with_child(Element::new("em").with_attr("class", "x").with_text("The Times")),
        );
        emphasis_to_cite(&mut el);
        let cite = el.find_first(&|e| e.is("cite")).unwrap();
        assert_eq!(cite.text_content(), "The Times");
        assert!(cite.attrs.is_empty());
    }

    #[test]
    fn test_bare_text_is_wrapped_in_paragraph() {
        let source = Element::new("div").with_text("  Time is the fire  ");
        let wrapped = wrap_field(&source, QUOTATION_CLASS);
        assert_eq!(wrapped.attr("class"), Some(QUOTATION_CLASS));
        let p = wrapped.child_elements().next().unwrap();
        assert!(p.is("p"));
        assert_eq!(p.text_content(), "Time is the fire");
    }
}
