//! Markup snapshot parser
//!
//! Converts a serialized DOM subtree (XHTML, as produced by `XMLSerializer`
//! in the browser or written by hand in fixtures) into the model tree
//! using roxmltree.

use crate::models::{AuthoredBlock, AuthoredRow, Element, Node, DEFAULT_CONTENT_WRAPPER};
use roxmltree::Document as XmlDocument;
use thiserror::Error;

/// Snapshot parsing failures
#[derive(Debug, Clone, Error)]
pub enum MarkupError {
    /// Markup is not well-formed
    #[error("Invalid markup: {0}")]
    InvalidXml(String),
}

/// Parse a single serialized element (and its subtree)
pub fn parse_fragment(xhtml: &str) -> Result<Element, MarkupError> {
    let doc = XmlDocument::parse(xhtml).map_err(|e| MarkupError::InvalidXml(e.to_string()))?;
    Ok(convert_element(doc.root_element()))
}

/// Parse a serialized block root into an authored snapshot
pub fn parse_block(xhtml: &str) -> Result<AuthoredBlock, MarkupError> {
    let root = parse_fragment(xhtml)?;
    let classes = root.classes().map(str::to_string).collect();
    let rows = root
        .children
        .into_iter()
        .filter_map(|node| match node {
            Node::Element(el) => Some(AuthoredRow::new(el)),
            _ => None,
        })
        .collect();

    Ok(AuthoredBlock {
        classes,
        rows,
        sibling: None,
        in_wide_container: false,
    })
}

/// Parse a block together with its preceding sibling.
///
/// The sibling is only kept when it is a `default-content-wrapper`;
/// any other element cannot declare a variant.
pub fn parse_block_with_sibling(block_xhtml: &str, sibling_xhtml: Option<&str>) -> Result<AuthoredBlock, MarkupError> {
    let mut block = parse_block(block_xhtml)?;
    if let Some(xhtml) = sibling_xhtml {
        let sibling = parse_fragment(xhtml)?;
        if sibling.has_class(DEFAULT_CONTENT_WRAPPER) {
            block.sibling = Some(sibling);
        }
    }
    Ok(block)
}

fn convert_element(node: roxmltree::Node) -> Element {
    let mut element = Element::new(node.tag_name().name().to_ascii_lowercase());
    for attr in node.attributes() {
        element.attrs.push((attr.name().to_string(), attr.value().to_string()));
    }
    for child in node.children() {
        if child.is_element() {
            element.children.push(Node::Element(convert_element(child)));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                element.children.push(Node::Text(text.to_string()));
            }
        }
    }
    element
}
