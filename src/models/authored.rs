//! Authored block snapshot
//!
//! The document pipeline hands every block over as a root `div` whose
//! children are rows and whose rows' `div` children are columns. The
//! decorator only reads this snapshot; it never holds live view nodes.

use serde::{Deserialize, Serialize};
use super::markup::{Element, Node};

/// Label of the authoring sibling that may carry a variant paragraph
pub const DEFAULT_CONTENT_WRAPPER: &str = "default-content-wrapper";

/// One authored row (a direct child of the block root)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AuthoredRow {
    pub element: Element,
}

impl AuthoredRow {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    /// Build a row of `div` columns from column children
    pub fn from_columns(columns: Vec<Element>) -> Self {
        let mut row = Element::new("div");
        row.children = columns.into_iter().map(Node::Element).collect();
        Self { element: row }
    }

    /// The row's columns: its direct `div` children, in order
    pub fn columns(&self) -> Vec<&Element> {
        self.element.children_by_tag("div").collect()
    }

    pub fn column(&self, index: usize) -> Option<&Element> {
        self.element.children_by_tag("div").nth(index)
    }

    pub fn text(&self) -> String {
        self.element.text_content()
    }

    pub fn contains_image(&self) -> bool {
        self.element.contains_image()
    }
}

/// The block root plus the surrounding context the decorator consults
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct AuthoredBlock {
    /// Classes on the block root
    pub classes: Vec<String>,
    pub rows: Vec<AuthoredRow>,
    /// The preceding `default-content-wrapper` sibling, if any
    pub sibling: Option<Element>,
    /// True when the block sits inside one of the wide layout containers
    pub in_wide_container: bool,
}

impl AuthoredBlock {
    pub fn new(rows: Vec<AuthoredRow>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn with_sibling(mut self, sibling: Element) -> Self {
        self.sibling = Some(sibling);
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn in_wide_container(mut self, wide: bool) -> Self {
        self.in_wide_container = wide;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}
