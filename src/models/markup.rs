//! Minimal markup tree
//!
//! Authored block content and decorated output share this tree. It is
//! produced from a DOM snapshot (see `parse::markup`), inspected by the
//! classification code, and serialized or materialized by the renderers.

use serde::{Deserialize, Serialize};

/// One node of a markup tree
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Pre-rendered HTML inserted verbatim (template output only)
    Raw(String),
}

/// An element with ordered attributes and children
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Concatenated text of this node and its descendants (untrimmed)
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
            Node::Raw(_) => {}
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: set an attribute
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder: add a class
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Builder: append a child node
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder: append a text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(k, _)| k != name);
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if class.is_empty() || self.has_class(class) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr("class", joined);
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let kept: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        let joined = kept.join(" ");
        if joined.is_empty() {
            self.remove_attr("class");
        } else {
            self.set_attr("class", joined);
        }
    }

    /// Direct element children
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Direct element children with the given tag
    pub fn children_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.child_elements().filter(move |el| el.is(tag))
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Depth-first, document-order search over descendants (self excluded)
    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&Element) -> bool) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.walk(pred, &mut found);
        found
    }

    fn walk<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, found: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if pred(child) {
                found.push(child);
            }
            child.walk(pred, found);
        }
    }

    pub fn find_first<'a>(&'a self, pred: &dyn Fn(&Element) -> bool) -> Option<&'a Element> {
        for child in self.child_elements() {
            if pred(child) {
                return Some(child);
            }
            if let Some(hit) = child.find_first(pred) {
                return Some(hit);
            }
        }
        None
    }

    /// Visit every descendant element mutably (self excluded)
    pub fn for_each_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        for child in self.children.iter_mut() {
            if let Node::Element(el) = child {
                f(el);
                el.for_each_mut(f);
            }
        }
    }

    /// Remove the first descendant matching `pred`. Returns true if one was removed.
    pub fn remove_first(&mut self, pred: &dyn Fn(&Element) -> bool) -> bool {
        if let Some(pos) = self
            .children
            .iter()
            .position(|n| n.as_element().map_or(false, |el| pred(el)))
        {
            self.children.remove(pos);
            return true;
        }
        self.children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .any(|el| el.remove_first(pred))
    }

    /// True if the element (or any descendant) is a `picture` or `img`
    pub fn contains_image(&self) -> bool {
        self.is("picture") || self.is("img") || self.find_first(&|el| el.is("picture") || el.is("img")).is_some()
    }

    /// True when nothing but whitespace text remains
    pub fn is_blank(&self) -> bool {
        self.text_content().trim().is_empty() && !self.contains_image()
    }
}
