//! HTML serialization of the markup tree

use crate::models::{Element, Node};
use quick_xml::escape::escape;

const VOID_ELEMENTS: [&str; 8] = ["img", "source", "br", "hr", "input", "meta", "link", "wbr"];

pub fn element_to_html(element: &Element) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Element(el) => write_element(el, out),
        Node::Text(text) => out.push_str(&escape(text.as_str())),
        Node::Raw(html) => out.push_str(html),
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&el.tag.as_str()) {
        return;
    }

    for child in &el.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaping_and_void_elements() {
        let el = Element::new("p")
            .with_attr("title", "Fish & \"Chips\"")
            .with_text("a < b")
            .with_child(Element::new("br"));
        assert_eq!(
            element_to_html(&el),
            r#"<p title="Fish &amp; &quot;Chips&quot;">a &lt; b<br></p>"#
        );
    }

    #[test]
    fn test_raw_is_verbatim() {
        let el = Element::new("div").with_child(Node::Raw("<button>x</button>".into()));
        assert_eq!(element_to_html(&el), "<div><button>x</button></div>");
    }
}
