//! DOM plumbing for the browser binding
//!
//! Snapshots live nodes into the markup model, materializes rendered
//! `Element` trees back into the document and wraps event listeners in a
//! guard that unregisters on drop.

use crate::models::{Element, Node};
use crate::parse::SiblingUpdate;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Event, EventTarget};

/// Serialize a live element as XHTML for the snapshot parser
pub fn snapshot(element: &web_sys::Element) -> Result<String, JsValue> {
    let serializer = web_sys::XmlSerializer::new()?;
    serializer.serialize_to_string(element)
}

/// The content wrapper authored just before the block, if any
pub fn preceding_wrapper(block: &web_sys::Element) -> Option<web_sys::Element> {
    block.previous_element_sibling()
}

/// True when the block sits inside one of the wide containers
pub fn in_wide_container(block: &web_sys::Element, selector: &str) -> bool {
    matches!(block.closest(selector), Ok(Some(_)))
}

/// Build live nodes for a rendered tree
pub fn materialize(document: &Document, element: &Element) -> Result<web_sys::Element, JsValue> {
    let el = document.create_element(&element.tag)?;
    for (name, value) in &element.attrs {
        el.set_attribute(name, value)?;
    }
    for child in &element.children {
        match child {
            Node::Element(child) => {
                let node = materialize(document, child)?;
                el.append_child(&node)?;
            }
            Node::Text(text) => {
                el.append_child(&document.create_text_node(text))?;
            }
            Node::Raw(html) => el.insert_adjacent_html("beforeend", html)?,
        }
    }
    Ok(el)
}

/// Replace all children of `target` with `content`
pub fn replace_children(target: &web_sys::Element, content: &web_sys::Element) -> Result<(), JsValue> {
    target.set_inner_html("");
    target.append_child(content)?;
    Ok(())
}

/// Replace the children of `target` with live copies of `content`'s children
pub fn replace_content(document: &Document, target: &web_sys::Element, content: &Element) -> Result<(), JsValue> {
    target.set_inner_html("");
    for child in &content.children {
        match child {
            Node::Element(child) => {
                let node = materialize(document, child)?;
                target.append_child(&node)?;
            }
            Node::Text(text) => {
                target.append_child(&document.create_text_node(text))?;
            }
            Node::Raw(html) => target.insert_adjacent_html("beforeend", html)?,
        }
    }
    Ok(())
}

/// Remove the consumed variant paragraph (and the wrapper itself once empty)
pub fn apply_sibling_update(wrapper: &web_sys::Element, update: &SiblingUpdate) -> Result<(), JsValue> {
    if update.remove_wrapper {
        wrapper.remove();
        return Ok(());
    }
    if let Some(index) = update.paragraph_index {
        let paragraphs = wrapper.query_selector_all("p")?;
        if let Some(p) = paragraphs.item(index as u32) {
            if let Some(parent) = p.parent_node() {
                parent.remove_child(&p)?;
            }
        }
    }
    Ok(())
}

/// Set or clear a single inline style property
pub fn set_style(element: &web_sys::Element, property: &str, value: &str) {
    if let Some(el) = element.dyn_ref::<web_sys::HtmlElement>() {
        let style = el.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(e) = result {
            log::warn!("cannot set {}: {:?}", property, e);
        }
    }
}

/// Index stored in `data-slide-index` on the closest slide
pub fn slide_index_of(node: &web_sys::Element) -> Option<usize> {
    node.closest("[data-slide-index]")
        .ok()
        .flatten()
        .and_then(|slide| slide.get_attribute("data-slide-index"))
        .and_then(|index| index.parse().ok())
}

/// An event listener that is removed when the guard is dropped
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, callback: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    /// Fires at most once; the browser unregisters it after the first event
    pub fn once<F>(target: &EventTarget, event: &'static str, callback: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}
