//! One-shot block rewrites
//!
//! Cards and quotes have no behaviour after decoration: snapshot, render,
//! swap the content.

use super::dom;
use super::helpers::{deserialize_or_default, to_js_error};
use crate::models::DecorateOptions;
use crate::parse::{parse_block, parse_fragment};
use crate::renderers::{render_cards, render_quote, EdsImageOptimizer};
use crate::wasm_log;
use wasm_bindgen::prelude::*;

fn document() -> Result<web_sys::Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Decorate a cards block in place
#[wasm_bindgen(js_name = decorateCards)]
pub fn decorate_cards(block: web_sys::Element, options: JsValue) -> Result<(), JsValue> {
    let mut options: DecorateOptions = deserialize_or_default(options, "Invalid cards options")?;
    let document = document()?;
    if options.page_url.is_none() {
        options.page_url = document.url().ok();
    }

    let authored = parse_block(&dom::snapshot(&block)?).map_err(|e| to_js_error("Cards decoration failed", e))?;
    let optimizer = EdsImageOptimizer::new(options.page_url.as_deref());
    let list = render_cards(&authored, &options.config, &optimizer);

    block.set_inner_html("");
    let node = dom::materialize(&document, &list)?;
    block.append_child(&node)?;
    wasm_log!("cards decorated: {}", authored.rows.len());
    Ok(())
}

/// Decorate a quote block in place
#[wasm_bindgen(js_name = decorateQuote)]
pub fn decorate_quote(block: web_sys::Element) -> Result<(), JsValue> {
    let document = document()?;
    let authored = parse_fragment(&dom::snapshot(&block)?).map_err(|e| to_js_error("Quote decoration failed", e))?;
    let rendered = render_quote(&authored);
    dom::replace_content(&document, &block, &rendered)
}
