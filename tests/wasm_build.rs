//! WASM build test
//!
//! Decorates a live block in a browser and drives the returned handle.
#![cfg(target_arch = "wasm32")]

use blocks_wasm::api::{active_carousel_count, decorate_cards, decorate_carousel, decorate_quote};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn slide_row(n: usize) -> String {
    format!(
        r#"<div><div><picture><img src="/media_{n}.png" alt="Slide {n}"></picture></div><div><h3>Title {n}</h3></div><div><p>default</p></div><div><p>default</p></div></div>"#
    )
}

/// `main > div.section > (div.default-content-wrapper + div.carousel-wrapper > div.carousel)`
fn mount_block(variant: &str, rows: usize) -> web_sys::Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let section = document.create_element("div").unwrap();
    section.set_class_name("section");
    let rows: String = (1..=rows).map(slide_row).collect();
    section.set_inner_html(&format!(
        r#"<div class="default-content-wrapper"><p>{variant}</p></div><div class="carousel-wrapper"><div class="carousel block">{rows}<div><div><p>Side note</p></div></div></div></div>"#
    ));
    document.body().unwrap().append_child(&section).unwrap();
    section.query_selector(".carousel").unwrap().unwrap()
}

#[wasm_bindgen_test]
fn test_decorate_live_block() {
    let block = mount_block("single-slide-carousel", 3);
    let section = block.parent_element().unwrap().parent_element().unwrap();

    let handle = decorate_carousel(block.clone(), JsValue::UNDEFINED).unwrap();
    assert_eq!(handle.slide_count(), 3);
    assert_eq!(handle.variant().as_deref(), Some("single-slide-carousel"));

    let slides = block.query_selector_all("li.carousel-slide").unwrap();
    assert_eq!(slides.length(), 3);
    assert!(block.query_selector(".slide-prev").unwrap().is_some());

    // the consumed wrapper is gone and the side panel leads the section
    let first = section.first_element_child().unwrap();
    assert!(first.class_list().contains("default-content-wrapper"));
    assert_eq!(first.text_content().unwrap_or_default().trim(), "Side note");

    handle.destroy();
}

#[wasm_bindgen_test]
fn test_handle_navigation_and_destroy() {
    let block = mount_block("multislide-carousel", 4);
    let before = active_carousel_count();
    let handle = decorate_carousel(block.clone(), JsValue::UNDEFINED).unwrap();
    assert_eq!(active_carousel_count(), before + 1);

    assert_eq!(handle.next(), Some(1));
    assert_eq!(handle.active_index(), 1);
    assert_eq!(handle.prev(), Some(0));
    assert_eq!(handle.prev(), Some(3));
    assert_eq!(handle.active_index(), 3);
    // the active class is the only trace the rotation leaves on the view
    let active = block.query_selector_all("li.active-slide").unwrap();
    assert_eq!(active.length(), 1);
    assert!(block.get_attribute("data-active-slide").is_none());

    handle.destroy();
    assert_eq!(active_carousel_count(), before);
    assert_eq!(handle.next(), None);
}

/// Resolves after the pending observer callbacks and spawned tasks have run
async fn settle() {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        let window = web_sys::window().unwrap();
        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 20)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
async fn test_detached_block_destroys_itself_when_watched() {
    let block = mount_block("single-slide-carousel", 2);
    let section = block.parent_element().unwrap().parent_element().unwrap();
    let before = active_carousel_count();

    let options = js_sys::JSON::parse(r#"{"config": {"watchDetach": true}}"#).unwrap();
    let handle = decorate_carousel(block.clone(), options).unwrap();
    assert_eq!(active_carousel_count(), before + 1);

    section.remove();
    settle().await;

    assert_eq!(active_carousel_count(), before);
    assert_eq!(handle.next(), None);
}

#[wasm_bindgen_test]
fn test_cards_and_quote_rewrite_in_place() {
    let document = web_sys::window().unwrap().document().unwrap();
    let cards = document.create_element("div").unwrap();
    cards.set_class_name("cards block");
    cards.set_inner_html(
        r#"<div><div><picture><img src="/card.jpg" alt="Card"></picture></div><div><p>Body</p></div><div><p>featured</p></div><div><p>default</p></div></div>"#,
    );
    document.body().unwrap().append_child(&cards).unwrap();
    decorate_cards(cards.clone(), JsValue::UNDEFINED).unwrap();
    let card = cards.query_selector("ul > li.featured").unwrap().unwrap();
    assert!(card.query_selector(".cards-card-image picture img").unwrap().is_some());

    let quote = document.create_element("div").unwrap();
    quote.set_class_name("quote block");
    quote.set_inner_html(r#"<div><div><p>Stay.</p></div></div><div><div><p><em>Field notes</em></p></div></div>"#);
    document.body().unwrap().append_child(&quote).unwrap();
    decorate_quote(quote.clone()).unwrap();
    assert!(quote.query_selector("blockquote > .quote-quotation > p").unwrap().is_some());
    assert!(quote.query_selector(".quote-attribution cite").unwrap().is_some());
}
