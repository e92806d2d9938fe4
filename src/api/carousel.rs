//! JavaScript entry points
//!
//! `decorateCarousel(block, options)` snapshots the authored block, runs the
//! headless decoration, replaces the block content with the rendered tree and
//! mounts a controller bound to the live nodes. The returned handle drives
//! and tears down that instance.

use super::dom::{self, Listener};
use super::helpers::{deserialize_or_default, serialize, to_js_error};
use super::host::{with_controller, DomHost, SharedController, SlideView, WeakController};
use crate::carousel::{CarouselController, Lifecycle};
use crate::models::DecorateOptions;
use crate::parse::Detector;
use crate::renderers::carousel::{NAV_CLASS, SLIDE_CLASS};
use crate::renderers::decorate_markup;
use crate::{wasm_info, wasm_log, wasm_warn};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

thread_local! {
    // mounted carousels stay alive here until destroyed, even if JS drops the handle
    static INSTANCES: RefCell<Vec<SharedController>> = RefCell::new(Vec::new());
}

fn prune(instances: &mut Vec<SharedController>) {
    instances.retain(|c| {
        c.try_borrow()
            .map(|c| c.lifecycle() != Lifecycle::Destroyed)
            .unwrap_or(true)
    });
}

fn register(controller: &SharedController) {
    INSTANCES.with(|instances| {
        let mut instances = instances.borrow_mut();
        prune(&mut instances);
        instances.push(Rc::clone(controller));
    });
}

pub(crate) fn unregister(controller: &SharedController) {
    INSTANCES.with(|instances| {
        instances.borrow_mut().retain(|c| !Rc::ptr_eq(c, controller));
    });
}

/// Number of carousels currently kept alive
#[wasm_bindgen(js_name = activeCarouselCount)]
pub fn active_carousel_count() -> usize {
    INSTANCES.with(|instances| {
        let mut instances = instances.borrow_mut();
        prune(&mut instances);
        instances.len()
    })
}

/// Handle to one mounted carousel
#[wasm_bindgen]
pub struct CarouselHandle {
    controller: SharedController,
    variant: Option<String>,
}

#[wasm_bindgen]
impl CarouselHandle {
    /// Advance by one slide; returns the new active index
    pub fn next(&self) -> Option<u32> {
        self.controller.try_borrow_mut().ok()?.next().map(|i| i as u32)
    }

    /// Go back by one slide; returns the new active index
    pub fn prev(&self) -> Option<u32> {
        self.controller.try_borrow_mut().ok()?.prev().map(|i| i as u32)
    }

    /// Stop autoplay, release media and unregister every listener
    pub fn destroy(&self) {
        match self.controller.try_borrow_mut() {
            Ok(mut controller) => controller.destroy(),
            Err(_) => {
                let weak = Rc::downgrade(&self.controller);
                wasm_bindgen_futures::spawn_local(async move {
                    with_controller(&weak, |c| c.destroy());
                });
            }
        }
        unregister(&self.controller);
    }

    #[wasm_bindgen(getter, js_name = activeIndex)]
    pub fn active_index(&self) -> u32 {
        self.controller
            .try_borrow()
            .map(|c| c.active_index() as u32)
            .unwrap_or(0)
    }

    #[wasm_bindgen(getter, js_name = slideCount)]
    pub fn slide_count(&self) -> u32 {
        self.controller
            .try_borrow()
            .map(|c| c.slide_count() as u32)
            .unwrap_or(0)
    }

    #[wasm_bindgen(getter)]
    pub fn variant(&self) -> Option<String> {
        self.variant.clone()
    }
}

/// Decorate a carousel block in place
#[wasm_bindgen(js_name = decorateCarousel)]
pub fn decorate_carousel(block: web_sys::Element, options: JsValue) -> Result<CarouselHandle, JsValue> {
    let mut options: DecorateOptions = deserialize_or_default(options, "Invalid carousel options")?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    if options.page_url.is_none() {
        options.page_url = window.location().href().ok();
    }

    let wrapper = dom::preceding_wrapper(&block);
    let block_xhtml = dom::snapshot(&block)?;
    let sibling_xhtml = wrapper.as_ref().map(dom::snapshot).transpose()?;
    let wide = dom::in_wide_container(&block, &options.config.wide_container_selector);

    let rendered = decorate_markup(&block_xhtml, sibling_xhtml.as_deref(), wide, &options)
        .map_err(|e| to_js_error("Carousel decoration failed", e))?;
    let decorated = &rendered.decorated;

    if let (Some(wrapper), Some(Detector::SiblingBlock)) = (&wrapper, decorated.variant.source) {
        dom::apply_sibling_update(wrapper, &decorated.variant.sibling)?;
    }

    let container = dom::materialize(&document, &rendered.container)?;
    dom::replace_children(&block, &container)?;
    if let Some(left) = &rendered.left_content {
        match block.parent_element().and_then(|p| p.parent_element()) {
            Some(section) => {
                let panel = dom::materialize(&document, left)?;
                section.prepend_with_node_1(&panel)?;
                wasm_log!("side content moved ahead of the carousel ({} elements)", left.child_elements().count());
            }
            None => wasm_warn!("carousel has no section to hold its side content"),
        }
    }

    let slides = container.query_selector_all(&format!("li.{}", SLIDE_CLASS))?;
    let views: Vec<SlideView> = (0..slides.length())
        .filter_map(|i| slides.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(SlideView::from_slide)
        .collect();

    let config = options.config.clone();
    let controller: SharedController = Rc::new_cyclic(|weak: &WeakController| {
        let host = DomHost::new(weak.clone(), block.clone(), views, config.visibility_threshold);
        RefCell::new(CarouselController::from_decorated(host, decorated, &config))
    });

    {
        let weak = Rc::downgrade(&controller);
        let mut ctl = controller.borrow_mut();
        let host = ctl.host_mut();
        host.install_mute_guards()?;
        if config.watch_detach {
            host.watch_detach()?;
        }
        wire_navigation(host, &container, &weak)?;
        wire_show_more(host, &container)?;
        ctl.mount();
    }
    register(&controller);

    let variant = decorated.variant_tag().label().map(str::to_string);
    wasm_info!(
        "carousel decorated: {} slides, variant {}",
        decorated.slide_count(),
        variant.as_deref().unwrap_or("unset")
    );
    Ok(CarouselHandle { controller, variant })
}

fn wire_navigation(host: &mut DomHost, container: &web_sys::Element, weak: &WeakController) -> Result<(), JsValue> {
    let nav = container.query_selector(&format!(".{}", NAV_CLASS))?;
    if let Some(nav) = nav {
        if let Some(prev) = nav.query_selector(".slide-prev")? {
            let weak = weak.clone();
            host.keep(Listener::new(&prev, "click", move |_| {
                with_controller(&weak, |c| {
                    c.prev();
                });
            })?);
        }
        if let Some(next) = nav.query_selector(".slide-next")? {
            let weak = weak.clone();
            host.keep(Listener::new(&next, "click", move |_| {
                with_controller(&weak, |c| {
                    c.next();
                });
            })?);
        }
    }

    let slides: Vec<web_sys::Element> = host.views().iter().map(|view| view.slide.clone()).collect();
    for (index, slide) in slides.iter().enumerate() {
        let weak = weak.clone();
        host.keep(Listener::new(slide, "click", move |_| {
            with_controller(&weak, |c| {
                c.select(index);
            });
        })?);
    }

    let root = host.root().clone();
    let enter = weak.clone();
    host.keep(Listener::new(&root, "mouseenter", move |_| {
        with_controller(&enter, |c| c.pointer_enter());
    })?);
    let leave = weak.clone();
    host.keep(Listener::new(&root, "mouseleave", move |_| {
        with_controller(&leave, |c| c.pointer_leave());
    })?);
    Ok(())
}

/// Show more / show less toggles next to clamped descriptions
fn wire_show_more(host: &mut DomHost, container: &web_sys::Element) -> Result<(), JsValue> {
    let toggles = container.query_selector_all(".show-more-container")?;
    for i in 0..toggles.length() {
        let Some(toggle) = toggles.item(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) else {
            continue;
        };
        let (Some(text), Some(more), Some(less)) = (
            toggle.previous_element_sibling(),
            toggle.query_selector(".show-more")?,
            toggle.query_selector(".show-less")?,
        ) else {
            continue;
        };

        let (t, m, l) = (text.clone(), more.clone(), less.clone());
        host.keep(Listener::new(&more, "click", move |event| {
            event.stop_propagation();
            let _ = t.class_list().remove_1("clamp-text");
            dom::set_style(&m, "display", "none");
            dom::set_style(&l, "display", "inline");
        })?);

        let (t, m, l) = (text, more, less.clone());
        host.keep(Listener::new(&less, "click", move |event| {
            event.stop_propagation();
            let _ = t.class_list().add_1("clamp-text");
            dom::set_style(&m, "display", "inline");
            dom::set_style(&l, "display", "none");
        })?);
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderedMarkup {
    html: String,
    left_content_html: Option<String>,
    variant: Option<&'static str>,
    slide_count: usize,
    dropped_rows: usize,
}

/// Markup in, markup out: decorate serialized block XHTML without a DOM
#[wasm_bindgen(js_name = renderCarouselMarkup)]
pub fn render_carousel_markup(
    block_xhtml: &str,
    sibling_xhtml: Option<String>,
    in_wide_container: bool,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let options: DecorateOptions = deserialize_or_default(options, "Invalid carousel options")?;
    let rendered = decorate_markup(block_xhtml, sibling_xhtml.as_deref(), in_wide_container, &options)
        .map_err(|e| to_js_error("Carousel decoration failed", e))?;
    let result = RenderedMarkup {
        html: rendered.container_html(),
        left_content_html: rendered.left_content_html(),
        variant: rendered.decorated.variant_tag().label(),
        slide_count: rendered.decorated.slide_count(),
        dropped_rows: rendered.decorated.dropped.len(),
    };
    serialize(&result, "Failed to serialize rendered carousel")
}
