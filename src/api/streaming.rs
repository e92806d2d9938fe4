//! Adaptive streaming client library
//!
//! The library script is injected at most once per page. Every carousel
//! awaits the same promise, which resolves to the library's constructor
//! (`window.Hls`) or to `null` when the script failed to load.

use js_sys::{Array, Function, Promise, Reflect};
use once_cell::unsync::OnceCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

const GLOBAL_NAME: &str = "Hls";

thread_local! {
    static LIBRARY: OnceCell<Promise> = OnceCell::new();
}

/// The page-wide library promise; the first call injects the script
pub fn library_promise(url: &str) -> Promise {
    LIBRARY.with(|cell| cell.get_or_init(|| inject(url)).clone())
}

/// Await the library; `None` when unavailable or unsupported by the browser
pub async fn load_library(url: &str) -> Option<JsValue> {
    let library = JsFuture::from(library_promise(url)).await.ok()?;
    if library.is_null() || library.is_undefined() {
        log::warn!("streaming library failed to load from {}", url);
        return None;
    }
    if !is_supported(&library) {
        log::warn!("streaming library loaded but not supported by this browser");
        return None;
    }
    Some(library)
}

fn global_library(window: &web_sys::Window) -> Option<JsValue> {
    Reflect::get(window, &JsValue::from_str(GLOBAL_NAME))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn inject(url: &str) -> Promise {
    let url = url.to_string();
    Promise::new(&mut |resolve, _reject| {
        let Some(window) = web_sys::window() else {
            let _ = resolve.call1(&JsValue::NULL, &JsValue::NULL);
            return;
        };
        if let Some(library) = global_library(&window) {
            let _ = resolve.call1(&JsValue::NULL, &library);
            return;
        }
        if let Err(e) = append_script(&window, &url, &resolve) {
            crate::wasm_error!("cannot inject streaming library: {}", super::helpers::describe_js_error(&e));
            let _ = resolve.call1(&JsValue::NULL, &JsValue::NULL);
        }
    })
}

fn append_script(window: &web_sys::Window, url: &str, resolve: &Function) -> Result<(), JsValue> {
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let head = document.head().ok_or_else(|| JsValue::from_str("no head"))?;
    let script: web_sys::HtmlScriptElement = document.create_element("script")?.dyn_into()?;
    script.set_src(url);
    script.set_async(true);

    let on_load = {
        let resolve = resolve.clone();
        let window = window.clone();
        Closure::once_into_js(move || {
            let library = global_library(&window).unwrap_or(JsValue::NULL);
            let _ = resolve.call1(&JsValue::NULL, &library);
        })
    };
    let on_error = {
        let resolve = resolve.clone();
        Closure::once_into_js(move || {
            let _ = resolve.call1(&JsValue::NULL, &JsValue::NULL);
        })
    };
    script.set_onload(Some(on_load.unchecked_ref()));
    script.set_onerror(Some(on_error.unchecked_ref()));
    head.append_child(&script)?;
    Ok(())
}

fn call_method(target: &JsValue, name: &str, args: &Array) -> Result<JsValue, JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    Reflect::apply(&method, target, args)
}

fn is_supported(library: &JsValue) -> bool {
    call_method(library, "isSupported", &Array::new())
        .ok()
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

/// Create a session, point it at `manifest` and bind it to `video`
pub fn create_session(
    library: &JsValue,
    video: &web_sys::HtmlVideoElement,
    manifest: &str,
) -> Result<JsValue, JsValue> {
    let constructor: Function = library.clone().dyn_into()?;
    let session = Reflect::construct(&constructor, &Array::new())?;
    call_method(&session, "loadSource", &Array::of1(&JsValue::from_str(manifest)))?;
    call_method(&session, "attachMedia", &Array::of1(video))?;
    Ok(session)
}

pub fn destroy_session(session: &JsValue) {
    if let Err(e) = call_method(session, "destroy", &Array::new()) {
        log::warn!("streaming session destroy failed: {:?}", e);
    }
}
