//! `CarouselHost` over the live DOM
//!
//! `DomHost` owns every browser resource a carousel registers: timers,
//! observers, media listeners and streaming sessions. Callbacks reach the
//! controller through a weak reference and skip the event when the
//! controller is gone or busy.

use super::dom::{self, Listener};
use super::helpers::{defer_drop, describe_js_error};
use super::streaming;
use crate::carousel::{CarouselController, CarouselHost, Placement, PlayWhen, SessionId, TimerId};
use crate::models::VideoKind;
use gloo_timers::callback::{Interval, Timeout};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlVideoElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

pub type SharedController = Rc<RefCell<CarouselController<DomHost>>>;
pub type WeakController = Weak<RefCell<CarouselController<DomHost>>>;

const NATIVE_STREAMING_TYPE: &str = "application/vnd.apple.mpegURL";

/// Run `f` against the controller if it is still alive and not mid-call
pub fn with_controller(weak: &WeakController, f: impl FnOnce(&mut CarouselController<DomHost>)) {
    let Some(controller) = weak.upgrade() else {
        return;
    };
    match controller.try_borrow_mut() {
        Ok(mut controller) => f(&mut controller),
        Err(_) => log::debug!("carousel busy, event skipped"),
    };
}

/// Live nodes of one slide
#[derive(Clone)]
pub struct SlideView {
    pub slide: web_sys::Element,
    pub video: Option<HtmlVideoElement>,
    pub progress: Option<web_sys::Element>,
}

impl SlideView {
    pub fn from_slide(slide: web_sys::Element) -> Self {
        let video = slide
            .query_selector("video")
            .ok()
            .flatten()
            .and_then(|v| v.dyn_into::<HtmlVideoElement>().ok());
        let progress = slide
            .query_selector(&format!(".{}", crate::renderers::PROGRESS_BAR_CLASS))
            .ok()
            .flatten();
        Self { slide, video, progress }
    }
}

struct Visibility {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl Drop for Visibility {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

struct DetachWatch {
    observer: web_sys::MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, web_sys::MutationObserver)>,
}

impl Drop for DetachWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Everything `release` tears down, dropped together
#[derive(Default)]
struct Resources {
    autoplay: Option<(TimerId, Interval)>,
    retries: HashMap<usize, Timeout>,
    progress: HashMap<usize, Listener>,
    pending_plays: HashMap<usize, Listener>,
    media: Vec<Listener>,
    ui: Vec<Listener>,
    visibility: Option<Visibility>,
    detach_watch: Option<DetachWatch>,
}

pub struct DomHost {
    controller: WeakController,
    root: web_sys::Element,
    views: Vec<SlideView>,
    visibility_threshold: f64,
    library: Option<JsValue>,
    sessions: HashMap<SessionId, JsValue>,
    next_session: u64,
    next_timer: u64,
    resources: Resources,
}

impl DomHost {
    pub fn new(controller: WeakController, root: web_sys::Element, views: Vec<SlideView>, visibility_threshold: f64) -> Self {
        Self {
            controller,
            root,
            views,
            visibility_threshold,
            library: None,
            sessions: HashMap::new(),
            next_session: 0,
            next_timer: 0,
            resources: Resources::default(),
        }
    }

    pub fn root(&self) -> &web_sys::Element {
        &self.root
    }

    pub fn views(&self) -> &[SlideView] {
        &self.views
    }

    /// Keep a UI listener alive until `release`
    pub fn keep(&mut self, listener: Listener) {
        self.resources.ui.push(listener);
    }

    /// Mute every video and revert any later unmute
    pub fn install_mute_guards(&mut self) -> Result<(), JsValue> {
        for (slide, view) in self.views.iter().enumerate() {
            let Some(video) = &view.video else {
                continue;
            };
            video.set_muted(true);
            video.set_volume(0.0);
            let weak = self.controller.clone();
            let target = video.clone();
            let listener = Listener::new(video, "volumechange", move |_| {
                let (muted, volume) = (target.muted(), target.volume());
                with_controller(&weak, |c| c.on_volume_change(slide, muted, volume));
            })?;
            self.resources.media.push(listener);
        }
        Ok(())
    }

    /// Destroy the controller once `root` leaves the document
    pub fn watch_detach(&mut self) -> Result<(), JsValue> {
        let Some(document) = self.root.owner_document() else {
            return Ok(());
        };
        let weak = self.controller.clone();
        let root = self.root.clone();
        let callback = Closure::wrap(Box::new(move |_records: js_sys::Array, _observer: web_sys::MutationObserver| {
            if root.is_connected() {
                return;
            }
            let weak = weak.clone();
            // the observer callback must not be dropped while it runs
            wasm_bindgen_futures::spawn_local(async move {
                with_controller(&weak, |c| c.destroy());
                if let Some(controller) = weak.upgrade() {
                    super::carousel::unregister(&controller);
                }
            });
        }) as Box<dyn FnMut(js_sys::Array, web_sys::MutationObserver)>);

        let observer = web_sys::MutationObserver::new(callback.as_ref().unchecked_ref())?;
        let options = web_sys::MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        observer.observe_with_options(&document, &options)?;
        self.resources.detach_watch = Some(DetachWatch {
            observer,
            _callback: callback,
        });
        Ok(())
    }

    fn video(&self, slide: usize) -> Option<&HtmlVideoElement> {
        self.views.get(slide).and_then(|view| view.video.as_ref())
    }

    fn ensure_visibility_observer(&mut self) -> Option<&IntersectionObserver> {
        if self.resources.visibility.is_none() {
            let weak = self.controller.clone();
            let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    if let Some(slide) = dom::slide_index_of(&entry.target()) {
                        with_controller(&weak, |c| c.on_visible(slide));
                    }
                }
            }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

            let options = IntersectionObserverInit::new();
            options.set_threshold(&JsValue::from_f64(self.visibility_threshold));
            match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
                Ok(observer) => {
                    self.resources.visibility = Some(Visibility {
                        observer,
                        _callback: callback,
                    });
                }
                Err(e) => {
                    log::warn!("visibility observer unavailable: {}", describe_js_error(&e));
                    return None;
                }
            }
        }
        self.resources.visibility.as_ref().map(|v| &v.observer)
    }

    fn set_library(&mut self, library: Option<JsValue>) {
        self.library = library;
    }
}

/// `video.play()`, reporting a rejection back to the controller
fn start_playback(video: &HtmlVideoElement, weak: &WeakController, slide: usize) {
    video.set_muted(true);
    video.set_volume(0.0);
    let promise = match video.play() {
        Ok(promise) => promise,
        Err(e) => {
            log::debug!("play() threw for slide {}: {}", slide, describe_js_error(&e));
            let weak = weak.clone();
            wasm_bindgen_futures::spawn_local(async move {
                with_controller(&weak, |c| c.on_play_rejected(slide));
            });
            return;
        }
    };
    let weak = weak.clone();
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            log::debug!("playback rejected for slide {}: {}", slide, describe_js_error(&e));
            with_controller(&weak, |c| c.on_play_rejected(slide));
        }
    });
}

impl CarouselHost for DomHost {
    fn apply_placements(&mut self, placements: &[Placement]) {
        for (view, placement) in self.views.iter().zip(placements) {
            match placement {
                Placement::Hidden => {
                    dom::set_style(&view.slide, "display", "none");
                    dom::set_style(&view.slide, "order", "");
                }
                Placement::Shown { order } => {
                    dom::set_style(&view.slide, "display", "block");
                    dom::set_style(&view.slide, "order", &order.to_string());
                }
            }
        }
    }

    fn set_active(&mut self, slide: usize, active: bool) {
        let Some(view) = self.views.get(slide) else {
            return;
        };
        let classes = view.slide.class_list();
        let result = if active {
            classes.add_1(crate::renderers::carousel::ACTIVE_CLASS)
        } else {
            classes.remove_1(crate::renderers::carousel::ACTIVE_CLASS)
        };
        if let Err(e) = result {
            log::warn!("cannot toggle active class: {}", describe_js_error(&e));
        }
    }

    fn reset_playback(&mut self, slide: usize) {
        self.resources.pending_plays.remove(&slide);
        if let Some(timeout) = self.resources.retries.remove(&slide) {
            timeout.cancel();
        }
        if let Some(video) = self.video(slide) {
            if let Err(e) = video.pause() {
                log::debug!("pause failed: {}", describe_js_error(&e));
            }
            video.set_current_time(0.0);
        }
    }

    fn play(&mut self, slide: usize, when: PlayWhen) {
        let Some(video) = self.video(slide).cloned() else {
            return;
        };
        let weak = self.controller.clone();
        match when {
            PlayWhen::Now => start_playback(&video, &weak, slide),
            PlayWhen::DataLoaded => {
                let target = video.clone();
                match Listener::once(&video, "loadeddata", move |_| start_playback(&target, &weak, slide)) {
                    Ok(listener) => {
                        self.resources.pending_plays.insert(slide, listener);
                    }
                    Err(e) => log::warn!("cannot wait for media data: {}", describe_js_error(&e)),
                }
            }
        }
    }

    fn schedule_play_retry(&mut self, slide: usize, delay_ms: u32) {
        let weak = self.controller.clone();
        let timeout = Timeout::new(delay_ms, move || {
            with_controller(&weak, |c| c.on_play_retry(slide));
        });
        if let Some(previous) = self.resources.retries.insert(slide, timeout) {
            previous.cancel();
        }
    }

    fn enforce_mute(&mut self, slide: usize) {
        if let Some(video) = self.video(slide) {
            video.set_muted(true);
            video.set_volume(0.0);
        }
    }

    fn attach_progress(&mut self, slide: usize) {
        let Some(view) = self.views.get(slide) else {
            return;
        };
        let (Some(video), Some(_)) = (view.video.clone(), view.progress.as_ref()) else {
            return;
        };
        let weak = self.controller.clone();
        let target = video.clone();
        match Listener::new(&video, "timeupdate", move |_| {
            let (current, duration) = (target.current_time(), target.duration());
            with_controller(&weak, |c| c.on_time_update(slide, current, duration));
        }) {
            Ok(listener) => {
                self.resources.progress.insert(slide, listener);
            }
            Err(e) => log::warn!("cannot track progress: {}", describe_js_error(&e)),
        }
    }

    fn detach_progress(&mut self, slide: usize) {
        self.resources.progress.remove(&slide);
    }

    fn set_progress(&mut self, slide: usize, percent: f64) {
        if let Some(bar) = self.views.get(slide).and_then(|view| view.progress.as_ref()) {
            dom::set_style(bar, "width", &format!("{}%", percent));
        }
    }

    fn supports_native_streaming(&self, slide: usize) -> bool {
        self.video(slide)
            .map(|video| !video.can_play_type(NATIVE_STREAMING_TYPE).is_empty())
            .unwrap_or(false)
    }

    fn load_source(&mut self, slide: usize, url: &str, kind: VideoKind) {
        let Some(video) = self.video(slide) else {
            return;
        };
        let result: Result<(), JsValue> = (|| {
            match kind {
                VideoKind::Progressive => {
                    if let Some(source) = video.query_selector("source[data-src]")? {
                        source.set_attribute("src", url)?;
                        source.remove_attribute("data-src")?;
                    }
                }
                VideoKind::Adaptive => {
                    video.set_src(url);
                    video.remove_attribute("data-hls-src")?;
                }
            }
            video.load();
            Ok(())
        })();
        if let Err(e) = result {
            log::warn!("cannot load media for slide {}: {}", slide, describe_js_error(&e));
        }
    }

    fn request_streaming_library(&mut self, url: &str) {
        let weak = self.controller.clone();
        let url = url.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            let library = streaming::load_library(&url).await;
            let available = library.is_some();
            with_controller(&weak, |c| {
                c.host_mut().set_library(library);
                c.on_streaming_library(available);
            });
        });
    }

    fn create_session(&mut self, slide: usize, manifest: &str) -> Option<SessionId> {
        let library = self.library.clone()?;
        let video = self.video(slide)?.clone();
        match streaming::create_session(&library, &video, manifest) {
            Ok(session) => {
                let _ = video.remove_attribute("data-hls-src");
                self.next_session += 1;
                let id = SessionId(self.next_session);
                self.sessions.insert(id, session);
                Some(id)
            }
            Err(e) => {
                log::warn!("cannot create streaming session: {}", describe_js_error(&e));
                None
            }
        }
    }

    fn destroy_session(&mut self, session: SessionId) {
        if let Some(session) = self.sessions.remove(&session) {
            streaming::destroy_session(&session);
        }
    }

    fn observe_visibility(&mut self, slide: usize) {
        let Some(video) = self.video(slide).cloned() else {
            return;
        };
        if let Some(observer) = self.ensure_visibility_observer() {
            observer.observe(&video);
        }
    }

    fn unobserve_visibility(&mut self, slide: usize) {
        let video = self.video(slide).cloned();
        if let (Some(video), Some(visibility)) = (video, self.resources.visibility.as_ref()) {
            visibility.observer.unobserve(&video);
        }
    }

    fn schedule_autoplay(&mut self, period_ms: u32) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        let weak = self.controller.clone();
        let interval = Interval::new(period_ms, move || {
            with_controller(&weak, |c| c.on_autoplay_tick(id));
        });
        if let Some(previous) = self.resources.autoplay.replace((id, interval)) {
            defer_drop(previous);
        }
        id
    }

    fn cancel_autoplay(&mut self, timer: TimerId) {
        if matches!(&self.resources.autoplay, Some((current, _)) if *current == timer) {
            if let Some((_, interval)) = self.resources.autoplay.take() {
                defer_drop(interval.cancel());
            }
        }
    }

    fn release(&mut self) {
        for (_, session) in self.sessions.drain() {
            streaming::destroy_session(&session);
        }
        let resources = std::mem::take(&mut self.resources);
        defer_drop(resources);
    }
}
