//! Recording `CarouselHost` with a virtual clock, shared by the integration tests
#![allow(dead_code)]

use blocks_wasm::carousel::{CarouselController, CarouselHost, Placement, PlayWhen, SessionId, TimerId};
use blocks_wasm::models::{
    CarouselConfig, DisplayMode, Element, ImageRef, MediaRef, SlideContent, SlideRecord, VariantTag, VideoKind, VideoRef,
};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    pub id: TimerId,
    pub period_ms: u64,
    pub next_fire: u64,
}

/// Remembers every side effect the controller asks for
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub now: u64,
    pub timers: Vec<Timer>,
    pub ticks: Vec<u64>,
    next_id: u64,

    pub placements: Vec<Placement>,
    pub active: HashSet<usize>,
    pub resets: Vec<usize>,
    pub plays: Vec<(usize, PlayWhen)>,
    pub retries: Vec<(usize, u32)>,
    pub mutes: Vec<usize>,
    pub progress: HashMap<usize, f64>,
    pub progress_attached: HashSet<usize>,

    pub native_streaming: bool,
    pub refuse_sessions: bool,
    pub loads: Vec<(usize, String, VideoKind)>,
    pub library_requests: Vec<String>,
    pub sessions: Vec<(usize, SessionId)>,
    pub live_sessions: HashSet<SessionId>,
    pub destroyed_sessions: Vec<SessionId>,

    pub observed: HashSet<usize>,
    pub released: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_native_streaming(mut self) -> Self {
        self.native_streaming = true;
        self
    }

    pub fn active_slides(&self) -> Vec<usize> {
        let mut active: Vec<usize> = self.active.iter().copied().collect();
        active.sort_unstable();
        active
    }

    pub fn shown(&self) -> Vec<usize> {
        let mut shown: Vec<(usize, usize)> = self
            .placements
            .iter()
            .enumerate()
            .filter_map(|(slide, p)| match p {
                Placement::Shown { order } => Some((*order, slide)),
                Placement::Hidden => None,
            })
            .collect();
        shown.sort_unstable();
        shown.into_iter().map(|(_, slide)| slide).collect()
    }

    pub fn loads_of(&self, slide: usize) -> usize {
        self.loads.iter().filter(|(s, _, _)| *s == slide).count()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl CarouselHost for RecordingHost {
    fn apply_placements(&mut self, placements: &[Placement]) {
        self.placements = placements.to_vec();
    }

    fn set_active(&mut self, slide: usize, active: bool) {
        if active {
            self.active.insert(slide);
        } else {
            self.active.remove(&slide);
        }
    }

    fn reset_playback(&mut self, slide: usize) {
        self.resets.push(slide);
    }

    fn play(&mut self, slide: usize, when: PlayWhen) {
        self.plays.push((slide, when));
    }

    fn schedule_play_retry(&mut self, slide: usize, delay_ms: u32) {
        self.retries.push((slide, delay_ms));
    }

    fn enforce_mute(&mut self, slide: usize) {
        self.mutes.push(slide);
    }

    fn attach_progress(&mut self, slide: usize) {
        self.progress_attached.insert(slide);
    }

    fn detach_progress(&mut self, slide: usize) {
        self.progress_attached.remove(&slide);
    }

    fn set_progress(&mut self, slide: usize, percent: f64) {
        self.progress.insert(slide, percent);
    }

    fn supports_native_streaming(&self, _slide: usize) -> bool {
        self.native_streaming
    }

    fn load_source(&mut self, slide: usize, url: &str, kind: VideoKind) {
        self.loads.push((slide, url.to_string(), kind));
    }

    fn request_streaming_library(&mut self, url: &str) {
        self.library_requests.push(url.to_string());
    }

    fn create_session(&mut self, slide: usize, _manifest: &str) -> Option<SessionId> {
        if self.refuse_sessions {
            return None;
        }
        let id = SessionId(self.next_id());
        self.sessions.push((slide, id));
        self.live_sessions.insert(id);
        Some(id)
    }

    fn destroy_session(&mut self, session: SessionId) {
        self.live_sessions.remove(&session);
        self.destroyed_sessions.push(session);
    }

    fn observe_visibility(&mut self, slide: usize) {
        self.observed.insert(slide);
    }

    fn unobserve_visibility(&mut self, slide: usize) {
        self.observed.remove(&slide);
    }

    fn schedule_autoplay(&mut self, period_ms: u32) -> TimerId {
        let id = TimerId(self.next_id());
        self.timers.push(Timer {
            id,
            period_ms: u64::from(period_ms),
            next_fire: self.now + u64::from(period_ms),
        });
        id
    }

    fn cancel_autoplay(&mut self, timer: TimerId) {
        self.timers.retain(|t| t.id != timer);
    }

    fn release(&mut self) {
        self.timers.clear();
        self.observed.clear();
        self.progress_attached.clear();
        self.released = true;
    }
}

/// Move the virtual clock forward, firing every due timer in order
pub fn advance(controller: &mut CarouselController<RecordingHost>, ms: u64) {
    let target = controller.host().now + ms;
    loop {
        let due = controller
            .host()
            .timers
            .iter()
            .filter(|t| t.next_fire <= target)
            .min_by_key(|t| t.next_fire)
            .map(|t| (t.id, t.next_fire));
        let Some((id, at)) = due else {
            break;
        };
        {
            let host = controller.host_mut();
            host.now = at;
            host.ticks.push(at);
            if let Some(timer) = host.timers.iter_mut().find(|t| t.id == id) {
                timer.next_fire += timer.period_ms;
            }
        }
        controller.on_autoplay_tick(id);
    }
    controller.host_mut().now = target;
}

pub fn image_slide(src: &str) -> SlideRecord {
    SlideRecord {
        media: Some(MediaRef::Image(ImageRef {
            src: src.to_string(),
            alt: String::new(),
        })),
        alternate: None,
        content: SlideContent {
            heading: Some(Element::new("h4").with_text(src)),
            body: Vec::new(),
        },
        style_tag: "default".to_string(),
        cta_tag: "default".to_string(),
        row_attrs: Vec::new(),
    }
}

pub fn video_slide(url: &str) -> SlideRecord {
    SlideRecord {
        media: Some(MediaRef::Video(VideoRef::new(url))),
        ..image_slide(url)
    }
}

pub fn mode_for(variant: VariantTag, config: &CarouselConfig) -> DisplayMode {
    variant.display_mode(config.slides_to_show)
}

/// Mounted controller over a fresh recording host
pub fn mounted(slides: &[SlideRecord], variant: VariantTag, host: RecordingHost) -> CarouselController<RecordingHost> {
    let config = CarouselConfig::default();
    let mut controller = CarouselController::new(host, slides, variant, mode_for(variant, &config), &config);
    controller.mount();
    controller
}
