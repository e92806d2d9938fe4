//! Per-instance carousel controller
//!
//! Owns the active index, the autoplay timer and the media slots of one
//! carousel. All transitions (buttons, slide clicks, autoplay ticks) run
//! through `transition`, so manual and automatic navigation share one path.
//! Events arriving before `mount` or after `destroy` are ignored.

use super::autoplay::Autoplay;
use super::decorate::DecoratedBlock;
use super::host::{CarouselHost, PlayWhen, TimerId};
use super::media::{LibraryState, LoadOutcome, LoadTrigger, MediaSlot, SlotState, StreamingLibrary};
use super::rotation::Rotation;
use crate::models::{CarouselConfig, DisplayMode, SlideRecord, VariantTag};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, not yet mounted
    Idle,
    Mounted,
    Destroyed,
}

pub struct CarouselController<H: CarouselHost> {
    host: H,
    rotation: Rotation,
    autoplay: Autoplay,
    slots: Vec<MediaSlot>,
    library: StreamingLibrary,
    lifecycle: Lifecycle,
    play_retry_delay_ms: u32,
}

impl<H: CarouselHost> CarouselController<H> {
    pub fn new(host: H, slides: &[SlideRecord], variant: VariantTag, mode: DisplayMode, config: &CarouselConfig) -> Self {
        Self {
            host,
            rotation: Rotation::new(slides.len(), mode),
            autoplay: Autoplay::new(variant.autoplays(), config.autoplay_period_ms),
            slots: slides.iter().map(MediaSlot::for_record).collect(),
            library: StreamingLibrary::new(config.streaming_library_url.clone()),
            lifecycle: Lifecycle::Idle,
            play_retry_delay_ms: config.play_retry_delay_ms,
        }
    }

    pub fn from_decorated(host: H, decorated: &DecoratedBlock, config: &CarouselConfig) -> Self {
        Self::new(host, &decorated.slides, decorated.variant.tag, decorated.mode, config)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn active_index(&self) -> usize {
        self.rotation.active()
    }

    pub fn slide_count(&self) -> usize {
        self.rotation.count()
    }

    pub fn mode(&self) -> DisplayMode {
        self.rotation.mode()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    pub fn is_autoplay_running(&self) -> bool {
        self.autoplay.is_running()
    }

    pub fn slot_state(&self, slide: usize) -> Option<SlotState> {
        self.slots.get(slide).map(MediaSlot::state)
    }

    pub fn library_state(&self) -> LibraryState {
        self.library.state()
    }

    /// Show the first slide, start observing media and start autoplay
    pub fn mount(&mut self) {
        if self.lifecycle != Lifecycle::Idle {
            return;
        }
        self.lifecycle = Lifecycle::Mounted;
        if self.rotation.is_empty() {
            log::debug!("carousel mounted without slides");
            return;
        }

        self.transition();
        for (slide, slot) in self.slots.iter().enumerate() {
            if slot.has_video() {
                self.host.observe_visibility(slide);
            }
        }
        self.autoplay.start(&mut self.host);
        log::debug!("carousel mounted: {} slides, mode {:?}", self.rotation.count(), self.rotation.mode());
    }

    /// Unregister everything deterministically. Safe to call twice.
    pub fn destroy(&mut self) {
        if self.lifecycle == Lifecycle::Destroyed {
            return;
        }
        self.autoplay.cancel(&mut self.host);
        for slot in self.slots.iter_mut() {
            slot.detach(&mut self.host);
        }
        self.host.release();
        self.lifecycle = Lifecycle::Destroyed;
        log::debug!("carousel destroyed");
    }

    pub fn next(&mut self) -> Option<usize> {
        if !self.is_mounted() || self.rotation.is_empty() {
            return None;
        }
        self.rotation.next();
        self.after_manual_navigation();
        Some(self.rotation.active())
    }

    pub fn prev(&mut self) -> Option<usize> {
        if !self.is_mounted() || self.rotation.is_empty() {
            return None;
        }
        self.rotation.prev();
        self.after_manual_navigation();
        Some(self.rotation.active())
    }

    /// A slide was clicked
    pub fn select(&mut self, slide: usize) -> Option<usize> {
        if !self.is_mounted() {
            return None;
        }
        let selected = self.rotation.select(slide)?;
        self.after_manual_navigation();
        Some(selected)
    }

    fn after_manual_navigation(&mut self) {
        self.transition();
        self.autoplay.restart(&mut self.host);
    }

    pub fn on_autoplay_tick(&mut self, timer: TimerId) {
        if !self.is_mounted() || !self.autoplay.is_current(timer) || self.rotation.is_empty() {
            return;
        }
        self.rotation.next();
        self.transition();
    }

    pub fn pointer_enter(&mut self) {
        if self.is_mounted() {
            self.autoplay.pointer_enter(&mut self.host);
        }
    }

    pub fn pointer_leave(&mut self) {
        if self.is_mounted() {
            self.autoplay.pointer_leave(&mut self.host);
        }
    }

    pub fn on_visible(&mut self, slide: usize) {
        if !self.is_mounted() {
            return;
        }
        let Some(slot) = self.slots.get_mut(slide) else {
            return;
        };
        let outcome = slot.load(slide, LoadTrigger::Visible, &mut self.library, &mut self.host);
        log::debug!("slide {} visible: {:?}", slide, outcome);
        self.host.unobserve_visibility(slide);
    }

    pub fn on_time_update(&mut self, slide: usize, current_time: f64, duration: f64) {
        if !self.is_mounted() || slide != self.rotation.active() {
            return;
        }
        if !duration.is_finite() || duration <= 0.0 {
            return;
        }
        let percent = (current_time / duration * 100.0).clamp(0.0, 100.0);
        self.host.set_progress(slide, percent);
    }

    /// Media must stay silent: any unmute or volume raise is reverted
    pub fn on_volume_change(&mut self, slide: usize, muted: bool, volume: f64) {
        if self.lifecycle == Lifecycle::Destroyed {
            return;
        }
        if !muted || volume > 0.0 {
            self.host.enforce_mute(slide);
        }
    }

    pub fn on_play_rejected(&mut self, slide: usize) {
        if !self.is_mounted() || slide != self.rotation.active() {
            return;
        }
        let Some(slot) = self.slots.get_mut(slide) else {
            return;
        };
        if slot.record_rejection() {
            self.host.schedule_play_retry(slide, self.play_retry_delay_ms);
        } else {
            log::debug!("playback of slide {} abandoned after retry", slide);
        }
    }

    pub fn on_play_retry(&mut self, slide: usize) {
        if self.is_mounted() && slide == self.rotation.active() {
            self.host.play(slide, PlayWhen::Now);
        }
    }

    pub fn on_streaming_library(&mut self, available: bool) {
        self.library.resolve(available);
        if !self.is_mounted() {
            return;
        }
        let active = self.rotation.active();
        for (slide, slot) in self.slots.iter_mut().enumerate() {
            if slot.library_resolved(slide, available, slide == active, &mut self.host) {
                self.host.play(slide, PlayWhen::DataLoaded);
            }
        }
    }

    /// Apply the current rotation state to the page.
    ///
    /// Every other slide is deactivated first (playback reset, progress
    /// cleared, session destroyed), then the active slide loads and plays.
    fn transition(&mut self) {
        let active = self.rotation.active();
        self.host.apply_placements(&self.rotation.placements());

        for (slide, slot) in self.slots.iter_mut().enumerate() {
            if slide == active {
                continue;
            }
            self.host.set_active(slide, false);
            if slot.has_video() {
                self.host.reset_playback(slide);
                self.host.detach_progress(slide);
                self.host.set_progress(slide, 0.0);
                slot.detach(&mut self.host);
            }
        }

        self.host.set_active(active, true);
        self.activate_media(active);
    }

    fn activate_media(&mut self, slide: usize) {
        let Some(slot) = self.slots.get_mut(slide) else {
            return;
        };
        slot.reset_attempts();
        let outcome = slot.load(slide, LoadTrigger::Activated, &mut self.library, &mut self.host);
        match outcome {
            LoadOutcome::NoMedia | LoadOutcome::Unavailable => {}
            LoadOutcome::Started => {
                self.host.attach_progress(slide);
                self.host.play(slide, PlayWhen::DataLoaded);
            }
            LoadOutcome::AlreadyLoaded => {
                self.host.attach_progress(slide);
                self.host.play(slide, PlayWhen::Now);
            }
            LoadOutcome::Deferred => self.host.attach_progress(slide),
        }
    }
}
