//! Side-effect seam between the rotation engine and the page
//!
//! The controller never touches view nodes. Everything it wants done to the
//! page (class toggles, media loading, timers, observers) goes through a
//! `CarouselHost`. The browser binding implements it over web-sys; tests use
//! a recording implementation.

use super::rotation::Placement;
use crate::models::VideoKind;
use serde::{Deserialize, Serialize};

/// Handle of a repeating autoplay timer
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Handle of an adaptive-streaming session bound to one video
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

/// When a play request should run
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayWhen {
    /// Media was already loaded
    Now,
    /// A load was just started; play once the first frame is available
    DataLoaded,
}

pub trait CarouselHost {
    /// Show or hide every slide; `placements` is indexed by slide
    fn apply_placements(&mut self, placements: &[Placement]);

    fn set_active(&mut self, slide: usize, active: bool);

    /// Pause and rewind
    fn reset_playback(&mut self, slide: usize);

    /// Request muted playback. A rejection must be reported back through
    /// `CarouselController::on_play_rejected`.
    fn play(&mut self, slide: usize, when: PlayWhen);

    /// Call `CarouselController::on_play_retry` after `delay_ms`
    fn schedule_play_retry(&mut self, slide: usize, delay_ms: u32);

    /// Force `muted = true, volume = 0`
    fn enforce_mute(&mut self, slide: usize);

    /// Start forwarding playback progress to `CarouselController::on_time_update`
    fn attach_progress(&mut self, slide: usize);

    fn detach_progress(&mut self, slide: usize);

    /// Progress indicator width in percent
    fn set_progress(&mut self, slide: usize, percent: f64);

    /// True when the browser plays adaptive manifests without a client library
    fn supports_native_streaming(&self, slide: usize) -> bool;

    /// Promote the placeholder source to a real one and start fetching
    fn load_source(&mut self, slide: usize, url: &str, kind: VideoKind);

    /// Fetch the streaming client library; report with
    /// `CarouselController::on_streaming_library`
    fn request_streaming_library(&mut self, url: &str);

    /// Create and attach a streaming session; `None` if the library refused
    fn create_session(&mut self, slide: usize, manifest: &str) -> Option<SessionId>;

    fn destroy_session(&mut self, session: SessionId);

    /// Report `CarouselController::on_visible` once the slide's media is in view
    fn observe_visibility(&mut self, slide: usize);

    fn unobserve_visibility(&mut self, slide: usize);

    /// Call `CarouselController::on_autoplay_tick` every `period_ms`
    fn schedule_autoplay(&mut self, period_ms: u32) -> TimerId;

    fn cancel_autoplay(&mut self, timer: TimerId);

    /// Drop every listener, observer and pending timer still registered
    fn release(&mut self);
}
