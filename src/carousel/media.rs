//! Lazy media loading
//!
//! Each video slide owns a `MediaSlot`. Loading can be triggered by the slide
//! becoming active or by its media scrolling into view; whichever comes first
//! does the work and the other is a no-op.

use super::host::{CarouselHost, SessionId};
use crate::models::{SlideRecord, VideoKind, VideoRef};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// No video (image slide or empty media)
    Static,
    /// Placeholder attributes only, nothing fetched
    Pending,
    /// Waiting for the streaming library before a session can be attached
    AwaitingLibrary,
    Loaded,
    Streaming(SessionId),
    /// Session torn down on deactivation; re-attached on the next activation
    Detached,
    /// Nothing can play this source
    Unavailable,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadTrigger {
    Activated,
    Visible,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    NoMedia,
    AlreadyLoaded,
    /// A fetch was started by this call
    Started,
    /// Will load later (library pending, or session creation left to activation)
    Deferred,
    Unavailable,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LibraryState {
    NotRequested,
    Pending,
    Ready,
    Unavailable,
}

/// The streaming client library, requested at most once per controller.
/// The browser binding additionally shares the fetch across controllers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StreamingLibrary {
    url: String,
    state: LibraryState,
}

impl StreamingLibrary {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: LibraryState::NotRequested,
        }
    }

    pub fn state(&self) -> LibraryState {
        self.state
    }

    fn request<H: CarouselHost>(&mut self, host: &mut H) {
        if self.state == LibraryState::NotRequested {
            self.state = LibraryState::Pending;
            host.request_streaming_library(&self.url);
        }
    }

    pub fn resolve(&mut self, available: bool) {
        self.state = if available {
            LibraryState::Ready
        } else {
            LibraryState::Unavailable
        };
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MediaSlot {
    video: Option<VideoRef>,
    state: SlotState,
    play_attempts: u8,
}

impl MediaSlot {
    pub fn for_record(record: &SlideRecord) -> Self {
        let video = record.video().cloned();
        let state = if video.is_some() {
            SlotState::Pending
        } else {
            SlotState::Static
        };
        Self {
            video,
            state,
            play_attempts: 0,
        }
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    pub fn session(&self) -> Option<SessionId> {
        match self.state {
            SlotState::Streaming(session) => Some(session),
            _ => None,
        }
    }

    /// Idempotent: loading a loaded or streaming slot does nothing
    pub fn load<H: CarouselHost>(
        &mut self,
        slide: usize,
        trigger: LoadTrigger,
        library: &mut StreamingLibrary,
        host: &mut H,
    ) -> LoadOutcome {
        match self.state {
            SlotState::Static => return LoadOutcome::NoMedia,
            SlotState::Loaded | SlotState::Streaming(_) => return LoadOutcome::AlreadyLoaded,
            SlotState::AwaitingLibrary => return LoadOutcome::Deferred,
            SlotState::Unavailable => return LoadOutcome::Unavailable,
            SlotState::Pending | SlotState::Detached => {}
        }

        let Some(video) = self.video.as_ref() else {
            return LoadOutcome::NoMedia;
        };

        if video.kind == VideoKind::Progressive || host.supports_native_streaming(slide) {
            host.load_source(slide, &video.url, video.kind);
            self.state = SlotState::Loaded;
            return LoadOutcome::Started;
        }

        // Visibility fetches the library early; sessions are bound to the active slide only
        if trigger == LoadTrigger::Visible {
            library.request(host);
            return LoadOutcome::Deferred;
        }

        match library.state() {
            LibraryState::Ready => self.attach_session(slide, host),
            LibraryState::Unavailable => {
                self.state = SlotState::Unavailable;
                LoadOutcome::Unavailable
            }
            LibraryState::NotRequested | LibraryState::Pending => {
                library.request(host);
                self.state = SlotState::AwaitingLibrary;
                LoadOutcome::Deferred
            }
        }
    }

    fn attach_session<H: CarouselHost>(&mut self, slide: usize, host: &mut H) -> LoadOutcome {
        let Some(video) = self.video.as_ref() else {
            return LoadOutcome::NoMedia;
        };
        match host.create_session(slide, &video.url) {
            Some(session) => {
                self.state = SlotState::Streaming(session);
                LoadOutcome::Started
            }
            None => {
                log::warn!("streaming session refused for slide {}", slide);
                self.state = SlotState::Unavailable;
                LoadOutcome::Unavailable
            }
        }
    }

    /// The library finished loading. Returns true when a session was attached
    /// and playback should start.
    pub fn library_resolved<H: CarouselHost>(
        &mut self,
        slide: usize,
        available: bool,
        is_active: bool,
        host: &mut H,
    ) -> bool {
        if self.state != SlotState::AwaitingLibrary {
            return false;
        }
        if !available {
            self.state = SlotState::Unavailable;
            return false;
        }
        if !is_active {
            self.state = SlotState::Pending;
            return false;
        }
        self.attach_session(slide, host) == LoadOutcome::Started
    }

    /// Destroy the session (if any) so the decoder is released
    pub fn detach<H: CarouselHost>(&mut self, host: &mut H) {
        match self.state {
            SlotState::Streaming(session) => {
                host.destroy_session(session);
                self.state = SlotState::Detached;
            }
            SlotState::AwaitingLibrary => self.state = SlotState::Pending,
            _ => {}
        }
    }

    pub fn reset_attempts(&mut self) {
        self.play_attempts = 0;
    }

    /// Count a rejected play; true if a retry is still allowed
    pub fn record_rejection(&mut self) -> bool {
        self.play_attempts = self.play_attempts.saturating_add(1);
        self.play_attempts == 1
    }
}
