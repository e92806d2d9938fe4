//! Autoplay timer bookkeeping
//!
//! The timer is never paused: hovering cancels it and leaving starts a fresh
//! full period. Manual navigation does the same cancel-and-recreate.

use super::host::{CarouselHost, TimerId};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Autoplay {
    enabled: bool,
    period_ms: u32,
    timer: Option<TimerId>,
    hovered: bool,
}

impl Autoplay {
    pub fn new(enabled: bool, period_ms: u32) -> Self {
        Self {
            enabled,
            period_ms,
            timer: None,
            hovered: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// True for the live timer; ticks from cancelled timers are stale
    pub fn is_current(&self, timer: TimerId) -> bool {
        self.timer == Some(timer)
    }

    pub fn start<H: CarouselHost>(&mut self, host: &mut H) {
        if !self.enabled || self.hovered || self.timer.is_some() {
            return;
        }
        self.timer = Some(host.schedule_autoplay(self.period_ms));
    }

    pub fn cancel<H: CarouselHost>(&mut self, host: &mut H) {
        if let Some(timer) = self.timer.take() {
            host.cancel_autoplay(timer);
        }
    }

    pub fn restart<H: CarouselHost>(&mut self, host: &mut H) {
        self.cancel(host);
        self.start(host);
    }

    pub fn pointer_enter<H: CarouselHost>(&mut self, host: &mut H) {
        self.hovered = true;
        self.cancel(host);
    }

    pub fn pointer_leave<H: CarouselHost>(&mut self, host: &mut H) {
        self.hovered = false;
        self.restart(host);
    }
}
