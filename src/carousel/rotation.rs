//! Active-index arithmetic and windowing

use crate::models::DisplayMode;
use serde::{Deserialize, Serialize};

/// Where a slide sits after a transition
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Hidden,
    /// Visible at this position of the window (CSS `order`)
    Shown { order: usize },
}

/// Wrap-around rotation over `count` slides
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rotation {
    active: usize,
    count: usize,
    mode: DisplayMode,
}

impl Rotation {
    pub fn new(count: usize, mode: DisplayMode) -> Self {
        Self { active: 0, count, mode }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Map any signed index into `[0, count)`
    pub fn normalize(&self, index: i64) -> usize {
        if self.count == 0 {
            return 0;
        }
        index.rem_euclid(self.count as i64) as usize
    }

    /// Advance by one, wrapping. Returns the new active index.
    pub fn next(&mut self) -> usize {
        self.active = self.normalize(self.active as i64 + 1);
        self.active
    }

    /// Retreat by one, wrapping. Returns the new active index.
    pub fn prev(&mut self) -> usize {
        self.active = self.normalize(self.active as i64 - 1);
        self.active
    }

    /// Jump to a slide the user clicked: windowed mode only, visible, not already active
    pub fn select(&mut self, index: usize) -> Option<usize> {
        let selectable = matches!(self.mode, DisplayMode::Windowed { .. })
            && index != self.active
            && self.is_visible(index);
        if !selectable {
            return None;
        }
        self.active = index;
        Some(index)
    }

    /// Indices currently on display, in window order
    pub fn window(&self) -> Vec<usize> {
        let shown = self.mode.slides_to_show().min(self.count);
        (0..shown).map(|i| (self.active + i) % self.count).collect()
    }

    pub fn is_visible(&self, index: usize) -> bool {
        index < self.count && self.window().contains(&index)
    }

    /// Placement of every slide, indexed by slide
    pub fn placements(&self) -> Vec<Placement> {
        let mut placements = vec![Placement::Hidden; self.count];
        for (order, index) in self.window().into_iter().enumerate() {
            placements[index] = Placement::Shown { order };
        }
        placements
    }
}
