// File: ./src/autoscroll.rs
//! Viewport tracking for the run-down.
//!
//! While in [`ScrollMode::Auto`] every tick scrolls the container so the
//! relevant row sits just below the sticky headers. Any user scroll hands
//! control to the operator ([`ScrollMode::ManualOverride`]) until a quiet
//! period passes without further scrolling.
use crate::model::{ItemStatus, ScheduleItem, classify};
use chrono::NaiveDateTime;
use std::time::{Duration, Instant};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(5);
pub const DEFAULT_HEADER_OFFSET: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    Auto,
    ManualOverride,
}

/// Who caused a scroll. Only user scrolls affect the override timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOrigin {
    User,
    Controller,
}

/// What the controller needs from whatever renders the rows.
pub trait ScrollViewport {
    /// Offset of the row showing item `id`, relative to the top of the scrollable content.
    fn row_offset(&self, id: &str) -> Option<usize>;
    /// Start an animated scroll towards `offset`.
    fn smooth_scroll_to(&mut self, offset: usize);
}

/// Single-slot timer: arming always replaces the pending deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuietTimer {
    deadline: Option<Instant>,
}

impl QuietTimer {
    pub fn arm(&mut self, at: Instant, period: Duration) {
        self.deadline = Some(at + period);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once, on the first call at or after the deadline.
    pub fn fire_if_due(&mut self, at: Instant) -> bool {
        match self.deadline {
            Some(deadline) if at >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollTarget {
    pub id: String,
    pub status: ItemStatus,
}

/// Picks the item the viewport should show at `now`.
///
/// The first open `Active` item in run-down order wins; failing that the
/// first open `Upcoming` one. Completed and past items are never targeted.
pub fn select_target(items: &[ScheduleItem], now: NaiveDateTime) -> Option<ScrollTarget> {
    let first_with = |wanted: ItemStatus| {
        items
            .iter()
            .filter(|item| !item.completed && classify(item, now) == wanted)
            .min_by(|a, b| a.compare_at(b, now))
    };

    first_with(ItemStatus::Active)
        .map(|item| (item, ItemStatus::Active))
        .or_else(|| first_with(ItemStatus::Upcoming).map(|item| (item, ItemStatus::Upcoming)))
        .map(|(item, status)| ScrollTarget {
            id: item.id.clone(),
            status,
        })
}

#[derive(Debug, Clone)]
pub struct AutoScroll {
    mode: ScrollMode,
    timer: QuietTimer,
    quiet_period: Duration,
    header_offset: usize,
    enabled: bool,
}

impl Default for AutoScroll {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD, DEFAULT_HEADER_OFFSET)
    }
}

impl AutoScroll {
    pub fn new(quiet_period: Duration, header_offset: usize) -> Self {
        Self {
            mode: ScrollMode::Auto,
            timer: QuietTimer::default(),
            quiet_period,
            header_offset,
            enabled: true,
        }
    }

    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn header_offset(&self) -> usize {
        self.header_offset
    }

    /// When a pending override hands control back, if any.
    pub fn resume_deadline(&self) -> Option<Instant> {
        match self.mode {
            ScrollMode::ManualOverride => self.timer.deadline(),
            ScrollMode::Auto => None,
        }
    }

    /// Feeds a scroll event. Returns true when it (re)armed the override.
    pub fn on_scroll(&mut self, origin: ScrollOrigin, at: Instant) -> bool {
        if origin == ScrollOrigin::Controller {
            return false;
        }
        if self.mode == ScrollMode::Auto {
            log::debug!("auto-scroll: user scroll, entering manual override");
        }
        self.mode = ScrollMode::ManualOverride;
        self.timer.arm(at, self.quiet_period);
        true
    }

    /// Returns to `Auto` once the quiet period elapsed. True on the transition.
    pub fn poll_resume(&mut self, at: Instant) -> bool {
        if self.mode == ScrollMode::ManualOverride && self.timer.fire_if_due(at) {
            log::debug!("auto-scroll: quiet period elapsed, resuming");
            self.mode = ScrollMode::Auto;
            return true;
        }
        false
    }

    /// One controller step. Returns the offset it scrolled to, if it scrolled.
    ///
    /// `now` is the wall clock used for classification, `at` the monotonic
    /// instant driving the override timer.
    pub fn tick(
        &mut self,
        items: &[ScheduleItem],
        now: NaiveDateTime,
        at: Instant,
        viewport: Option<&mut dyn ScrollViewport>,
    ) -> Option<usize> {
        self.poll_resume(at);
        if !self.enabled || self.mode != ScrollMode::Auto || items.is_empty() {
            return None;
        }
        let viewport = viewport?;
        let target = select_target(items, now)?;
        let row = viewport.row_offset(&target.id)?;
        let offset = row.saturating_sub(self.header_offset);
        viewport.smooth_scroll_to(offset);
        Some(offset)
    }
}
