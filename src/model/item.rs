// File: ./src/model/item.rs
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::EnumIter;
use uuid::Uuid;

/// A point in local wall-clock time at second granularity.
///
/// Times are anchored on the schedule's logical day; an end time shifted past
/// midnight simply lands on the next calendar date.
pub type Instant = NaiveDateTime;

pub const UNTITLED: &str = "Untitled";

fn default_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleItem {
    #[serde(default = "default_id")]
    pub id: String,
    pub title: String,
    pub start: Instant,
    pub end: Instant,
    #[serde(default)]
    pub end_is_implicit: bool,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub special: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Temporal state of an item relative to the clock.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, EnumIter)]
pub enum ItemStatus {
    Past,
    Active,
    Upcoming,
}

impl ItemStatus {
    /// Display rank among non-completed items. Lower sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            ItemStatus::Active => 0,
            ItemStatus::Past => 1,
            ItemStatus::Upcoming => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Past => "past",
            ItemStatus::Active => "on air",
            ItemStatus::Upcoming => "upcoming",
        }
    }
}

/// Rank used for completed items: below every temporal status.
const COMPLETED_RANK: u8 = 3;

/// Drops the sub-second part so comparisons happen at second granularity.
pub fn truncate_to_second(t: Instant) -> Instant {
    t.with_nanosecond(0).unwrap_or(t)
}

/// Classifies `item` against `now`.
///
/// `Past` when `now` is strictly after `end`, `Active` for the closed window
/// `[start, end]`, `Upcoming` otherwise. `completed` is not consulted.
pub fn classify(item: &ScheduleItem, now: Instant) -> ItemStatus {
    debug_assert!(
        item.end >= item.start,
        "schedule item '{}' ends before it starts ({} < {})",
        item.title,
        item.end,
        item.start
    );
    let now = truncate_to_second(now);
    if now > item.end {
        ItemStatus::Past
    } else if now >= item.start {
        ItemStatus::Active
    } else {
        ItemStatus::Upcoming
    }
}

impl ScheduleItem {
    pub fn new(title: &str, start: Instant, end: Instant, location: &str, description: &str) -> Self {
        let title = title.trim();
        Self {
            id: default_id(),
            title: if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title.to_string()
            },
            start,
            end,
            end_is_implicit: false,
            location: location.trim().to_string(),
            description: description.trim().to_string(),
            category: None,
            special: None,
            completed: false,
        }
    }

    pub fn status_at(&self, now: Instant) -> ItemStatus {
        classify(self, now)
    }

    /// Combined display rank: completed items sink below every temporal state.
    pub fn display_rank(&self, now: Instant) -> u8 {
        if self.completed {
            COMPLETED_RANK
        } else {
            classify(self, now).rank()
        }
    }

    /// Total order used by the run-down view at instant `now`.
    pub fn compare_at(&self, other: &Self, now: Instant) -> Ordering {
        self.display_rank(now)
            .cmp(&other.display_rank(now))
            .then_with(|| self.start.cmp(&other.start))
            .then_with(|| self.end.cmp(&other.end))
            .then_with(|| self.location.cmp(&other.location))
    }

    /// Label of the hour bucket this item belongs to, e.g. `09:00`.
    pub fn bucket_label(&self) -> String {
        self.start.format("%H:00").to_string()
    }

    /// `HH:MM - HH:MM`, implicit ends are marked with `~`.
    pub fn time_range(&self) -> String {
        let end = self.end.format("%H:%M");
        if self.end_is_implicit {
            format!("{} - ~{}", self.start.format("%H:%M"), end)
        } else {
            format!("{} - {}", self.start.format("%H:%M"), end)
        }
    }

    /// Flips the manual completion flag and returns the new value.
    pub fn toggle_completed(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}
