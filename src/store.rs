// File: src/store.rs
use crate::autoscroll::{AutoScroll, ScrollViewport};
use crate::model::item::truncate_to_second;
use crate::model::{Instant, ItemStatus, ScheduleItem};
use std::time::Instant as MonotonicInstant;

/// Consecutive run of sorted items sharing the same start hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// `HH:00`
    pub label: String,
    pub items: Vec<ScheduleItem>,
}

/// Returns a freshly sorted copy of `items` for instant `now`.
pub fn sort_items(items: &[ScheduleItem], now: Instant) -> Vec<ScheduleItem> {
    let mut sorted = items.to_vec();
    // Stable: items equal on every key keep import order.
    sorted.sort_by(|a, b| a.compare_at(b, now));
    sorted
}

/// Sorts `items` and groups consecutive runs by start hour.
///
/// Buckets follow the sorted order, so the same label can appear twice when
/// e.g. an active item from 09:00 sorts ahead of upcoming 09:00 items.
pub fn arrange(items: &[ScheduleItem], now: Instant) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();
    for item in sort_items(items, now) {
        let label = item.bucket_label();
        match buckets.last_mut() {
            Some(bucket) if bucket.label == label => bucket.items.push(item),
            _ => buckets.push(Bucket {
                label,
                items: vec![item],
            }),
        }
    }
    buckets
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub active: usize,
    pub past: usize,
    pub upcoming: usize,
    pub completed: usize,
}

/// Per-session state: the item set, the live clock and the scroll controller.
#[derive(Debug, Clone)]
pub struct RunState {
    pub items: Vec<ScheduleItem>,
    pub now: Instant,
    pub autoscroll: AutoScroll,
}

impl RunState {
    pub fn new(now: Instant, autoscroll: AutoScroll) -> Self {
        Self {
            items: Vec::new(),
            now: truncate_to_second(now),
            autoscroll,
        }
    }

    /// Swaps in a whole new item set. Completion state is not carried over.
    pub fn replace_items(&mut self, items: Vec<ScheduleItem>) {
        log::info!(
            "Replacing run-down: {} -> {} item(s)",
            self.items.len(),
            items.len()
        );
        self.items = items;
    }

    pub fn set_now(&mut self, now: Instant) {
        self.now = truncate_to_second(now);
    }

    pub fn get(&self, id: &str) -> Option<&ScheduleItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// The only mutation path for items after import.
    pub fn toggle_completed(&mut self, id: &str) -> Option<bool> {
        let item = self.items.iter_mut().find(|i| i.id == id)?;
        let completed = item.toggle_completed();
        log::debug!("Item '{}' completed={}", item.title, completed);
        Some(completed)
    }

    pub fn view(&self) -> Vec<Bucket> {
        arrange(&self.items, self.now)
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for item in &self.items {
            if item.completed {
                counts.completed += 1;
                continue;
            }
            match item.status_at(self.now) {
                ItemStatus::Active => counts.active += 1,
                ItemStatus::Past => counts.past += 1,
                ItemStatus::Upcoming => counts.upcoming += 1,
            }
        }
        counts
    }

    /// Clock tick: refresh `now`, then let the controller track the view.
    pub fn tick(
        &mut self,
        now: Instant,
        at: MonotonicInstant,
        viewport: Option<&mut dyn ScrollViewport>,
    ) -> Option<usize> {
        self.set_now(now);
        self.autoscroll.tick(&self.items, self.now, at, viewport)
    }
}
