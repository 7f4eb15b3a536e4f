// File: ./src/tui/state.rs
// Manages the application state for the TUI.
use crate::autoscroll::{ScrollOrigin, ScrollViewport};
use crate::config::Config;
use crate::context::SharedContext;
use crate::demo;
use crate::import::ImportReport;
use crate::model::{Diagnostic, Instant, ScheduleItem};
use crate::storage::LocalStorage;
use crate::store::{Bucket, RunState};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant as MonotonicInstant;

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum InputMode {
    Normal,
    Importing,
}

/// Where the items on screen came from. Only a `Stored` set is written back.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum ItemSource {
    Stored,
    Demo,
    /// The store exists but could not be read; it is left untouched until an import.
    Unreadable,
}

/// One rendered line of the timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Hour(String),
    Item(ScheduleItem),
}

/// Scroll position of the timeline, in rows.
#[derive(Debug, Default, Clone)]
pub struct Viewport {
    pub offset: usize,
    target: usize,
    pub height: usize,
    content_len: usize,
    row_index: HashMap<String, usize>,
}

impl Viewport {
    pub fn set_content(&mut self, rows: &[Row]) {
        self.row_index.clear();
        for (i, row) in rows.iter().enumerate() {
            if let Row::Item(item) = row {
                self.row_index.insert(item.id.clone(), i);
            }
        }
        self.content_len = rows.len();
        self.offset = self.offset.min(self.max_offset());
        self.target = self.target.min(self.max_offset());
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
        self.target = self.target.min(self.max_offset());
    }

    pub fn max_offset(&self) -> usize {
        self.content_len.saturating_sub(self.height)
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Immediate scroll, cancelling any animation. Returns true if the offset moved.
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        let before = self.offset;
        self.offset = before.saturating_add_signed(delta).min(self.max_offset());
        self.target = self.offset;
        self.offset != before
    }

    /// Minimal scroll that brings `row` into view. Returns true if the offset moved.
    pub fn reveal(&mut self, row: usize) -> bool {
        let before = self.offset;
        if row < self.offset {
            self.offset = row;
        } else if self.height > 0 && row >= self.offset + self.height {
            self.offset = row + 1 - self.height;
        }
        self.offset = self.offset.min(self.max_offset());
        self.target = self.offset;
        self.offset != before
    }

    /// Advances the smooth scroll by one frame. Returns true while still moving.
    pub fn animate(&mut self) -> bool {
        if self.offset == self.target {
            return false;
        }
        let distance = self.offset.abs_diff(self.target);
        let step = (distance / 3).max(1);
        if self.offset < self.target {
            self.offset += step;
        } else {
            self.offset -= step;
        }
        true
    }
}

impl ScrollViewport for Viewport {
    fn row_offset(&self, id: &str) -> Option<usize> {
        self.row_index.get(id).copied()
    }

    fn smooth_scroll_to(&mut self, offset: usize) {
        self.target = offset.min(self.max_offset());
    }
}

pub struct AppState {
    // Data
    pub ctx: SharedContext,
    pub config: Config,
    pub run: RunState,
    pub buckets: Vec<Bucket>,
    pub rows: Vec<Row>,
    pub source: ItemSource,

    // UI State
    pub viewport: Viewport,
    pub selected_id: Option<String>,
    pub mode: InputMode,
    pub message: String,
    pub show_full_help: bool,

    // Import diagnostics, shown until dismissed
    pub diagnostics: Vec<Diagnostic>,

    // Input Buffers
    pub input_buffer: String,
    pub cursor_position: usize,
}

impl AppState {
    pub fn new_with_ctx(ctx: SharedContext, config: Config, now: Instant) -> Self {
        let run = RunState::new(now, config.autoscroll());
        let mut state = Self {
            ctx,
            config,
            run,
            buckets: Vec::new(),
            rows: Vec::new(),
            source: ItemSource::Stored,
            viewport: Viewport::default(),
            selected_id: None,
            mode: InputMode::Normal,
            message: "Ready.".to_string(),
            show_full_help: false,
            diagnostics: Vec::new(),
            input_buffer: String::new(),
            cursor_position: 0,
        };
        state.refresh_view();
        state
    }

    /// Loads the stored run-down, or a demo one when there is none.
    pub fn restore(&mut self) {
        match LocalStorage::load(self.ctx.as_ref()) {
            Ok(items) if !items.is_empty() => {
                self.message = format!("Loaded {} item(s).", items.len());
                self.run.replace_items(items);
                self.source = ItemSource::Stored;
            }
            Ok(_) => {
                self.message = "No run-down stored, showing demo. Press i to import.".to_string();
                self.run
                    .replace_items(demo::generate(demo::DEMO_SIZE, self.run.now));
                self.source = ItemSource::Demo;
            }
            Err(e) => {
                log::warn!("Could not load stored run-down: {:#}", e);
                self.message = format!("Error: {:#} (showing demo, changes are not saved)", e);
                self.run
                    .replace_items(demo::generate(demo::DEMO_SIZE, self.run.now));
                self.source = ItemSource::Unreadable;
            }
        }
        self.refresh_view();
    }

    /// Rebuilds the ordered view for the current clock.
    pub fn refresh_view(&mut self) {
        self.buckets = self.run.view();
        self.rows.clear();
        for bucket in &self.buckets {
            self.rows.push(Row::Hour(bucket.label.clone()));
            self.rows
                .extend(bucket.items.iter().cloned().map(Row::Item));
        }
        self.viewport.set_content(&self.rows);

        let still_there = self
            .selected_id
            .as_deref()
            .is_some_and(|id| self.run.get(id).is_some());
        if !still_there {
            self.selected_id = self.item_ids().first().map(|id| id.to_string());
        }
    }

    /// Clock tick: reclassify, reorder, and let auto-scroll follow.
    pub fn on_tick(&mut self, now: Instant, at: MonotonicInstant) -> Option<usize> {
        self.run.set_now(now);
        self.refresh_view();
        self.run.tick(now, at, Some(&mut self.viewport))
    }

    pub fn item_ids(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|r| match r {
                Row::Item(item) => Some(item.id.as_str()),
                Row::Hour(_) => None,
            })
            .collect()
    }

    pub fn get_selected_item(&self) -> Option<&ScheduleItem> {
        self.selected_id.as_deref().and_then(|id| self.run.get(id))
    }

    fn selected_position(&self, ids: &[&str]) -> Option<usize> {
        let sel = self.selected_id.as_deref()?;
        ids.iter().position(|id| *id == sel)
    }

    // --- NAVIGATION ---
    pub fn next(&mut self, at: MonotonicInstant) {
        let ids = self.item_ids();
        if ids.is_empty() {
            return;
        }
        let i = match self.selected_position(&ids) {
            Some(i) if i + 1 < ids.len() => i + 1,
            _ => 0,
        };
        let id = ids[i].to_string();
        self.select(id, at);
    }

    pub fn previous(&mut self, at: MonotonicInstant) {
        let ids = self.item_ids();
        if ids.is_empty() {
            return;
        }
        let i = match self.selected_position(&ids) {
            Some(0) | None => ids.len() - 1,
            Some(i) => i - 1,
        };
        let id = ids[i].to_string();
        self.select(id, at);
    }

    /// Selects an item and brings it into view. Moving the view counts as a user scroll.
    fn select(&mut self, id: String, at: MonotonicInstant) {
        if let Some(row) = self.viewport.row_offset(&id)
            && self.viewport.reveal(row)
        {
            self.run.autoscroll.on_scroll(ScrollOrigin::User, at);
        }
        self.selected_id = Some(id);
    }

    /// Operator scroll (wheel, page keys).
    pub fn user_scroll(&mut self, delta: isize, at: MonotonicInstant) {
        self.viewport.scroll_by(delta);
        // Even a scroll that hits the edge signals the operator wants control.
        self.run.autoscroll.on_scroll(ScrollOrigin::User, at);
    }

    pub fn toggle_auto_scroll(&mut self) {
        let enabled = !self.run.autoscroll.is_enabled();
        self.run.autoscroll.set_enabled(enabled);
        self.message = if enabled {
            "Auto-scroll on.".to_string()
        } else {
            "Auto-scroll off.".to_string()
        };
    }

    pub fn toggle_selected(&mut self) -> Option<bool> {
        let id = self.selected_id.clone()?;
        let completed = self.run.toggle_completed(&id)?;
        self.refresh_view();
        self.persist();
        Some(completed)
    }

    /// Replaces the run-down with an import result, failed or not.
    pub fn apply_import(&mut self, path: &Path, report: ImportReport) {
        let accepted = report.items.len();
        let rejected = report.diagnostics.len();
        self.run.replace_items(report.items);
        self.diagnostics = report.diagnostics;
        self.selected_id = None;
        self.source = ItemSource::Stored;
        self.refresh_view();
        self.persist();
        self.message = format!(
            "Imported {} item(s) from {} ({} rejected).",
            accepted,
            path.display(),
            rejected
        );
    }

    pub fn dismiss_diagnostics(&mut self) {
        self.diagnostics.clear();
    }

    fn persist(&mut self) {
        if self.source != ItemSource::Stored {
            log::debug!("Not saving {:?} run-down", self.source);
            return;
        }
        if let Err(e) = LocalStorage::save(self.ctx.as_ref(), &self.run.items) {
            log::warn!("Failed to save run-down: {:#}", e);
            self.message = format!("Error: could not save ({:#})", e);
        }
    }

    // --- INPUT HELPERS ---
    pub fn move_cursor_left(&mut self) {
        let cursor_moved_left = self.cursor_position.saturating_sub(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_left);
    }
    pub fn move_cursor_right(&mut self) {
        let cursor_moved_right = self.cursor_position.saturating_add(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_right);
    }
    pub fn enter_char(&mut self, new_char: char) {
        // Safe insertion for UTF-8 strings
        let byte_index = self
            .input_buffer
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.input_buffer.len());

        self.input_buffer.insert(byte_index, new_char);
        self.move_cursor_right();
    }
    pub fn delete_char(&mut self) {
        if self.cursor_position != 0 {
            let current_index = self.cursor_position;
            let before = self.input_buffer.chars().take(current_index - 1);
            let after = self.input_buffer.chars().skip(current_index);
            self.input_buffer = before.chain(after).collect();
            self.move_cursor_left();
        }
    }
    pub fn reset_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }
    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.clamp(0, self.input_buffer.chars().count())
    }
}
