// Tests for the auto-scroll controller and its manual override debounce.
use chrono::{NaiveDate, NaiveDateTime};
use rundown::autoscroll::{AutoScroll, ScrollMode, ScrollOrigin, ScrollViewport, select_target};
use rundown::model::{ItemStatus, ScheduleItem};
use std::collections::HashMap;
use std::time::{Duration, Instant};

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 4, 20)
        .and_then(|d| d.and_hms_opt(h, m, 0))
        .unwrap()
}

#[derive(Default)]
struct MockViewport {
    rows: HashMap<String, usize>,
    scrolls: Vec<usize>,
}

impl ScrollViewport for MockViewport {
    fn row_offset(&self, id: &str) -> Option<usize> {
        self.rows.get(id).copied()
    }

    fn smooth_scroll_to(&mut self, offset: usize) {
        self.scrolls.push(offset);
    }
}

fn setup() -> (Vec<ScheduleItem>, MockViewport) {
    let items = vec![
        ScheduleItem::new("past", at(8, 0), at(8, 10), "A", "d"),
        ScheduleItem::new("active", at(9, 0), at(9, 30), "A", "d"),
        ScheduleItem::new("next", at(10, 0), at(10, 10), "A", "d"),
    ];
    let mut viewport = MockViewport::default();
    for (i, item) in items.iter().enumerate() {
        viewport.rows.insert(item.id.clone(), 5 + i * 3);
    }
    (items, viewport)
}

#[test]
fn test_tick_snaps_below_sticky_header() {
    let (items, mut viewport) = setup();
    let mut auto = AutoScroll::default();
    let offset = auto.tick(&items, at(9, 10), Instant::now(), Some(&mut viewport));
    // "active" sits at row 8, minus the two header rows.
    assert_eq!(offset, Some(6));
    assert_eq!(viewport.scrolls, vec![6]);
}

#[test]
fn test_user_scroll_suppresses_snaps_until_quiet() {
    let (items, mut viewport) = setup();
    let mut auto = AutoScroll::default();
    let t0 = Instant::now();
    let now = at(9, 10);

    assert!(auto.on_scroll(ScrollOrigin::User, t0));
    assert_eq!(auto.mode(), ScrollMode::ManualOverride);

    for secs in 1..=4 {
        let tick_at = t0 + Duration::from_secs(secs);
        assert_eq!(auto.tick(&items, now, tick_at, Some(&mut viewport)), None);
    }
    assert!(viewport.scrolls.is_empty());

    let resumed = auto.tick(&items, now, t0 + Duration::from_secs(5), Some(&mut viewport));
    assert_eq!(resumed, Some(6));
    assert_eq!(auto.mode(), ScrollMode::Auto);
}

#[test]
fn test_repeated_user_scrolls_extend_the_override() {
    let (items, mut viewport) = setup();
    let mut auto = AutoScroll::default();
    let t0 = Instant::now();

    auto.on_scroll(ScrollOrigin::User, t0);
    auto.on_scroll(ScrollOrigin::User, t0 + Duration::from_secs(3));
    assert_eq!(auto.resume_deadline(), Some(t0 + Duration::from_secs(8)));

    let tick_at = t0 + Duration::from_secs(6);
    assert_eq!(auto.tick(&items, at(9, 10), tick_at, Some(&mut viewport)), None);
    assert_eq!(auto.mode(), ScrollMode::ManualOverride);

    let tick_at = t0 + Duration::from_secs(8);
    assert!(auto.tick(&items, at(9, 10), tick_at, Some(&mut viewport)).is_some());
}

#[test]
fn test_controller_scrolls_are_ignored() {
    let mut auto = AutoScroll::default();
    assert!(!auto.on_scroll(ScrollOrigin::Controller, Instant::now()));
    assert_eq!(auto.mode(), ScrollMode::Auto);
}

#[test]
fn test_all_completed_means_no_scroll() {
    let (mut items, mut viewport) = setup();
    for item in &mut items {
        item.completed = true;
    }
    let mut auto = AutoScroll::default();
    let t0 = Instant::now();
    for secs in 0..10 {
        let tick_at = t0 + Duration::from_secs(secs);
        assert_eq!(auto.tick(&items, at(9, 10), tick_at, Some(&mut viewport)), None);
    }
    assert!(viewport.scrolls.is_empty());
}

#[test]
fn test_empty_items_and_missing_viewport_are_no_ops() {
    let (items, mut viewport) = setup();
    let mut auto = AutoScroll::default();
    assert_eq!(auto.tick(&[], at(9, 10), Instant::now(), Some(&mut viewport)), None);
    assert_eq!(auto.tick(&items, at(9, 10), Instant::now(), None), None);
    assert!(viewport.scrolls.is_empty());
}

#[test]
fn test_disabled_controller_never_scrolls() {
    let (items, mut viewport) = setup();
    let mut auto = AutoScroll::default();
    auto.set_enabled(false);
    assert_eq!(auto.tick(&items, at(9, 10), Instant::now(), Some(&mut viewport)), None);
}

#[test]
fn test_target_falls_back_to_upcoming() {
    let (mut items, _) = setup();
    items[1].completed = true;
    let target = select_target(&items, at(9, 10)).unwrap();
    assert_eq!(target.id, items[2].id);
    assert_eq!(target.status, ItemStatus::Upcoming);
}

#[test]
fn test_first_active_wins_when_several_overlap() {
    let items = vec![
        ScheduleItem::new("b", at(9, 5), at(9, 30), "A", "d"),
        ScheduleItem::new("a", at(9, 0), at(9, 30), "A", "d"),
    ];
    let target = select_target(&items, at(9, 10)).unwrap();
    assert_eq!(target.id, items[1].id);
    assert_eq!(target.status, ItemStatus::Active);
}

#[test]
fn test_no_target_after_the_show() {
    let (items, _) = setup();
    assert!(select_target(&items, at(23, 0)).is_none());
}
