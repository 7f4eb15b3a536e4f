// Tests for run-down ordering and hour bucketing.
use chrono::{NaiveDate, NaiveDateTime};
use rundown::model::ScheduleItem;
use rundown::store::{arrange, sort_items};

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 4, 20)
        .and_then(|d| d.and_hms_opt(h, m, 0))
        .unwrap()
}

fn item(title: &str, start: (u32, u32), end: (u32, u32), location: &str) -> ScheduleItem {
    ScheduleItem::new(title, at(start.0, start.1), at(end.0, end.1), location, "d")
}

fn titles(items: &[ScheduleItem]) -> Vec<&str> {
    items.iter().map(|i| i.title.as_str()).collect()
}

#[test]
fn test_active_items_sort_by_start() {
    let items = vec![
        item("later", (9, 5), (9, 30), "A"),
        item("earlier", (9, 0), (9, 30), "A"),
    ];
    let sorted = sort_items(&items, at(9, 10));
    assert_eq!(titles(&sorted), vec!["earlier", "later"]);
}

#[test]
fn test_status_rank_order() {
    let mut done = item("done", (9, 0), (9, 30), "A");
    done.completed = true;
    let items = vec![
        item("upcoming", (11, 0), (11, 10), "A"),
        done,
        item("past", (8, 0), (8, 10), "A"),
        item("active", (9, 0), (9, 30), "A"),
    ];
    let sorted = sort_items(&items, at(9, 15));
    assert_eq!(titles(&sorted), vec!["active", "past", "upcoming", "done"]);
}

#[test]
fn test_tie_breaks_on_end_then_location() {
    let items = vec![
        item("b-long", (10, 0), (10, 30), "B"),
        item("b-short", (10, 0), (10, 10), "B"),
        item("a-short", (10, 0), (10, 10), "A"),
    ];
    let sorted = sort_items(&items, at(8, 0));
    assert_eq!(titles(&sorted), vec!["a-short", "b-short", "b-long"]);
}

#[test]
fn test_location_compare_is_case_sensitive() {
    let items = vec![
        item("lower", (10, 0), (10, 10), "alpha"),
        item("upper", (10, 0), (10, 10), "Beta"),
    ];
    let sorted = sort_items(&items, at(8, 0));
    assert_eq!(titles(&sorted), vec!["upper", "lower"]);
}

#[test]
fn test_full_ties_keep_input_order() {
    let items = vec![
        item("first", (10, 0), (10, 10), "A"),
        item("second", (10, 0), (10, 10), "A"),
    ];
    let sorted = sort_items(&items, at(8, 0));
    assert_eq!(titles(&sorted), vec!["first", "second"]);
}

#[test]
fn test_sorting_is_idempotent_and_non_destructive() {
    let items = vec![
        item("c", (11, 0), (11, 10), "A"),
        item("a", (8, 0), (8, 10), "A"),
        item("b", (9, 0), (9, 30), "A"),
    ];
    let once = sort_items(&items, at(9, 15));
    let twice = sort_items(&once, at(9, 15));
    assert_eq!(once, twice);
    assert_eq!(titles(&items), vec!["c", "a", "b"]);
}

#[test]
fn test_buckets_cover_every_item_in_order() {
    let items = vec![
        item("n1", (9, 0), (9, 10), "A"),
        item("n2", (9, 40), (9, 50), "A"),
        item("m1", (10, 15), (10, 20), "A"),
    ];
    let buckets = arrange(&items, at(8, 0));
    let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["09:00", "10:00"]);
    let flattened: Vec<ScheduleItem> = buckets.into_iter().flat_map(|b| b.items).collect();
    assert_eq!(flattened, sort_items(&items, at(8, 0)));
}

#[test]
fn test_bucket_labels_can_repeat() {
    // At 09:20 the 09:15 item is active and jumps ahead of the past 08:00
    // item, which in turn precedes the upcoming 09:45 item.
    let items = vec![
        item("past", (8, 0), (8, 10), "A"),
        item("active", (9, 15), (9, 30), "A"),
        item("upcoming", (9, 45), (9, 50), "A"),
    ];
    let buckets = arrange(&items, at(9, 20));
    let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["09:00", "08:00", "09:00"]);
    assert!(buckets.iter().all(|b| !b.items.is_empty()));
}

#[test]
fn test_empty_input_has_no_buckets() {
    assert!(arrange(&[], at(9, 0)).is_empty());
}
