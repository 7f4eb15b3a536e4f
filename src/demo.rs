// File: ./src/demo.rs
// Random placeholder run-down shown when nothing has been imported yet.
use crate::model::{Instant, ScheduleItem};
use chrono::{Duration, DurationRound};

pub const DEMO_SIZE: usize = 50;

/// `count` items starting within two hours of the current hour.
pub fn generate(count: usize, now: Instant) -> Vec<ScheduleItem> {
    let base = now.duration_trunc(Duration::hours(1)).unwrap_or(now);
    (0..count)
        .map(|i| {
            let start = base + Duration::minutes(fastrand::i64(0..120));
            let end = start + Duration::minutes(fastrand::i64(5..35));
            let mut item = ScheduleItem::new(
                &format!("Event {}", i + 1),
                start,
                end,
                &format!("Loc {}", fastrand::u32(1..=10)),
                &format!("Desc {}", i + 1),
            );
            if fastrand::f32() < 0.2 {
                item.special = Some("attention".to_string());
            }
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_demo_items_are_well_formed() {
        let now = NaiveDate::from_ymd_opt(2026, 5, 1)
            .and_then(|d| d.and_hms_opt(14, 37, 12))
            .unwrap();
        let items = generate(DEMO_SIZE, now);
        assert_eq!(items.len(), DEMO_SIZE);
        let hour = now.duration_trunc(Duration::hours(1)).unwrap();
        for item in &items {
            assert!(item.start >= hour && item.start < hour + Duration::hours(2));
            assert!(item.end > item.start);
            assert!(!item.completed);
        }
    }
}
