// Tests for persisting the run-down and the export command.
use chrono::NaiveDate;
use rundown::cli::{check_sheet, export_json};
use rundown::context::{AppContext, TestContext};
use rundown::model::{ParseOptions, ScheduleItem};
use rundown::storage::LocalStorage;
use std::fs;

fn sample() -> Vec<ScheduleItem> {
    let day = NaiveDate::from_ymd_opt(2026, 4, 20).unwrap();
    let mut a = ScheduleItem::new(
        "Open",
        day.and_hms_opt(23, 50, 0).unwrap(),
        day.succ_opt().unwrap().and_hms_opt(0, 10, 0).unwrap(),
        "Studio A",
        "Welcome",
    );
    a.category = Some("intro".to_string());
    a.special = Some("live".to_string());
    a.completed = true;
    let mut b = ScheduleItem::new(
        "News",
        day.and_hms_opt(9, 0, 0).unwrap(),
        day.and_hms_opt(9, 10, 0).unwrap(),
        "Studio B",
        "Headlines",
    );
    b.end_is_implicit = true;
    vec![a, b]
}

#[test]
fn test_save_then_load_preserves_every_field() {
    let ctx = TestContext::new();
    let items = sample();
    LocalStorage::save(&ctx, &items).unwrap();
    assert_eq!(LocalStorage::load(&ctx).unwrap(), items);
}

#[test]
fn test_save_overwrites_previous_run_down() {
    let ctx = TestContext::new();
    LocalStorage::save(&ctx, &sample()).unwrap();
    LocalStorage::save(&ctx, &[]).unwrap();
    assert!(LocalStorage::load(&ctx).unwrap().is_empty());
}

#[test]
fn test_bare_array_is_accepted() {
    let items = sample();
    let json = serde_json::to_string(&items).unwrap();
    assert_eq!(LocalStorage::from_json_str(&json).unwrap(), items);
}

#[test]
fn test_export_matches_storage_format() {
    let ctx = TestContext::new();
    LocalStorage::save(&ctx, &sample()).unwrap();
    let exported = export_json(&ctx).unwrap();
    let on_disk = fs::read_to_string(ctx.get_rundown_path().unwrap()).unwrap();
    assert_eq!(exported, on_disk);
    let value: serde_json::Value = serde_json::from_str(&exported).unwrap();
    assert_eq!(value["version"], 1);
    assert_eq!(value["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_check_reports_rejected_rows() {
    let ctx = TestContext::new();
    let path = ctx.get_data_dir().unwrap().join("show.csv");
    fs::write(
        &path,
        "from,to,location,description\n09:00:00,,A,Open\n9am,,A,Bad\n",
    )
    .unwrap();
    let opts = ParseOptions::for_day(NaiveDate::from_ymd_opt(2026, 4, 20).unwrap());
    let mut out = Vec::new();
    let problems = check_sheet(&path, &opts, &mut out).await.unwrap();
    assert_eq!(problems, 1);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("1 item(s) accepted"));
    assert!(text.contains("09:00 - ~09:10  Untitled @ A"));
    assert!(text.contains("Row 3: Invalid 'from' time format \"9am\"."));
}
