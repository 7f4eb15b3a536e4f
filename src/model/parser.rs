// File: src/model/parser.rs
use crate::model::item::{Instant, ScheduleItem};
use chrono::{Duration, Local, NaiveDate, NaiveTime};
use std::collections::HashMap;
use std::fmt;

/// Sheet line of the first data row: line 1 holds the column headers.
pub const HEADER_ROW_OFFSET: usize = 2;

pub const DEFAULT_DURATION_MINS: i64 = 10;

/// One decoded spreadsheet row, keyed by canonical (lower-case) column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
    /// Sheet line the record starts on, when the decoder knows it.
    line: Option<usize>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K: AsRef<str>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut record = Self::new();
        for (k, v) in pairs {
            record.insert(k.as_ref(), v);
        }
        record
    }

    /// Header names are trimmed and lower-cased, so `From` and ` FROM` both land on `from`.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.fields.insert(normalize_key(key), value.into());
    }

    /// Raw, untrimmed cell value.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.fields.get(&normalize_key(key)).map(String::as_str)
    }

    /// Trimmed cell value, `None` when absent or blank.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.raw(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|v| v.trim().is_empty())
    }
}

pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// A single user-facing rejection message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Sheet line of the rejected row; `None` for whole-file failures.
    pub row_number: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn row(row_number: usize, message: impl Into<String>) -> Self {
        Self {
            row_number: Some(row_number),
            message: message.into(),
        }
    }

    pub fn file(message: impl Into<String>) -> Self {
        Self {
            row_number: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Context the validator needs besides the row itself.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Logical day the parsed wall-clock times are anchored on.
    pub day: NaiveDate,
    /// Duration applied when a row has no end time.
    pub default_duration: Duration,
}

impl ParseOptions {
    pub fn for_day(day: NaiveDate) -> Self {
        Self {
            day,
            default_duration: Duration::minutes(DEFAULT_DURATION_MINS),
        }
    }

    pub fn today() -> Self {
        Self::for_day(Local::now().date_naive())
    }

    pub fn with_default_duration(mut self, minutes: i64) -> Self {
        self.default_duration = Duration::minutes(minutes);
        self
    }
}

/// Strict `HH:mm:ss` parser. Anything but two digits, colon, two digits,
/// colon, two digits within range is rejected.
pub fn parse_clock_time(input: &str) -> Option<NaiveTime> {
    let bytes = input.as_bytes();
    if bytes.len() != 8 || bytes[2] != b':' || bytes[5] != b':' {
        return None;
    }
    let two_digits = |i: usize| -> Option<u32> {
        let (hi, lo) = (bytes[i], bytes[i + 1]);
        if hi.is_ascii_digit() && lo.is_ascii_digit() {
            Some(u32::from(hi - b'0') * 10 + u32::from(lo - b'0'))
        } else {
            None
        }
    };
    let (h, m, s) = (two_digits(0)?, two_digits(3)?, two_digits(6)?);
    // from_hms_opt rejects h > 23, m > 59, s > 59.
    NaiveTime::from_hms_opt(h, m, s)
}

fn truncate_to_minute(t: Instant) -> Instant {
    t - Duration::seconds(i64::from(chrono::Timelike::second(&t)))
}

/// Validates one raw row into a [`ScheduleItem`].
///
/// Diagnostics report the record's sheet line. Records without one fall back
/// to `row_index + 2`, `row_index` being the zero-based data row position.
pub fn validate_row(
    row: &RawRecord,
    row_index: usize,
    options: &ParseOptions,
) -> Result<ScheduleItem, Diagnostic> {
    let row_number = row.line().unwrap_or(row_index + HEADER_ROW_OFFSET);

    let (Some(from_raw), Some(location), Some(description)) = (
        row.field("from"),
        row.field("location"),
        row.field("description"),
    ) else {
        return Err(Diagnostic::row(
            row_number,
            format!("Row {} is missing required fields.", row_number),
        ));
    };

    let Some(from_time) = parse_clock_time(from_raw) else {
        return Err(Diagnostic::row(
            row_number,
            format!(
                "Row {}: Invalid 'from' time format \"{}\".",
                row_number, from_raw
            ),
        ));
    };
    let start = options.day.and_time(from_time);

    let (mut end, end_is_implicit) = match row.field("to") {
        None => (start + options.default_duration, true),
        Some(to_raw) => match parse_clock_time(to_raw) {
            Some(to_time) => (options.day.and_time(to_time), false),
            None => {
                return Err(Diagnostic::row(
                    row_number,
                    format!("Row {}: Invalid 'to' time format \"{}\".", row_number, to_raw),
                ));
            }
        },
    };

    // Overnight span: the end belongs to the next day.
    if truncate_to_minute(start) > truncate_to_minute(end) {
        end += Duration::days(1);
    }
    // Same minute, end a few seconds early: collapse to a zero-length window.
    if end < start {
        end = start;
    }

    let mut item = ScheduleItem::new(
        row.field("title").unwrap_or_default(),
        start,
        end,
        location,
        description,
    );
    item.end_is_implicit = end_is_implicit;
    item.category = row.field("category").map(str::to_lowercase);
    item.special = row.field("special").map(str::to_string);
    Ok(item)
}
