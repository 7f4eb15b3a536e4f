// File: ./src/model/mod.rs
pub mod item;
pub mod parser;

pub use item::{Instant, ItemStatus, ScheduleItem, classify};
pub use parser::{Diagnostic, ParseOptions, RawRecord, validate_row};
