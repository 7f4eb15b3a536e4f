// File: ./src/sheet.rs
//! Decoding of run-down sheets into canonical [`RawRecord`]s.
//!
//! The first line holds column headers; every following non-blank line is one
//! record. Header names are normalized so `From`, `from` and ` FROM ` are the
//! same column. Rows shorter than the header simply lack the trailing fields.
use crate::model::RawRecord;
use anyhow::{Context, Result};
use std::path::Path;

pub fn decode_csv(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let text = std::str::from_utf8(bytes).context("sheet is not valid UTF-8 text")?;
    // Spreadsheet exports often start with a byte-order mark.
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .context("could not read the header row")?
        .clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        anyhow::bail!("the header row is empty");
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.context("malformed sheet data")?;
        // Blank lines and quoted line breaks make positions drift from record counts.
        let line = row.position().map(|p| p.line() as usize);
        let mut record = RawRecord::new();
        for (header, value) in headers.iter().zip(row.iter()) {
            if header.trim().is_empty() {
                continue;
            }
            record.insert(header, value);
        }
        if let Some(line) = line {
            record = record.with_line(line);
        }
        records.push(record);
    }
    Ok(records)
}

/// Reads a sheet from disk. Only the byte read suspends; decoding is synchronous.
pub async fn read_sheet(path: &Path) -> Result<Vec<RawRecord>> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("cannot open '{}'", path.display()))?;
    decode_csv(&bytes)
}
