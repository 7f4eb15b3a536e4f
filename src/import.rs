// File: ./src/import.rs
// Turns decoded sheet rows into schedule items plus per-row diagnostics.
use crate::model::{Diagnostic, ParseOptions, RawRecord, ScheduleItem, validate_row};
use crate::sheet;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub items: Vec<ScheduleItem>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ImportReport {
    /// Report for a sheet that could not be read at all.
    pub fn failed(reason: impl std::fmt::Display) -> Self {
        Self {
            items: Vec::new(),
            diagnostics: vec![Diagnostic::file(format!("Failed to read file: {}", reason))],
        }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Validates every row on its own. A bad row never aborts the import.
///
/// Fully blank rows (trailing spreadsheet lines) are skipped without a
/// diagnostic but still count towards the sheet line numbering.
pub fn import_sheet(rows: &[RawRecord], options: &ParseOptions) -> ImportReport {
    let mut report = ImportReport::default();

    for (index, row) in rows.iter().enumerate() {
        if row.is_empty() {
            continue;
        }
        match validate_row(row, index, options) {
            Ok(item) => report.items.push(item),
            Err(diag) => {
                log::debug!("rejected sheet row: {}", diag);
                report.diagnostics.push(diag);
            }
        }
    }

    log::info!(
        "Imported {} item(s), rejected {} row(s)",
        report.items.len(),
        report.diagnostics.len()
    );
    report
}

/// Decodes raw sheet bytes and imports them.
pub fn import_bytes(bytes: &[u8], options: &ParseOptions) -> ImportReport {
    match sheet::decode_csv(bytes) {
        Ok(rows) => import_sheet(&rows, options),
        Err(e) => {
            log::warn!("Sheet decoding failed: {:#}", e);
            ImportReport::failed(format!("{:#}", e))
        }
    }
}

/// Reads and imports a sheet file. IO failures degrade to a file-level diagnostic.
pub async fn import_file(path: &Path, options: &ParseOptions) -> ImportReport {
    match sheet::read_sheet(path).await {
        Ok(rows) => import_sheet(&rows, options),
        Err(e) => {
            log::warn!("Import of '{}' failed: {:#}", path.display(), e);
            ImportReport::failed(format!("{:#}", e))
        }
    }
}
