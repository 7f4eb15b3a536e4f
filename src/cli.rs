// File: ./src/cli.rs
//! Shared command-line interface logic: help text and the non-interactive commands.
use crate::context::AppContext;
use crate::import;
use crate::model::ParseOptions;
use crate::storage::LocalStorage;
use anyhow::Result;
use std::io::Write;
use std::path::Path;

pub fn print_help(binary_name: &str) {
    println!(
        "Rundown v{} - Live studio run-down display (TUI)",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>] [file.csv]", binary_name);
    println!("    {} check <file.csv>", binary_name);
    println!("    {} export", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    <file.csv>            Import a run-down sheet on startup.");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("CHECK COMMAND:");
    println!(
        "    {} check show.csv          Validate a sheet, list accepted rows and problems",
        binary_name
    );
    println!("                                  Exits with status 1 if any row was rejected.");
    println!();
    println!("EXPORT COMMAND:");
    println!(
        "    {} export > backup.json    Print the stored run-down as JSON",
        binary_name
    );
    println!();
    println!("SHEET FORMAT:");
    println!("    First line is the header. Column names are case-insensitive.");
    println!("    title        Item title (blank: \"Untitled\")");
    println!("    from         Start time, HH:mm:ss (required)");
    println!("    to           End time, HH:mm:ss (optional)");
    println!("    location     Studio or place (required)");
    println!("    description  Free text (required)");
    println!("    category     Tag, colored in the timeline (optional)");
    println!("    special      Callout shown next to the item (optional)");
    println!();
    println!("KEYBINDINGS:");
    println!("    Press '?' inside the app for full interactive help");
}

/// Validates a sheet and writes a report to `out`.
/// Returns the number of rejected rows (a file-level failure counts as one).
pub async fn check_sheet<W: Write>(
    path: &Path,
    options: &ParseOptions,
    out: &mut W,
) -> Result<usize> {
    let report = import::import_file(path, options).await;

    writeln!(out, "{}: {} item(s) accepted", path.display(), report.items.len())?;
    for item in &report.items {
        let mut line = format!("  {}  {}", item.time_range(), item.title);
        if !item.location.is_empty() {
            line.push_str(&format!(" @ {}", item.location));
        }
        if let Some(category) = &item.category {
            line.push_str(&format!(" #{}", category));
        }
        writeln!(out, "{}", line)?;
    }
    if !report.diagnostics.is_empty() {
        writeln!(out, "{} problem(s):", report.diagnostics.len())?;
        for diag in &report.diagnostics {
            writeln!(out, "  {}", diag)?;
        }
    }
    Ok(report.diagnostics.len())
}

/// Stored run-down in its JSON storage format.
pub fn export_json(ctx: &dyn AppContext) -> Result<String> {
    let items = LocalStorage::load(ctx)?;
    LocalStorage::to_json_string(&items)
}
