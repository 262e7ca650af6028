//! Export, import, and clear command handlers
//!
//! Import and clear are destructive full replaces; both confirm before
//! acting unless `--yes` is passed.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use bookish_core::Library;

use crate::output::Output;
use crate::prompt::confirm;

/// Export the whole library to a JSON file
pub fn export(library: &Library, path: Option<PathBuf>, output: &Output) -> Result<()> {
    if library.total_books() == 0 {
        bail!("No data to export. Add some books first!");
    }

    let snapshot = library.export_snapshot();
    let path = path.unwrap_or_else(|| {
        PathBuf::from(format!("bookish-library-{}.json", snapshot.export_date))
    });

    let content =
        serde_json::to_string_pretty(&snapshot).context("Failed to encode snapshot")?;
    fs::write(&path, content)
        .with_context(|| format!("Failed to write export file: {:?}", path))?;

    output.success(&format!(
        "Exported {} books to {}",
        snapshot.total_books,
        path.display()
    ));
    Ok(())
}

/// Import a library snapshot, replacing all current data
pub fn import(library: &mut Library, path: PathBuf, yes: bool, output: &Output) -> Result<()> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        bail!("Please select a JSON file");
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read import file: {:?}", path))?;
    let raw: Value =
        serde_json::from_str(&content).context("Invalid JSON file or corrupted data")?;

    // Validate up front so the confirmation shows real numbers and a bad
    // payload is rejected before any prompt.
    let preview = bookish_core::Snapshot::from_value(&raw)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    if !yes {
        if !output.should_prompt() {
            bail!("Import replaces all current data; pass --yes to confirm");
        }
        println!("This will replace all your current data with:");
        output.print_snapshot_summary(&preview);
        if !confirm("Are you sure you want to continue?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let summary = library
        .import_snapshot(&raw)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    output.success(&format!("Successfully imported {} books!", summary.total()));
    Ok(())
}

/// Clear all shelves
pub fn clear(library: &mut Library, yes: bool, output: &Output) -> Result<()> {
    if library.total_books() == 0 {
        bail!("No data to clear!");
    }

    if !yes {
        if !output.should_prompt() {
            bail!("Clearing deletes all data; pass --yes to confirm");
        }
        println!("This will permanently delete all your data:");
        output.print_snapshot_summary(&library.export_snapshot());
        println!("This action cannot be undone.");
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
        if !confirm("Are you absolutely sure? This will delete everything!")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    library.clear_all();
    output.success("All data cleared successfully");
    Ok(())
}
