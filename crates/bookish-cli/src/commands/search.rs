//! Catalog search command handler

use anyhow::{bail, Context, Result};

use bookish_core::{BookRecord, Library};

use crate::catalog::CatalogClient;
use crate::output::Output;

/// Search the remote catalog, optionally adding one result to the goal shelf
pub fn run(
    library: &mut Library,
    query: String,
    offset: u32,
    limit: u32,
    add: Option<usize>,
    output: &Output,
) -> Result<()> {
    let client = CatalogClient::new(&library.config().catalog_url)?;
    let volumes = client
        .search(&query, offset, limit)
        .context("Catalog search failed; your shelves are unchanged")?;

    match add {
        None => output.print_search_results(&volumes),
        Some(index) => {
            if index == 0 || index > volumes.len() {
                bail!(
                    "No search result at position {} (got {} results)",
                    index,
                    volumes.len()
                );
            }
            let book = BookRecord::from_catalog(&volumes[index - 1]);
            let title = book.title.clone();
            if library.add_to_goal(book) {
                output.success(&format!("Added to To Be Read: {}", title));
            } else {
                output.message(&format!("Already in To Be Read: {}", title));
            }
        }
    }

    Ok(())
}
