//! Status command handler

use anyhow::Result;

use bookish_core::{Library, Shelf};

use crate::output::{Output, OutputFormat};

/// Show library status and quick stats
pub fn show(library: &Library, output: &Output) -> Result<()> {
    let config = library.config();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "counts": {
                        "goal": library.shelf(Shelf::Goal).len(),
                        "reading": library.shelf(Shelf::Reading).len(),
                        "read": library.shelf(Shelf::Read).len(),
                        "total": library.total_books()
                    },
                    "finished_this_month": library.finished_this_month(),
                    "storage": {
                        "location": config.data_dir,
                        "size_bytes": library.storage_size()
                    },
                    "catalog_url": config.catalog_url
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", library.total_books());
        }
        OutputFormat::Human => {
            println!("Bookish Status");
            println!("==============");
            println!();
            println!("Your Library Summary:");
            println!("  Books to be read:   {}", library.shelf(Shelf::Goal).len());
            println!(
                "  Currently reading:  {}",
                library.shelf(Shelf::Reading).len()
            );
            println!("  Finished books:     {}", library.shelf(Shelf::Read).len());
            println!("  Total books:        {}", library.total_books());
            println!();
            println!("Quick Stats:");
            println!("  Finished this month: {}", library.finished_this_month());
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Size:     {} bytes", library.storage_size());
            println!();
            println!("Catalog:");
            println!("  Endpoint: {}", config.catalog_url);
        }
    }

    Ok(())
}
