//! Book lifecycle command handlers
//!
//! Manual goal entry plus the shelf transitions: start reading, update
//! progress, finish with rating/review.

use anyhow::{Context, Result};

use bookish_core::{BookRecord, Library, Shelf};

use crate::output::Output;

/// Add a manually entered book to the goal shelf
pub fn add(
    library: &mut Library,
    title: String,
    author: Option<String>,
    pages: Option<u32>,
    genre: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut book = BookRecord::new(title, author.unwrap_or_default());
    if let Some(pages) = pages.filter(|&p| p > 0) {
        book.total_pages = pages;
    }
    if let Some(genre) = genre.map(|g| g.trim().to_string()).filter(|g| !g.is_empty()) {
        book.genre = genre;
    }

    let id = book.id.clone();
    let title = book.title.clone();
    library.add_to_goal(book);

    output.success(&format!("Added to To Be Read: {}", title));
    if output.is_quiet() {
        println!("{}", id);
    }
    Ok(())
}

/// Move a book from the goal shelf onto the reading shelf
pub fn start(library: &mut Library, id: String, output: &Output) -> Result<()> {
    if library.start_reading(&id).is_err() {
        // Make the not-found message actionable when the book sits on
        // another shelf.
        if let Some((shelf, _)) = library.store().find_anywhere(&id) {
            anyhow::bail!("Book {} is on the {} shelf, not To Be Read", id, shelf);
        }
        anyhow::bail!("Book not found in To Be Read: {}", id);
    }

    output.success(&format!("Started reading: {}", id));
    Ok(())
}

/// Update reading progress
pub fn progress(library: &mut Library, id: String, page: i64, output: &Output) -> Result<()> {
    let stored = library
        .update_progress(&id, page)
        .with_context(|| format!("No book with id {} on the Currently Reading shelf", id))?;

    let total = library
        .shelf(Shelf::Reading)
        .iter()
        .find(|b| b.id == id)
        .map(|b| b.total_pages)
        .unwrap_or(0);

    output.success(&format!("Progress updated: {}/{} pages", stored, total));
    Ok(())
}

/// Finish a book with a rating and optional review
///
/// One atomic step: an invalid rating or unknown id leaves every shelf
/// untouched.
pub fn finish(
    library: &mut Library,
    id: String,
    rating: u8,
    review: Option<String>,
    output: &Output,
) -> Result<()> {
    library
        .finish_book(&id, rating, review)
        .context("Failed to finish book")?;

    output.success(&format!("Added to Finished Books: {} ({}/5)", id, rating));
    Ok(())
}
