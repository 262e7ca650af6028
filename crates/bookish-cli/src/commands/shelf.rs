//! Shelf listing, removal, and editing command handlers

use anyhow::{bail, Result};

use bookish_core::{BookRecord, Library, Shelf};

use crate::output::Output;
use crate::prompt::confirm;

/// List one shelf, or all three
pub fn list(library: &Library, shelf: Option<Shelf>, output: &Output) -> Result<()> {
    let shelves = match shelf {
        Some(shelf) => vec![shelf],
        None => Shelf::ALL.to_vec(),
    };

    for (i, shelf) in shelves.iter().enumerate() {
        if i > 0 && output.should_prompt() {
            println!();
        }
        output.print_shelf(*shelf, library.shelf(*shelf));
    }
    Ok(())
}

/// Remove a book from a shelf
pub fn remove(library: &mut Library, shelf: Shelf, id: String, output: &Output) -> Result<()> {
    let Some(book) = library.store().find(shelf, &id) else {
        bail!("Book not found on {} shelf: {}", shelf, id);
    };

    if output.should_prompt() {
        println!("Removing from {}:", shelf);
        output.print_book(book);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    library.remove_from_shelf(shelf, &id);
    output.success(&format!("Removed from {}: {}", shelf, id));
    Ok(())
}

/// Field overrides for `edit`
#[derive(Debug, Default)]
pub struct EditFields {
    pub title: Option<String>,
    pub author: Option<String>,
    pub pages: Option<u32>,
    pub page: Option<i64>,
    pub rating: Option<u8>,
    pub review: Option<String>,
    pub genre: Option<String>,
}

/// Edit a record in place within one shelf
///
/// Validation happens here, before the store is touched: the store's
/// `edit_record` replaces whatever it is given without re-checking.
pub fn edit(
    library: &mut Library,
    shelf: Shelf,
    id: String,
    fields: EditFields,
    output: &Output,
) -> Result<()> {
    let Some(current) = library.store().find(shelf, &id) else {
        bail!("Book not found on {} shelf: {}", shelf, id);
    };

    let updated = apply_fields(current.clone(), fields, shelf)?;
    library.edit_record(shelf, updated);

    output.success(&format!("Updated: {}", id));
    Ok(())
}

/// Apply field overrides to a record and validate the result
fn apply_fields(mut book: BookRecord, fields: EditFields, shelf: Shelf) -> Result<BookRecord> {
    if let Some(title) = fields.title {
        book.title = title.trim().to_string();
    }
    if let Some(author) = fields.author {
        book.author = author.trim().to_string();
    }
    if let Some(pages) = fields.pages {
        book.total_pages = pages;
    }
    if let Some(genre) = fields.genre {
        let genre = genre.trim().to_string();
        book.genre = if genre.is_empty() {
            "Fiction".to_string()
        } else {
            genre
        };
    }
    if let Some(review) = fields.review {
        let review = review.trim().to_string();
        book.review = if review.is_empty() { None } else { Some(review) };
    }
    if let Some(rating) = fields.rating {
        book.rating = Some(rating);
    }
    if let Some(page) = fields.page {
        book.current_page = Some(page.max(0) as u32);
    }

    // Same rules the edit form enforces
    if book.title.is_empty() {
        bail!("Title is required");
    }
    if book.author.is_empty() {
        bail!("Author is required");
    }
    if book.total_pages < 1 {
        bail!("Total pages must be a positive number");
    }
    if shelf == Shelf::Reading {
        let page = book.current_page.unwrap_or(0);
        if page > book.total_pages {
            bail!(
                "Current page must be between 0 and {}",
                book.total_pages
            );
        }
    }
    if shelf == Shelf::Read {
        match book.rating {
            Some(r) if (1..=5).contains(&r) => {}
            _ => bail!("Rating is required for finished books (1-5 stars)"),
        }
    }

    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str) -> BookRecord {
        let mut b = BookRecord::new("Title", "Author");
        b.id = id.to_string();
        b
    }

    #[test]
    fn test_apply_fields_overrides() {
        let fields = EditFields {
            title: Some("New Title".to_string()),
            pages: Some(300),
            genre: Some("History".to_string()),
            ..Default::default()
        };

        let updated = apply_fields(book("b1"), fields, Shelf::Goal).unwrap();
        assert_eq!(updated.title, "New Title");
        assert_eq!(updated.total_pages, 300);
        assert_eq!(updated.genre, "History");
        // Untouched fields preserved
        assert_eq!(updated.author, "Author");
    }

    #[test]
    fn test_apply_fields_rejects_empty_title() {
        let fields = EditFields {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(apply_fields(book("b1"), fields, Shelf::Goal).is_err());
    }

    #[test]
    fn test_apply_fields_rejects_zero_pages() {
        let fields = EditFields {
            pages: Some(0),
            ..Default::default()
        };
        assert!(apply_fields(book("b1"), fields, Shelf::Goal).is_err());
    }

    #[test]
    fn test_apply_fields_page_bounds_only_for_reading() {
        let fields = || EditFields {
            page: Some(999),
            ..Default::default()
        };

        // 999 > default 200 pages: rejected on the reading shelf
        assert!(apply_fields(book("b1"), fields(), Shelf::Reading).is_err());
        // Other shelves don't check progress
        assert!(apply_fields(book("b1"), fields(), Shelf::Goal).is_ok());
    }

    #[test]
    fn test_apply_fields_rating_required_on_read_shelf() {
        let no_rating = EditFields::default();
        assert!(apply_fields(book("b1"), no_rating, Shelf::Read).is_err());

        let mut rated = book("b1");
        rated.rating = Some(4);
        assert!(apply_fields(rated, EditFields::default(), Shelf::Read).is_ok());

        let out_of_range = EditFields {
            rating: Some(9),
            ..Default::default()
        };
        assert!(apply_fields(book("b1"), out_of_range, Shelf::Read).is_err());
    }

    #[test]
    fn test_apply_fields_blank_genre_falls_back() {
        let fields = EditFields {
            genre: Some("  ".to_string()),
            ..Default::default()
        };
        let updated = apply_fields(book("b1"), fields, Shelf::Goal).unwrap();
        assert_eq!(updated.genre, "Fiction");
    }
}
