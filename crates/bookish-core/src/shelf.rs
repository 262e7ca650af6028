//! The shelf store
//!
//! Owns the three named collections (goal, reading, read) and every
//! cross-shelf transition. Pure in-memory and synchronous; persistence is
//! layered on top by [`crate::library::Library`].
//!
//! ## State machine (per book id)
//!
//! ```text
//! (none) --add_to_goal--> GOAL --start_reading--> READING --begin_finish--> STAGED
//!                           |                                                 |
//!                           +--begin_finish--> STAGED --complete_finish--> READ
//! ```
//!
//! A staged book sits on no shelf. `restore_staged` puts an abandoned one
//! back on its origin shelf, so the finish flow is recoverable rather than
//! lossy.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::models::{BookRecord, Rating};

/// One of the three named collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shelf {
    /// To-be-read
    Goal,
    /// Currently reading
    Reading,
    /// Finished, with rating/review
    Read,
}

impl Shelf {
    /// All shelves, in persistence order
    pub const ALL: [Shelf; 3] = [Shelf::Goal, Shelf::Reading, Shelf::Read];

    /// Key under which this shelf is persisted in the local store
    pub fn storage_key(&self) -> &'static str {
        match self {
            Shelf::Goal => "goal-books",
            Shelf::Reading => "currently-reading",
            Shelf::Read => "read-books",
        }
    }

    /// Human-readable shelf name
    pub fn label(&self) -> &'static str {
        match self {
            Shelf::Goal => "To Be Read",
            Shelf::Reading => "Currently Reading",
            Shelf::Read => "Finished",
        }
    }
}

impl std::fmt::Display for Shelf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A book removed from its shelf pending review submission
///
/// Not a shelf: while staged, the book's id is on no collection. Commit with
/// [`ShelfStore::complete_finish`] or put it back with
/// [`ShelfStore::restore_staged`].
#[derive(Debug, Clone, PartialEq)]
pub struct StagedBook {
    book: BookRecord,
    origin: Shelf,
}

impl StagedBook {
    /// The staged record
    pub fn book(&self) -> &BookRecord {
        &self.book
    }

    /// Shelf the book was removed from
    pub fn origin(&self) -> Shelf {
        self.origin
    }
}

/// In-memory source of truth for all three shelves
///
/// Shelves are insertion-ordered; new entries go to the front. No id appears
/// twice within a shelf.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShelfStore {
    goal: Vec<BookRecord>,
    reading: Vec<BookRecord>,
    read: Vec<BookRecord>,
}

impl ShelfStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Books on a shelf, front (most recent) first
    pub fn shelf(&self, shelf: Shelf) -> &[BookRecord] {
        match shelf {
            Shelf::Goal => &self.goal,
            Shelf::Reading => &self.reading,
            Shelf::Read => &self.read,
        }
    }

    fn shelf_mut(&mut self, shelf: Shelf) -> &mut Vec<BookRecord> {
        match shelf {
            Shelf::Goal => &mut self.goal,
            Shelf::Reading => &mut self.reading,
            Shelf::Read => &mut self.read,
        }
    }

    /// Total number of books across all shelves
    pub fn total_books(&self) -> usize {
        self.goal.len() + self.reading.len() + self.read.len()
    }

    /// Whether the goal shelf contains this id
    pub fn is_in_goal(&self, id: &str) -> bool {
        self.goal.iter().any(|b| b.id == id)
    }

    /// Find a book on a specific shelf
    pub fn find(&self, shelf: Shelf, id: &str) -> Option<&BookRecord> {
        self.shelf(shelf).iter().find(|b| b.id == id)
    }

    /// Find a book on any shelf
    pub fn find_anywhere(&self, id: &str) -> Option<(Shelf, &BookRecord)> {
        Shelf::ALL
            .iter()
            .find_map(|&shelf| self.find(shelf, id).map(|b| (shelf, b)))
    }

    /// Add a book to the front of the goal shelf
    ///
    /// Returns false (and leaves the shelf unchanged) when the id is already
    /// there. Only the goal shelf is checked: a previously read book can be
    /// re-added as a re-read goal.
    pub fn add_to_goal(&mut self, book: BookRecord) -> bool {
        if self.is_in_goal(&book.id) {
            return false;
        }
        self.goal.insert(0, book);
        true
    }

    /// Move a book onto the reading shelf
    ///
    /// Removes the id from the goal shelf if present, zeroes progress, and
    /// stamps the start date. Returns false when the id is already reading.
    pub fn start_reading(&mut self, mut book: BookRecord) -> bool {
        if self.reading.iter().any(|b| b.id == book.id) {
            return false;
        }
        self.goal.retain(|b| b.id != book.id);
        book.current_page = Some(0);
        book.start_date = Some(Local::now().date_naive());
        self.reading.insert(0, book);
        true
    }

    /// Update progress for a book on the reading shelf
    ///
    /// The requested page is clamped into `[0, total_pages]`. Returns the
    /// stored page, or `None` when the id is not on the reading shelf.
    pub fn update_progress(&mut self, id: &str, page: i64) -> Option<u32> {
        let book = self.reading.iter_mut().find(|b| b.id == id)?;
        let clamped = book.clamp_page(page);
        book.current_page = Some(clamped);
        Some(clamped)
    }

    /// Remove a book from the goal or reading shelf and stage it for review
    ///
    /// Returns `None` when the id is on neither shelf. The staged book is on
    /// no shelf until `complete_finish` or `restore_staged`.
    pub fn begin_finish(&mut self, id: &str) -> Option<StagedBook> {
        for origin in [Shelf::Goal, Shelf::Reading] {
            let shelf = self.shelf_mut(origin);
            if let Some(pos) = shelf.iter().position(|b| b.id == id) {
                let book = shelf.remove(pos);
                return Some(StagedBook { book, origin });
            }
        }
        None
    }

    /// Commit a staged book to the read shelf
    ///
    /// Stamps the finished date, clears progress, and attaches the rating and
    /// review. Returns false (and drops the record) when the id is already on
    /// the read shelf.
    pub fn complete_finish(
        &mut self,
        staged: StagedBook,
        rating: Rating,
        review: Option<String>,
    ) -> bool {
        let mut book = staged.book;
        if self.read.iter().any(|b| b.id == book.id) {
            return false;
        }
        book.current_page = None;
        book.finished_date = Some(Local::now().date_naive());
        book.rating = Some(rating.value());
        book.review = review.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
        self.read.insert(0, book);
        true
    }

    /// Put an abandoned staged book back on its origin shelf
    pub fn restore_staged(&mut self, staged: StagedBook) {
        let shelf = self.shelf_mut(staged.origin);
        if !shelf.iter().any(|b| b.id == staged.book.id) {
            shelf.insert(0, staged.book);
        }
    }

    /// Remove a book from a shelf; false when the id is absent
    pub fn remove_from_shelf(&mut self, shelf: Shelf, id: &str) -> bool {
        let books = self.shelf_mut(shelf);
        let before = books.len();
        books.retain(|b| b.id != id);
        books.len() != before
    }

    /// Replace a record in place by id within one shelf
    ///
    /// The caller validates the updated record's fields before calling; the
    /// store does not re-validate. Returns false when the id is not on that
    /// shelf.
    pub fn edit_record(&mut self, shelf: Shelf, updated: BookRecord) -> bool {
        let books = self.shelf_mut(shelf);
        match books.iter_mut().find(|b| b.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    /// Replace all three shelves at once (import / hydration)
    pub fn replace_all(
        &mut self,
        goal: Vec<BookRecord>,
        reading: Vec<BookRecord>,
        read: Vec<BookRecord>,
    ) {
        self.goal = goal;
        self.reading = reading;
        self.read = read;
    }

    /// Empty all three shelves
    pub fn clear(&mut self) {
        self.goal.clear();
        self.reading.clear();
        self.read.clear();
    }
}
