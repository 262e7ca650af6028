//! Unified library interface
//!
//! The `Library` owns the in-memory shelf store and coordinates persistence:
//!
//! - on open, all three shelves are hydrated from disk;
//! - every mutation persists the affected shelves fire-and-forget: a failed
//!   save is logged, never surfaced, and the in-memory store stays
//!   authoritative for the running session;
//! - no write fires before hydration completes, so a half-initialized
//!   process can never clobber durable state with empty shelves.
//!
//! ## Usage
//!
//! ```ignore
//! let mut library = Library::open()?;
//!
//! library.add_to_goal(BookRecord::new("Dune", "Frank Herbert"));
//! library.start_reading("b1");
//! library.update_progress("b1", 42);
//! library.finish_book("b1", 5, Some("great".to_string()))?;
//! ```

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::models::{BookRecord, Rating};
use crate::shelf::{Shelf, ShelfStore, StagedBook};
use crate::snapshot::{Snapshot, SnapshotError};
use crate::storage::ShelfPersistence;

/// Errors from shelf transitions
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error(transparent)]
    InvalidRating(#[from] crate::models::InvalidRating),
}

/// Outcome summary of a successful import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub goal: usize,
    pub reading: usize,
    pub read: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.goal + self.reading + self.read
    }
}

/// Owned shelf state plus durable storage
pub struct Library {
    store: ShelfStore,
    persistence: ShelfPersistence,
    config: Config,
    /// Gate against the startup write-before-read race: mutations are
    /// accepted before hydration, but nothing is persisted until the initial
    /// load has completed.
    hydrated: bool,
}

impl Library {
    /// Open the library, hydrating all shelves from disk
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the library with a specific configuration
    pub fn open_with_config(config: Config) -> Result<Self> {
        let persistence = ShelfPersistence::new(config.clone());

        let mut store = ShelfStore::new();
        store.replace_all(
            persistence.load(Shelf::Goal),
            persistence.load(Shelf::Reading),
            persistence.load(Shelf::Read),
        );
        debug!(books = store.total_books(), "library hydrated");

        Ok(Self {
            store,
            persistence,
            config,
            hydrated: true,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read-only access to the shelf store
    pub fn store(&self) -> &ShelfStore {
        &self.store
    }

    /// Books on a shelf, front (most recent) first
    pub fn shelf(&self, shelf: Shelf) -> &[BookRecord] {
        self.store.shelf(shelf)
    }

    /// Total number of books across all shelves
    pub fn total_books(&self) -> usize {
        self.store.total_books()
    }

    /// Whether the goal shelf contains this id
    pub fn is_in_goal(&self, id: &str) -> bool {
        self.store.is_in_goal(id)
    }

    /// Total size in bytes of the persisted shelf files
    pub fn storage_size(&self) -> u64 {
        self.persistence.total_size()
    }

    /// Books finished in the current calendar month
    pub fn finished_this_month(&self) -> usize {
        let now = Local::now().date_naive();
        self.store
            .shelf(Shelf::Read)
            .iter()
            .filter_map(|b| b.finished_date)
            .filter(|d| d.month() == now.month() && d.year() == now.year())
            .count()
    }

    // ==================== Shelf mutations ====================

    /// Add a book to the front of the goal shelf; false when already there
    pub fn add_to_goal(&mut self, book: BookRecord) -> bool {
        let added = self.store.add_to_goal(book);
        if added {
            self.persist(&[Shelf::Goal]);
        }
        added
    }

    /// Move a book onto the reading shelf
    ///
    /// Looks the id up on the goal shelf first; a record not on any shelf
    /// (fresh from search) can also be passed in directly via
    /// [`Library::start_reading_record`].
    pub fn start_reading(&mut self, id: &str) -> Result<(), LibraryError> {
        let book = self
            .store
            .find(Shelf::Goal, id)
            .cloned()
            .ok_or_else(|| LibraryError::BookNotFound(id.to_string()))?;
        self.start_reading_record(book);
        Ok(())
    }

    /// Move a record (possibly not yet on any shelf) onto the reading shelf
    pub fn start_reading_record(&mut self, book: BookRecord) -> bool {
        let started = self.store.start_reading(book);
        if started {
            self.persist(&[Shelf::Goal, Shelf::Reading]);
        }
        started
    }

    /// Update progress for a book on the reading shelf; clamped
    pub fn update_progress(&mut self, id: &str, page: i64) -> Result<u32, LibraryError> {
        let stored = self
            .store
            .update_progress(id, page)
            .ok_or_else(|| LibraryError::BookNotFound(id.to_string()))?;
        self.persist(&[Shelf::Reading]);
        Ok(stored)
    }

    /// Remove a book from the goal or reading shelf and stage it for review
    ///
    /// Prefer [`Library::finish_book`], which cannot strand a staged book.
    /// The staged window is tolerable only because there is a single user
    /// and no concurrent mutator.
    pub fn begin_finish(&mut self, id: &str) -> Option<StagedBook> {
        let staged = self.store.begin_finish(id);
        if staged.is_some() {
            self.persist(&[Shelf::Goal, Shelf::Reading]);
        }
        staged
    }

    /// Commit a staged book to the read shelf
    pub fn complete_finish(
        &mut self,
        staged: StagedBook,
        rating: Rating,
        review: Option<String>,
    ) -> bool {
        let inserted = self.store.complete_finish(staged, rating, review);
        self.persist(&[Shelf::Read]);
        inserted
    }

    /// Put an abandoned staged book back on its origin shelf
    pub fn restore_staged(&mut self, staged: StagedBook) {
        let origin = staged.origin();
        self.store.restore_staged(staged);
        self.persist(&[origin]);
    }

    /// Finish a book in one atomic step
    ///
    /// Validates the rating before touching any shelf, so an out-of-range
    /// rating leaves the book exactly where it was.
    pub fn finish_book(
        &mut self,
        id: &str,
        rating: u8,
        review: Option<String>,
    ) -> Result<(), LibraryError> {
        let rating = Rating::new(rating)?;
        let staged = self
            .store
            .begin_finish(id)
            .ok_or_else(|| LibraryError::BookNotFound(id.to_string()))?;
        let origin = staged.origin();
        self.store.complete_finish(staged, rating, review);
        self.persist(&[origin, Shelf::Read]);
        Ok(())
    }

    /// Remove a book from a shelf; false when absent
    pub fn remove_from_shelf(&mut self, shelf: Shelf, id: &str) -> bool {
        let removed = self.store.remove_from_shelf(shelf, id);
        if removed {
            self.persist(&[shelf]);
        }
        removed
    }

    /// Replace a record in place within one shelf
    ///
    /// The caller validates the updated fields beforehand; the store does not.
    pub fn edit_record(&mut self, shelf: Shelf, updated: BookRecord) -> bool {
        let edited = self.store.edit_record(shelf, updated);
        if edited {
            self.persist(&[shelf]);
        }
        edited
    }

    // ==================== Snapshots ====================

    /// Export the whole library
    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.store)
    }

    /// Validate an external payload and, on success, replace all shelves
    ///
    /// Full replace, not a merge. On failure the current shelves are left
    /// untouched and the validation messages are returned. Destructive: the
    /// caller obtains explicit user confirmation first.
    pub fn import_snapshot(&mut self, raw: &Value) -> Result<ImportSummary, SnapshotError> {
        let snapshot = Snapshot::from_value(raw)?;
        let (goal, reading, read) = snapshot.into_shelves();
        let summary = ImportSummary {
            goal: goal.len(),
            reading: reading.len(),
            read: read.len(),
        };

        self.store.replace_all(goal, reading, read);
        self.persist(&Shelf::ALL);
        Ok(summary)
    }

    /// Empty all shelves; equivalent to importing an empty snapshot
    ///
    /// Destructive: the caller obtains explicit user confirmation first.
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.persist(&Shelf::ALL);
    }

    // ==================== Persistence ====================

    /// Persist shelves fire-and-forget
    ///
    /// Skipped until hydration completes; a write failure is reported to the
    /// diagnostic channel and the user keeps working from memory.
    fn persist(&self, shelves: &[Shelf]) {
        if !self.hydrated {
            warn!("skipping persistence before hydration completes");
            return;
        }
        for &shelf in shelves {
            if let Err(err) = self.persistence.save(shelf, self.store.shelf(shelf)) {
                error!(
                    key = shelf.storage_key(),
                    error = %err,
                    "failed to persist shelf, in-memory state remains authoritative"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            catalog_url: String::new(),
        }
    }

    fn book(id: &str) -> BookRecord {
        let mut b = BookRecord::new("Title", "Author");
        b.id = id.to_string();
        b
    }

    #[test]
    fn test_open_empty_library() {
        let temp_dir = TempDir::new().unwrap();
        let library = Library::open_with_config(test_config(&temp_dir)).unwrap();
        assert_eq!(library.total_books(), 0);
    }

    #[test]
    fn test_mutations_persist_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        {
            let mut library = Library::open_with_config(config.clone()).unwrap();
            library.add_to_goal(book("b1"));
            library.add_to_goal(book("b2"));
            library.start_reading("b1").unwrap();
        }

        let library = Library::open_with_config(config).unwrap();
        assert_eq!(library.shelf(Shelf::Goal).len(), 1);
        assert_eq!(library.shelf(Shelf::Reading).len(), 1);
        assert_eq!(library.shelf(Shelf::Reading)[0].id, "b1");
        assert_eq!(library.shelf(Shelf::Reading)[0].current_page, Some(0));
    }

    #[test]
    fn test_full_lifecycle_example() {
        let temp_dir = TempDir::new().unwrap();
        let mut library = Library::open_with_config(test_config(&temp_dir)).unwrap();

        let mut dune = book("b1");
        dune.title = "Dune".to_string();
        library.add_to_goal(dune);
        assert_eq!(library.shelf(Shelf::Goal).len(), 1);

        library.start_reading("b1").unwrap();
        assert!(library.shelf(Shelf::Goal).is_empty());
        assert_eq!(library.shelf(Shelf::Reading)[0].current_page, Some(0));

        let stored = library.update_progress("b1", 9999).unwrap();
        assert_eq!(stored, library.shelf(Shelf::Reading)[0].total_pages);

        library
            .finish_book("b1", 5, Some("great".to_string()))
            .unwrap();
        assert!(library.shelf(Shelf::Reading).is_empty());
        let finished = &library.shelf(Shelf::Read)[0];
        assert_eq!(finished.rating, Some(5));
        assert!(finished.finished_date.is_some());
    }

    #[test]
    fn test_finish_book_invalid_rating_leaves_shelves_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let mut library = Library::open_with_config(test_config(&temp_dir)).unwrap();
        library.add_to_goal(book("b1"));

        let err = library.finish_book("b1", 0, None).unwrap_err();
        assert!(matches!(err, LibraryError::InvalidRating(_)));
        assert!(library.is_in_goal("b1"));
        assert!(library.shelf(Shelf::Read).is_empty());

        let err = library.finish_book("b1", 6, None).unwrap_err();
        assert!(matches!(err, LibraryError::InvalidRating(_)));
        assert!(library.is_in_goal("b1"));
    }

    #[test]
    fn test_finish_book_unknown_id() {
        let temp_dir = TempDir::new().unwrap();
        let mut library = Library::open_with_config(test_config(&temp_dir)).unwrap();

        let err = library.finish_book("nope", 5, None).unwrap_err();
        assert!(matches!(err, LibraryError::BookNotFound(_)));
    }

    #[test]
    fn test_staged_restore_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut library = Library::open_with_config(test_config(&temp_dir)).unwrap();
        library.add_to_goal(book("b1"));

        let staged = library.begin_finish("b1").unwrap();
        assert_eq!(library.total_books(), 0);

        library.restore_staged(staged);
        assert!(library.is_in_goal("b1"));
    }

    #[test]
    fn test_export_import_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut library = Library::open_with_config(test_config(&temp_dir)).unwrap();

        library.add_to_goal(book("g1"));
        library.start_reading_record(book("r1"));
        library.add_to_goal(book("d1"));
        library.finish_book("d1", 4, None).unwrap();

        let snapshot = library.export_snapshot();
        let value = serde_json::to_value(&snapshot).unwrap();

        library.clear_all();
        assert_eq!(library.total_books(), 0);

        let summary = library.import_snapshot(&value).unwrap();
        assert_eq!(summary, ImportSummary { goal: 1, reading: 1, read: 1 });
        assert!(library.is_in_goal("g1"));
        assert_eq!(library.shelf(Shelf::Reading)[0].id, "r1");
        assert_eq!(library.shelf(Shelf::Read)[0].id, "d1");
    }

    #[test]
    fn test_failed_import_leaves_state_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let mut library = Library::open_with_config(config.clone()).unwrap();
        library.add_to_goal(book("b1"));

        let err = library
            .import_snapshot(&json!({ "goalBooks": [] }))
            .unwrap_err();
        assert!(!err.validation_errors().is_empty());
        assert!(library.is_in_goal("b1"));

        // Durable state untouched as well
        let reopened = Library::open_with_config(config).unwrap();
        assert!(reopened.is_in_goal("b1"));
    }

    #[test]
    fn test_import_replaces_not_merges() {
        let temp_dir = TempDir::new().unwrap();
        let mut library = Library::open_with_config(test_config(&temp_dir)).unwrap();
        library.add_to_goal(book("old"));

        let raw = json!({
            "goalBooks": [{ "id": "new" }],
            "readBooks": [],
            "currentlyReading": []
        });
        library.import_snapshot(&raw).unwrap();

        assert!(!library.is_in_goal("old"));
        assert!(library.is_in_goal("new"));
        assert_eq!(library.total_books(), 1);
    }

    #[test]
    fn test_clear_all_persists() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        {
            let mut library = Library::open_with_config(config.clone()).unwrap();
            library.add_to_goal(book("b1"));
            library.clear_all();
        }

        let library = Library::open_with_config(config).unwrap();
        assert_eq!(library.total_books(), 0);
    }

    #[test]
    fn test_hydration_survives_corrupt_shelf_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        std::fs::write(config.shelf_path(Shelf::Goal), "corrupt!").unwrap();
        std::fs::write(
            config.shelf_path(Shelf::Read),
            r#"[{"id": "d1", "rating": 5}]"#,
        )
        .unwrap();

        let library = Library::open_with_config(config).unwrap();
        assert!(library.shelf(Shelf::Goal).is_empty());
        assert_eq!(library.shelf(Shelf::Read).len(), 1);
    }

    #[test]
    fn test_unhydrated_library_never_writes() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        // Durable state exists from an earlier session
        {
            let mut library = Library::open_with_config(config.clone()).unwrap();
            library.add_to_goal(book("b1"));
        }

        // A library constructed without hydration mutates in memory only
        let mut library = Library {
            store: ShelfStore::new(),
            persistence: ShelfPersistence::new(config.clone()),
            config: config.clone(),
            hydrated: false,
        };
        library.add_to_goal(book("other"));
        library.clear_all();

        let reopened = Library::open_with_config(config).unwrap();
        assert!(reopened.is_in_goal("b1"));
    }

    #[test]
    fn test_finished_this_month() {
        let temp_dir = TempDir::new().unwrap();
        let mut library = Library::open_with_config(test_config(&temp_dir)).unwrap();

        library.add_to_goal(book("b1"));
        library.finish_book("b1", 5, None).unwrap();

        let mut stale = book("b2");
        stale.finished_date = chrono::NaiveDate::from_ymd_opt(2000, 1, 1);
        stale.rating = Some(3);
        let mut store_books = library.shelf(Shelf::Read).to_vec();
        store_books.push(stale);
        let goal = library.shelf(Shelf::Goal).to_vec();
        let reading = library.shelf(Shelf::Reading).to_vec();
        library.store.replace_all(goal, reading, store_books);

        assert_eq!(library.finished_this_month(), 1);
    }
}
