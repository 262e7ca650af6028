//! Bookish Core Library
//!
//! Core functionality for Bookish, a local-first reading tracker: search a
//! remote book catalog, keep books on three shelves (to-be-read, currently
//! reading, finished), and carry each record through the shelf lifecycle
//! while it gains progress and review data.
//!
//! # Architecture
//!
//! - **ShelfStore**: in-memory source of truth for the three shelves
//! - **ShelfPersistence**: one JSON file per shelf key, best-effort writes
//! - **Snapshot**: versioned full-library export/import payload
//! - **Library**: owned store + persistence orchestration (main entry point)
//!
//! # Quick Start
//!
//! ```text
//! let mut library = Library::open()?;
//!
//! library.add_to_goal(BookRecord::new("Dune", "Frank Herbert"));
//! library.start_reading("b1")?;
//! library.update_progress("b1", 42)?;
//! library.finish_book("b1", 5, Some("great".into()))?;
//! ```
//!
//! # Modules
//!
//! - `library`: unified library interface (main entry point)
//! - `shelf`: the three shelves and all cross-shelf transitions
//! - `models`: `BookRecord` and catalog payload normalization
//! - `snapshot`: import/export serialization and validation
//! - `storage`: durable shelf persistence
//! - `config`: application configuration

pub mod config;
pub mod library;
pub mod models;
pub mod shelf;
pub mod snapshot;
pub mod storage;

pub use config::Config;
pub use library::{ImportSummary, Library, LibraryError};
pub use models::{BookRecord, CatalogVolume, InvalidRating, Rating, VolumeInfo};
pub use shelf::{Shelf, ShelfStore, StagedBook};
pub use snapshot::{Snapshot, SnapshotError, ValidationError};
pub use storage::{ShelfPersistence, StorageError};
