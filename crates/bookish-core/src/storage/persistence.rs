//! Shelf persistence
//!
//! Durable key-value storage of the three shelf collections, one JSON file
//! per shelf key under the data directory (`goal-books.json`,
//! `currently-reading.json`, `read-books.json`). Uses atomic writes (write to
//! temp file, then rename) to prevent corruption.
//!
//! Semantics are best-effort: there is no transactional guarantee across the
//! three keys, and a corrupted or unreadable file degrades to an empty shelf
//! rather than an error. The in-memory store stays authoritative for the
//! running session.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::config::Config;
use crate::models::BookRecord;
use crate::shelf::Shelf;
use crate::storage::error::{StorageError, StorageResult};

/// Persistence layer for shelf collections
pub struct ShelfPersistence {
    config: Config,
}

impl ShelfPersistence {
    /// Create a new persistence handler with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if any shelf data exists on disk
    pub fn exists(&self) -> bool {
        Shelf::ALL
            .iter()
            .any(|&shelf| self.config.shelf_path(shelf).exists())
    }

    /// Load a shelf's collection from disk
    ///
    /// A missing file yields an empty shelf. So does a file that cannot be
    /// read or decoded: persistence corruption must never crash the
    /// application, so the condition is logged and the shelf starts empty.
    /// Every element is re-normalized, tolerating records written by older
    /// versions or by hand.
    pub fn load(&self, shelf: Shelf) -> Vec<BookRecord> {
        let path = self.config.shelf_path(shelf);

        if !path.exists() {
            return Vec::new();
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!(
                    key = shelf.storage_key(),
                    path = %path.display(),
                    error = %err,
                    "failed to read shelf data, starting with empty shelf"
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Value>>(&content) {
            Ok(raw_books) => raw_books.iter().map(BookRecord::from_raw).collect(),
            Err(err) => {
                warn!(
                    key = shelf.storage_key(),
                    path = %path.display(),
                    error = %err,
                    "shelf data is corrupted, starting with empty shelf"
                );
                Vec::new()
            }
        }
    }

    /// Save a shelf's collection to disk using an atomic write
    pub fn save(&self, shelf: Shelf, records: &[BookRecord]) -> StorageResult<()> {
        let path = self.config.shelf_path(shelf);
        let data = serde_json::to_vec_pretty(records)?;
        atomic_write(&path, &data)
    }

    /// Total size in bytes of all shelf files
    pub fn total_size(&self) -> u64 {
        Shelf::ALL
            .iter()
            .filter_map(|&shelf| fs::metadata(self.config.shelf_path(shelf)).ok())
            .map(|m| m.len())
            .sum()
    }

    /// Delete all stored shelf data
    pub fn delete_all(&self) -> StorageResult<()> {
        for shelf in Shelf::ALL {
            let path = self.config.shelf_path(shelf);
            if path.exists() {
                fs::remove_file(&path).map_err(|e| StorageError::from_io(e, path))?;
            }
        }
        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    // Create temp file in the same directory (for atomic rename)
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    // Sync to disk before rename
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    // Atomic rename
    fs::rename(&temp_path, path).map_err(|e| StorageError::AtomicWriteFailed {
        from: temp_path,
        to: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
