//! Import/export snapshots
//!
//! A snapshot is the portable payload of the whole library: all three
//! shelves, an export date, and a format version. Import validation is
//! structural and all-or-nothing: a payload that fails validation is refused
//! wholesale and reported as a list of human-readable messages.
//!
//! The wire format is byte-compatible with the original export file:
//!
//! ```json
//! {
//!   "exportDate": "2024-01-15",
//!   "version": "1.0",
//!   "goalBooks": [...],
//!   "readBooks": [...],
//!   "currentlyReading": [...],
//!   "totalBooks": 3
//! }
//! ```

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::BookRecord;
use crate::shelf::{Shelf, ShelfStore};

/// Current snapshot format version
///
/// Carried in every export; not yet enforced on import.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// The three shelf fields every snapshot must carry
const SHELF_FIELDS: [&str; 3] = ["goalBooks", "readBooks", "currentlyReading"];

/// A full-library snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub export_date: NaiveDate,
    pub version: String,
    pub goal_books: Vec<BookRecord>,
    pub read_books: Vec<BookRecord>,
    pub currently_reading: Vec<BookRecord>,
    pub total_books: usize,
}

impl Snapshot {
    /// Capture the current state of all three shelves
    pub fn capture(store: &ShelfStore) -> Self {
        let goal_books = store.shelf(Shelf::Goal).to_vec();
        let currently_reading = store.shelf(Shelf::Reading).to_vec();
        let read_books = store.shelf(Shelf::Read).to_vec();
        let total_books = goal_books.len() + read_books.len() + currently_reading.len();

        Self {
            export_date: Local::now().date_naive(),
            version: SNAPSHOT_VERSION.to_string(),
            goal_books,
            read_books,
            currently_reading,
            total_books,
        }
    }

    /// Validate and ingest an external payload
    ///
    /// Structure is checked first; on success every book is normalized
    /// through the coercion boundary, so heterogeneous record shapes (raw
    /// catalog volumes, hand-edited files) import cleanly. Nothing is
    /// ingested when validation fails.
    pub fn from_value(raw: &Value) -> Result<Self, SnapshotError> {
        let errors = validate(raw);
        if !errors.is_empty() {
            return Err(SnapshotError::Invalid(errors));
        }

        let books_of = |field: &str| -> Vec<BookRecord> {
            raw[field]
                .as_array()
                .map(|books| books.iter().map(BookRecord::from_raw).collect())
                .unwrap_or_default()
        };

        let goal_books = books_of("goalBooks");
        let read_books = books_of("readBooks");
        let currently_reading = books_of("currentlyReading");
        let total_books = goal_books.len() + read_books.len() + currently_reading.len();

        Ok(Self {
            export_date: raw
                .get("exportDate")
                .and_then(Value::as_str)
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .unwrap_or_else(|| Local::now().date_naive()),
            version: raw
                .get("version")
                .and_then(Value::as_str)
                .unwrap_or(SNAPSHOT_VERSION)
                .to_string(),
            goal_books,
            read_books,
            currently_reading,
            total_books,
        })
    }

    /// Consume the snapshot into its three shelves (goal, reading, read)
    pub fn into_shelves(self) -> (Vec<BookRecord>, Vec<BookRecord>, Vec<BookRecord>) {
        (self.goal_books, self.currently_reading, self.read_books)
    }
}

/// Structural validation of an external payload
///
/// Fails when the payload is not an object, any of the three shelf fields is
/// missing or not a list, or a contained book is not an object carrying an
/// `id`. Field ranges and cross-shelf uniqueness are not re-checked: once
/// structure passes, import trusts the exporter's own invariants.
pub fn validate(raw: &Value) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let Some(obj) = raw.as_object() else {
        errors.push(ValidationError::InvalidFormat);
        return errors;
    };

    for field in SHELF_FIELDS {
        if !obj.get(field).map(Value::is_array).unwrap_or(false) {
            errors.push(ValidationError::MissingShelf { field });
        }
    }

    let all_books = SHELF_FIELDS
        .iter()
        .filter_map(|field| obj.get(*field).and_then(Value::as_array))
        .flatten();

    for (index, book) in all_books.enumerate() {
        let position = index + 1;
        if !book.is_object() {
            errors.push(ValidationError::InvalidBook { position });
            continue;
        }
        let has_id = match book.get("id") {
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(Value::Number(_)) => true,
            _ => false,
        };
        if !has_id {
            errors.push(ValidationError::MissingBookField {
                position,
                field: "id",
            });
        }
    }

    errors
}

/// A single structural problem found in an import payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid file format")]
    InvalidFormat,

    #[error("Missing or invalid {field} data")]
    MissingShelf { field: &'static str },

    #[error("Invalid book object at position {position}")]
    InvalidBook { position: usize },

    #[error("Book at position {position} missing required field: {field}")]
    MissingBookField {
        position: usize,
        field: &'static str,
    },
}

/// Snapshot ingestion failure
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The payload failed structural validation; nothing was ingested
    #[error("Import failed: {}", format_errors(.0))]
    Invalid(Vec<ValidationError>),

    /// The payload is not parseable JSON at all
    #[error("Invalid JSON file or corrupted data")]
    Malformed(#[from] serde_json::Error),
}

impl SnapshotError {
    /// The individual validation messages, if any
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            SnapshotError::Invalid(errors) => errors,
            SnapshotError::Malformed(_) => &[],
        }
    }
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn book(id: &str) -> BookRecord {
        let mut b = BookRecord::new("Title", "Author");
        b.id = id.to_string();
        b
    }

    fn populated_store() -> ShelfStore {
        let mut store = ShelfStore::new();
        store.replace_all(
            vec![book("g1"), book("g2")],
            vec![book("r1")],
            vec![book("d1")],
        );
        store
    }

    #[test]
    fn test_capture() {
        let snapshot = Snapshot::capture(&populated_store());
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.goal_books.len(), 2);
        assert_eq!(snapshot.currently_reading.len(), 1);
        assert_eq!(snapshot.read_books.len(), 1);
        assert_eq!(snapshot.total_books, 4);
    }

    #[test]
    fn test_wire_format_field_names() {
        let snapshot = Snapshot::capture(&populated_store());
        let value = serde_json::to_value(&snapshot).unwrap();

        for field in ["exportDate", "version", "goalBooks", "readBooks", "currentlyReading", "totalBooks"] {
            assert!(value.get(field).is_some(), "missing field {field}");
        }
    }

    #[test]
    fn test_round_trip_reproduces_shelves() {
        let store = populated_store();
        let snapshot = Snapshot::capture(&store);

        let value = serde_json::to_value(&snapshot).unwrap();
        let restored = Snapshot::from_value(&value).unwrap();
        let (goal, reading, read) = restored.into_shelves();

        let ids = |books: &[BookRecord]| {
            books.iter().map(|b| b.id.clone()).collect::<Vec<_>>()
        };
        assert_eq!(ids(&goal), ids(store.shelf(Shelf::Goal)));
        assert_eq!(ids(&reading), ids(store.shelf(Shelf::Reading)));
        assert_eq!(ids(&read), ids(store.shelf(Shelf::Read)));
    }

    #[test]
    fn test_validate_accepts_minimal_payload() {
        let raw = json!({
            "goalBooks": [],
            "readBooks": [],
            "currentlyReading": []
        });
        assert!(validate(&raw).is_empty());
    }

    #[test]
    fn test_validate_rejects_non_object() {
        let errors = validate(&json!([1, 2, 3]));
        assert_eq!(errors, vec![ValidationError::InvalidFormat]);
        assert_eq!(errors[0].to_string(), "Invalid file format");
    }

    #[test]
    fn test_validate_rejects_missing_shelf_field() {
        let raw = json!({
            "goalBooks": [],
            "readBooks": []
        });
        let errors = validate(&raw);
        assert_eq!(
            errors,
            vec![ValidationError::MissingShelf {
                field: "currentlyReading"
            }]
        );
        assert_eq!(
            errors[0].to_string(),
            "Missing or invalid currentlyReading data"
        );
    }

    #[test]
    fn test_validate_rejects_non_list_shelf() {
        let raw = json!({
            "goalBooks": "oops",
            "readBooks": [],
            "currentlyReading": []
        });
        let errors = validate(&raw);
        assert_eq!(
            errors,
            vec![ValidationError::MissingShelf { field: "goalBooks" }]
        );
    }

    #[test]
    fn test_validate_rejects_book_without_id() {
        let raw = json!({
            "goalBooks": [{ "title": "No Id" }],
            "readBooks": [],
            "currentlyReading": []
        });
        let errors = validate(&raw);
        assert_eq!(
            errors,
            vec![ValidationError::MissingBookField {
                position: 1,
                field: "id"
            }]
        );
    }

    #[test]
    fn test_validate_rejects_non_object_book() {
        let raw = json!({
            "goalBooks": [42],
            "readBooks": [],
            "currentlyReading": []
        });
        let errors = validate(&raw);
        assert_eq!(errors, vec![ValidationError::InvalidBook { position: 1 }]);
    }

    #[test]
    fn test_validate_positions_span_all_shelves() {
        let raw = json!({
            "goalBooks": [{ "id": "g1" }],
            "readBooks": [{ "title": "no id" }],
            "currentlyReading": []
        });
        let errors = validate(&raw);
        // The read book is the second in the combined walk
        assert_eq!(
            errors,
            vec![ValidationError::MissingBookField {
                position: 2,
                field: "id"
            }]
        );
    }

    #[test]
    fn test_from_value_refuses_invalid_payload() {
        let raw = json!({ "goalBooks": [] });
        let err = Snapshot::from_value(&raw).unwrap_err();
        assert_eq!(err.validation_errors().len(), 2);
    }

    #[test]
    fn test_from_value_normalizes_raw_volume_shapes() {
        // Goal shelves of old exports hold raw catalog volumes
        let raw = json!({
            "goalBooks": [{
                "id": "vol1",
                "volumeInfo": { "title": "Dune", "authors": ["Frank Herbert"] }
            }],
            "readBooks": [],
            "currentlyReading": []
        });

        let snapshot = Snapshot::from_value(&raw).unwrap();
        assert_eq!(snapshot.goal_books[0].title, "Dune");
        assert_eq!(snapshot.goal_books[0].author, "Frank Herbert");
        assert_eq!(snapshot.total_books, 1);
    }

    #[test]
    fn test_from_value_carries_version_without_enforcing() {
        let raw = json!({
            "version": "0.9",
            "goalBooks": [],
            "readBooks": [],
            "currentlyReading": []
        });
        let snapshot = Snapshot::from_value(&raw).unwrap();
        assert_eq!(snapshot.version, "0.9");
    }

    #[test]
    fn test_from_value_recomputes_total() {
        // A wrong totalBooks in the payload is ignored
        let raw = json!({
            "totalBooks": 99,
            "goalBooks": [{ "id": "g1" }],
            "readBooks": [],
            "currentlyReading": []
        });
        let snapshot = Snapshot::from_value(&raw).unwrap();
        assert_eq!(snapshot.total_books, 1);
    }
}
