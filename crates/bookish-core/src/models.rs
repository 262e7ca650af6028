//! Data models for Bookish
//!
//! Defines `BookRecord`, the canonical shape of a tracked book, and the
//! normalization rules that coerce heterogeneous sources (raw catalog search
//! hits, previously stored records) into it. Normalization is pure and never
//! fails: absent or malformed fields degrade to defaults.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Fallback title when neither the record nor the catalog provides one
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Fallback author display value
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
/// Fallback page count when the catalog provides none
pub const DEFAULT_TOTAL_PAGES: u32 = 200;
/// Fallback genre
pub const DEFAULT_GENRE: &str = "Fiction";

/// A book as it exists on any shelf
///
/// Wire names are camelCase to stay compatible with the export file format.
/// Raw catalog payload fields (thumbnail, description, preview link, ...)
/// are retained opaquely in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// Stable identity, unique within the union of all shelves.
    /// Catalog identifier for searched books, uuid-v4 for manual records.
    pub id: String,
    /// Display title, never empty
    pub title: String,
    /// Display author, never empty
    pub author: String,
    /// Positive page count
    pub total_pages: u32,
    /// Present only while on the reading shelf; always in `[0, total_pages]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
    /// Set when the record enters the reading shelf
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Set when the record enters the read shelf
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_date: Option<NaiveDate>,
    /// Never empty; defaults to "Fiction"
    pub genre: String,
    /// In `[1,5]`; required once the record is on the read shelf
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Free-text review, attached on entry to the read shelf
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    /// Opaque passthrough of unrecognized fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BookRecord {
    /// Create a manually entered record with a synthesized id
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        let title = non_empty(title.into()).unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        let author = non_empty(author.into()).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            author,
            total_pages: DEFAULT_TOTAL_PAGES,
            current_page: None,
            start_date: None,
            finished_date: None,
            genre: DEFAULT_GENRE.to_string(),
            rating: None,
            review: None,
            extra: Map::new(),
        }
    }

    /// Normalize a raw catalog search hit into a record
    pub fn from_catalog(volume: &CatalogVolume) -> Self {
        let info = &volume.volume_info;

        let mut extra = Map::new();
        if let Some(ref links) = info.image_links {
            if let Some(ref thumb) = links.thumbnail {
                extra.insert("thumbnail".to_string(), Value::String(thumb.clone()));
            }
        }
        if let Some(ref desc) = info.description {
            extra.insert("description".to_string(), Value::String(desc.clone()));
        }
        if let Some(ref preview) = info.preview_link {
            extra.insert("previewLink".to_string(), Value::String(preview.clone()));
        }
        if let Some(ref published) = info.published_date {
            extra.insert("publishedDate".to_string(), Value::String(published.clone()));
        }

        Self {
            id: volume.id.clone(),
            title: info
                .title
                .clone()
                .and_then(non_empty)
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            author: non_empty(info.authors.join(", "))
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            total_pages: info
                .page_count
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_TOTAL_PAGES),
            current_page: None,
            start_date: None,
            finished_date: None,
            genre: info
                .categories
                .first()
                .cloned()
                .and_then(non_empty)
                .unwrap_or_else(|| DEFAULT_GENRE.to_string()),
            rating: None,
            review: None,
            extra,
        }
    }

    /// Normalize any duck-typed object into a record
    ///
    /// Accepts both stored records and raw catalog volumes (which nest their
    /// fields under `volumeInfo`). This is the coercion boundary: anything
    /// ingested from disk or an import file passes through here, so malformed
    /// data degrades to defaults instead of erroring.
    pub fn from_raw(raw: &Value) -> Self {
        let info = raw.get("volumeInfo");

        let id = match raw.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => Uuid::new_v4().to_string(),
        };

        let title = str_field(raw, "title")
            .or_else(|| info.and_then(|i| str_field(i, "title")))
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

        let author = str_field(raw, "author")
            .or_else(|| {
                info.and_then(|i| i.get("authors"))
                    .and_then(Value::as_array)
                    .map(|authors| {
                        authors
                            .iter()
                            .filter_map(Value::as_str)
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .and_then(non_empty)
            })
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        // Stored page count wins over the catalog-provided one
        let total_pages = uint_field(raw, "totalPages")
            .or_else(|| uint_field(raw, "pages"))
            .or_else(|| info.and_then(|i| uint_field(i, "pageCount")))
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_TOTAL_PAGES);

        let genre = str_field(raw, "genre")
            .or_else(|| {
                info.and_then(|i| i.get("categories"))
                    .and_then(Value::as_array)
                    .and_then(|cats| cats.first())
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .and_then(non_empty)
            })
            .unwrap_or_else(|| DEFAULT_GENRE.to_string());

        let current_page = uint_field(raw, "currentPage").map(|p| p.min(total_pages));

        let rating = uint_field(raw, "rating")
            .filter(|&r| (1..=5).contains(&r))
            .map(|r| r as u8);

        let review = str_field(raw, "review");

        let start_date = date_field(raw, "startDate");
        let finished_date = date_field(raw, "finishedDate");

        const KNOWN: &[&str] = &[
            "id",
            "title",
            "author",
            "totalPages",
            "pages",
            "currentPage",
            "startDate",
            "finishedDate",
            "genre",
            "rating",
            "review",
        ];
        let extra = match raw.as_object() {
            Some(obj) => obj
                .iter()
                .filter(|(k, _)| !KNOWN.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            None => Map::new(),
        };

        Self {
            id,
            title,
            author,
            total_pages,
            current_page,
            start_date,
            finished_date,
            genre,
            rating,
            review,
            extra,
        }
    }

    /// Clamp a requested page into `[0, total_pages]`
    pub fn clamp_page(&self, page: i64) -> u32 {
        page.clamp(0, i64::from(self.total_pages)) as u32
    }
}

/// A validated star rating in `[1,5]`
///
/// Constructing one is the only way to move a book onto the read shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating(u8);

impl Rating {
    /// Validate a raw rating value
    pub fn new(value: u8) -> Result<Self, InvalidRating> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidRating(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Rejected rating outside `[1,5]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Rating must be between 1 and 5 stars, got {0}")]
pub struct InvalidRating(pub u8);

/// A raw catalog search hit
///
/// Mirrors the upstream volumes API shape; the schema is not guaranteed
/// complete, so everything below `id` is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogVolume {
    pub id: String,
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

/// Nested info block of a catalog volume
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub page_count: Option<u32>,
    pub categories: Vec<String>,
    pub image_links: Option<ImageLinks>,
    pub description: Option<String>,
    pub preview_link: Option<String>,
    pub published_date: Option<String>,
}

/// Cover image links of a catalog volume
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .and_then(non_empty)
}

fn uint_field(value: &Value, key: &str) -> Option<u32> {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_u64().map(|v| v.min(u64::from(u32::MAX)) as u32),
        // Tolerate stringly-typed numbers from hand-edited files
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

fn date_field(value: &Value, key: &str) -> Option<NaiveDate> {
    value
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}
