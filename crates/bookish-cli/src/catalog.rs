//! Remote catalog search
//!
//! Queries the configured volumes endpoint (Google Books by default) and
//! returns raw catalog hits. The upstream schema is not guaranteed complete;
//! response parsing tolerates any field being absent. A search failure is
//! surfaced to the caller and never touches shelf state.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use bookish_core::CatalogVolume;

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Default number of results per search
pub const DEFAULT_LIMIT: u32 = 10;

/// Client for the remote book catalog
pub struct CatalogClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

/// Top-level volumes API response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<CatalogVolume>,
}

impl CatalogClient {
    /// Create a client against the given volumes endpoint
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT))
            .user_agent("Mozilla/5.0 (compatible; Bookish/1.0)")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Search the catalog
    ///
    /// `offset` and `limit` map to the endpoint's `startIndex`/`maxResults`
    /// pagination parameters. A query with no matches returns an empty list.
    pub fn search(&self, query: &str, offset: u32, limit: u32) -> Result<Vec<CatalogVolume>> {
        debug!(query, offset, limit, "catalog search");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("startIndex", &offset.to_string()),
                ("maxResults", &limit.to_string()),
            ])
            .send()
            .context("Catalog search request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Catalog search failed with status {}", status);
        }

        let body = response.text().context("Failed to read search response")?;
        parse_search_response(&body)
    }
}

/// Parse a volumes API response body
fn parse_search_response(body: &str) -> Result<Vec<CatalogVolume>> {
    let response: SearchResponse =
        serde_json::from_str(body).context("Failed to parse search response")?;
    Ok(response.items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let body = r#"{
            "kind": "books#volumes",
            "totalItems": 1,
            "items": [{
                "id": "vol1",
                "volumeInfo": {
                    "title": "Dune",
                    "authors": ["Frank Herbert"],
                    "pageCount": 412,
                    "categories": ["Fiction"],
                    "imageLinks": { "thumbnail": "http://example.com/t.jpg" },
                    "description": "Desert planet",
                    "previewLink": "http://example.com/p",
                    "publishedDate": "1965"
                }
            }]
        }"#;

        let volumes = parse_search_response(body).unwrap();
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].id, "vol1");
        assert_eq!(volumes[0].volume_info.title.as_deref(), Some("Dune"));
        assert_eq!(volumes[0].volume_info.page_count, Some(412));
    }

    #[test]
    fn test_parse_missing_items() {
        // No matches: the endpoint omits "items" entirely
        let volumes = parse_search_response(r#"{"kind": "books#volumes", "totalItems": 0}"#).unwrap();
        assert!(volumes.is_empty());
    }

    #[test]
    fn test_parse_sparse_volume() {
        let body = r#"{ "items": [{ "id": "vol2" }] }"#;
        let volumes = parse_search_response(body).unwrap();
        assert_eq!(volumes[0].id, "vol2");
        assert!(volumes[0].volume_info.title.is_none());
        assert!(volumes[0].volume_info.authors.is_empty());
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(parse_search_response("not json").is_err());
    }
}
