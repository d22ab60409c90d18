//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the capability traits so the
//! search flow and the thumbnail lifecycle can be exercised without network
//! access.
//!
//! # Example
//!
//! ```rust,ignore
//! use storesearch_core::testing::{fixtures, MockCatalogClient, MockImageFetcher};
//!
//! let catalog = MockCatalogClient::new();
//! catalog.set_page("beatles", fixtures::catalog_page(&["Help!"])).await;
//!
//! let fetcher = MockImageFetcher::new();
//! fetcher.set_default_response(fixtures::png_bytes(60, 60)).await;
//! ```

mod mock_catalog;
mod mock_fetcher;

pub use mock_catalog::{MockCatalogClient, RecordedSearch};
pub use mock_fetcher::MockImageFetcher;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::io::Cursor;

    use serde_json::{json, Value};

    use crate::catalog::{CatalogEntry, CatalogPage};

    /// Raw feed record for a song, with artwork URLs derived from the name.
    pub fn song_record(name: &str) -> Value {
        let slug = name.to_lowercase().replace(' ', "-");
        json!({
            "kind": "song",
            "artistName": "Test Artist",
            "currency": "USD",
            "trackName": name,
            "trackPrice": 1.29,
            "trackViewUrl": format!("https://store.example.com/track/{}", slug),
            "collectionName": format!("{} (Single)", name),
            "collectionPrice": 1.29,
            "artworkUrl60": artwork_url(&slug, 60),
            "artworkUrl100": artwork_url(&slug, 100),
            "primaryGenreName": "Pop"
        })
    }

    /// Artwork URL used by fixture records.
    pub fn artwork_url(slug: &str, size: u32) -> String {
        format!("https://img.example.com/{}/{}x{}bb.jpg", slug, size, size)
    }

    /// Raw search response holding one song record per name.
    pub fn search_response(names: &[&str]) -> Value {
        let results: Vec<Value> = names.iter().map(|name| song_record(name)).collect();
        json!({
            "resultCount": results.len(),
            "results": results
        })
    }

    /// Decoded song entry.
    pub fn catalog_entry(name: &str) -> CatalogEntry {
        CatalogEntry::decode(&song_record(name)).expect("fixture record should decode")
    }

    /// Decoded page with one song entry per name.
    pub fn catalog_page(names: &[&str]) -> CatalogPage {
        CatalogPage {
            result_count: names.len(),
            entries: names.iter().map(|name| catalog_entry(name)).collect(),
        }
    }

    /// A solid-color PNG of the given size.
    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
        let mut bytes = Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, image::ImageFormat::Png)
            .expect("in-memory PNG encoding should succeed");
        bytes.into_inner()
    }
}
