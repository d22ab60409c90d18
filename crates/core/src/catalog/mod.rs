//! Remote catalog records and the search client that fetches them.
//!
//! Search results arrive as loosely typed JSON whose fields vary by item
//! kind. This module turns them into [`CatalogEntry`] values with stable
//! derived fields, and provides the [`CatalogClient`] seam used to query the
//! remote store.

mod entry;
mod itunes;
mod page;

pub use entry::{CatalogEntry, CatalogKind};
pub use itunes::{ItunesClient, ItunesConfig};
pub use page::{decode_page, decode_page_slice, CatalogPage};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a payload does not have the expected structure.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Payload is not valid JSON.
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// Expected a JSON object.
    #[error("Expected a mapping, found {found}")]
    NotAMapping { found: &'static str },

    /// Response has no `results` key.
    #[error("Response has no results list")]
    MissingResults,

    /// `results` is present but not a list.
    #[error("Expected results to be a list, found {found}")]
    InvalidResults { found: &'static str },

    /// One of the result records could not be decoded.
    #[error("Result {index} could not be decoded: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: Box<DecodeError>,
    },
}

/// Errors that can occur when searching the remote catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Response body had the wrong shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] DecodeError),
}

/// Store section to search in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    All,
    Music,
    Software,
    #[serde(rename = "ebooks")]
    EBooks,
}

impl Category {
    /// Value of the `entity` query parameter for this category.
    pub fn entity(&self) -> &'static str {
        match self {
            Self::All => "",
            Self::Music => "musicTrack",
            Self::Software => "software",
            Self::EBooks => "ebook",
        }
    }
}

/// Trait for remote catalog search backends.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Search the catalog. Results come back in the order the store returns them.
    async fn search(&self, term: &str, category: Category) -> Result<CatalogPage, CatalogError>;
}
