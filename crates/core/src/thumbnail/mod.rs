//! Thumbnail fetching bound to short-lived owners.
//!
//! The [`FetchTaskRegistry`] issues artwork downloads for popups and grid
//! cells, and makes sure a download never paints an owner that was torn down
//! or recycled while it was in flight. Results are handed to the presentation
//! context through a [`DeliveryQueue`].
//!
//! # Example
//!
//! ```rust,ignore
//! let fetcher = Arc::new(HttpFetcher::new(&ThumbnailConfig::default())?);
//! let (registry, mut deliveries) = FetchTaskRegistry::new(fetcher);
//!
//! let scope = registry.open_scope();
//! registry.begin_fetch(scope, entry.image_large(), |thumbnail| {
//!     // paint
//! });
//!
//! deliveries.deliver_ready();
//! // on teardown
//! registry.cancel_all(scope);
//! ```

mod http;
mod registry;

pub use http::{HttpFetcher, ThumbnailConfig};
pub use registry::{DeliveryQueue, FetchHandle, FetchScope, FetchTaskRegistry};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching a thumbnail.
///
/// These never reach the completion sink; a failed fetch simply paints nothing.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    /// Bytes are not a decodable image.
    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    /// The decode task panicked or was aborted.
    #[error("Decode task failed: {0}")]
    TaskFailed(String),
}

/// Capability that downloads raw bytes for a URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// A decoded RGBA8 image ready to paint.
#[derive(Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA pixels, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl Thumbnail {
    /// Decode PNG or JPEG bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, FetchError> {
        let image =
            image::load_from_memory(bytes).map_err(|e| FetchError::InvalidImage(e.to_string()))?;
        let rgba = image.to_rgba8();

        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }
}

impl std::fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thumbnail")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}
