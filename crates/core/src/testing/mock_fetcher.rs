//! Mock image fetcher for testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::thumbnail::{FetchError, ImageFetcher};

#[derive(Debug, Clone)]
enum MockResponse {
    Bytes(Vec<u8>),
    Status(u16),
}

/// Mock implementation of the ImageFetcher trait.
///
/// Responses are configured per URL, with an optional fallback for every
/// other URL. Unconfigured URLs without a fallback answer 404.
#[derive(Debug, Default)]
pub struct MockImageFetcher {
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    default_response: Arc<RwLock<Option<Vec<u8>>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    requests: Arc<RwLock<Vec<String>>>,
}

impl MockImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` for `url`.
    pub async fn set_response(&self, url: &str, bytes: Vec<u8>) {
        self.responses
            .write()
            .await
            .insert(url.to_string(), MockResponse::Bytes(bytes));
    }

    /// Answer `url` with a non-success HTTP status.
    pub async fn set_failure(&self, url: &str, status: u16) {
        self.responses
            .write()
            .await
            .insert(url.to_string(), MockResponse::Status(status));
    }

    /// Serve `bytes` for every URL without its own response.
    pub async fn set_default_response(&self, bytes: Vec<u8>) {
        *self.default_response.write().await = Some(bytes);
    }

    /// Delay every fetch by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// URLs requested so far, in request order.
    pub async fn recorded_requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl ImageFetcher for MockImageFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.write().await.push(url.to_string());

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let configured = self.responses.read().await.get(url).cloned();
        match configured {
            Some(MockResponse::Bytes(bytes)) => Ok(bytes),
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                status,
                url: url.to_string(),
            }),
            None => match self.default_response.read().await.clone() {
                Some(bytes) => Ok(bytes),
                None => Err(FetchError::Status {
                    status: 404,
                    url: url.to_string(),
                }),
            },
        }
    }
}
