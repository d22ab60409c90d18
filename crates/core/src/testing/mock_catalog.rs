//! Mock catalog client for testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::{CatalogClient, CatalogError, CatalogPage, Category};

/// A recorded search for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSearch {
    pub term: String,
    pub category: Category,
}

/// Mock implementation of the CatalogClient trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable pages per search term
/// - Track searches for assertions
/// - Simulate failures and slow responses
#[derive(Debug, Default)]
pub struct MockCatalogClient {
    /// Pages by search term. Unknown terms return an empty page.
    pages: Arc<RwLock<HashMap<String, CatalogPage>>>,
    /// Recorded searches.
    searches: Arc<RwLock<Vec<RecordedSearch>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
    /// Artificial latency per search.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockCatalogClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page returned for `term`.
    pub async fn set_page(&self, term: &str, page: CatalogPage) {
        self.pages.write().await.insert(term.to_string(), page);
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay every search by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Get all recorded searches.
    pub async fn recorded_searches(&self) -> Vec<RecordedSearch> {
        self.searches.read().await.clone()
    }

    /// Get the number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }
}

#[async_trait]
impl CatalogClient for MockCatalogClient {
    async fn search(&self, term: &str, category: Category) -> Result<CatalogPage, CatalogError> {
        self.searches.write().await.push(RecordedSearch {
            term: term.to_string(),
            category,
        });

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(self
            .pages
            .read()
            .await
            .get(term)
            .cloned()
            .unwrap_or_default())
    }
}
