//! iTunes Search API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::page::decode_page;
use super::{CatalogClient, CatalogError, CatalogPage, Category};

/// iTunes search client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItunesConfig {
    /// Base URL (default: https://itunes.apple.com).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Maximum number of results per search (the API caps this at 200).
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Store section searched when the caller does not pick one.
    #[serde(default)]
    pub category: Category,
}

fn default_base_url() -> String {
    "https://itunes.apple.com".to_string()
}

fn default_limit() -> u32 {
    200
}

fn default_timeout() -> u32 {
    30
}

impl Default for ItunesConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            limit: default_limit(),
            timeout_secs: default_timeout(),
            category: Category::default(),
        }
    }
}

/// iTunes Search API client.
pub struct ItunesClient {
    client: Client,
    base_url: String,
    limit: u32,
}

impl ItunesClient {
    /// Create a new client.
    pub fn new(config: &ItunesConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limit: config.limit,
        })
    }

    /// Build the search URL for a term and category.
    fn build_search_url(&self, term: &str, category: Category) -> String {
        format!(
            "{}/search?term={}&limit={}&entity={}",
            self.base_url,
            urlencoding::encode(term),
            self.limit,
            category.entity()
        )
    }
}

#[async_trait]
impl CatalogClient for ItunesClient {
    async fn search(&self, term: &str, category: Category) -> Result<CatalogPage, CatalogError> {
        let url = self.build_search_url(term, category);
        debug!("iTunes search: term='{}', category={:?}", term, category);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("iTunes search returned status {}", status);
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: serde_json::Value = response.json().await?;
        let page = decode_page(&body)?;

        debug!(
            "iTunes search: term='{}' returned {} results",
            term,
            page.len()
        );

        Ok(page)
    }
}
