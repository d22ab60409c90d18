use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::SearchState;
use crate::catalog::{CatalogClient, CatalogError, Category};

/// Runs searches and publishes the resulting [`SearchState`].
///
/// The presentation layer subscribes to state changes instead of toggling
/// spinners and labels from each call site.
pub struct SearchSession {
    client: Arc<dyn CatalogClient>,
    state: watch::Sender<SearchState>,
}

impl SearchSession {
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self { client, state }
    }

    /// Receive every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Search the catalog for `term`.
    ///
    /// A blank term is ignored. On failure the session falls back to
    /// `NotSearchedYet` and the error is returned for the caller to report.
    pub async fn perform_search(&self, term: &str, category: Category) -> Result<(), CatalogError> {
        let term = term.trim();
        if term.is_empty() {
            debug!("Ignoring blank search term");
            return Ok(());
        }

        self.state.send_replace(SearchState::Loading);
        info!("Searching catalog for '{}' ({:?})", term, category);

        match self.client.search(term, category).await {
            Ok(page) => {
                info!("Search for '{}' returned {} results", term, page.len());
                self.state.send_replace(SearchState::from_page(page));
                Ok(())
            }
            Err(e) => {
                warn!("Search for '{}' failed: {}", term, e);
                self.state.send_replace(SearchState::NotSearchedYet);
                Err(e)
            }
        }
    }
}
