//! Headless presentation adapter: lays the results out and fills every cell
//! with its artwork, logging what a screen would show.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use storesearch_core::{
    plan_tiling, CatalogEntry, Config, DeliveryQueue, FetchScope, FetchTaskRegistry,
    GridGeometry, SearchState, TilingPlan, Viewport,
};

pub struct GridAdapter {
    viewport: Viewport,
    geometry: GridGeometry,
    delivery_timeout: Duration,
    registry: FetchTaskRegistry,
    deliveries: DeliveryQueue,
}

impl GridAdapter {
    pub fn new(config: &Config, registry: FetchTaskRegistry, deliveries: DeliveryQueue) -> Self {
        Self {
            viewport: config.viewport,
            geometry: config.grid,
            delivery_timeout: Duration::from_secs(config.thumbnails.delivery_timeout_secs),
            registry,
            deliveries,
        }
    }

    /// Render one search state.
    pub async fn show(self, state: &SearchState) {
        match state {
            SearchState::NotSearchedYet => {}
            SearchState::Loading => info!("Loading..."),
            SearchState::NoResults => info!("Nothing Found"),
            SearchState::Results(entries) => self.show_results(entries).await,
        }
    }

    async fn show_results(mut self, entries: &[CatalogEntry]) {
        let plan = plan_tiling(entries.len(), self.viewport, self.geometry);
        info!(
            "Number of pages: {} ({} columns x {} rows per page)",
            plan.page_count, plan.columns_per_page, plan.rows_per_page
        );

        let scope = self.registry.open_scope();
        let painted = self.bind_cells(scope, entries, &plan);

        self.wait_for_thumbnails(scope).await;

        // Teardown: nothing may paint once the grid is gone.
        let cancelled = self.registry.cancel_all(scope);
        info!(
            "Painted {} of {} cells, cancelled {}",
            painted.load(Ordering::SeqCst),
            plan.placements.len(),
            cancelled
        );
    }

    /// Start one fetch per placed cell.
    fn bind_cells(
        &self,
        scope: FetchScope,
        entries: &[CatalogEntry],
        plan: &TilingPlan,
    ) -> Arc<AtomicUsize> {
        let painted = Arc::new(AtomicUsize::new(0));

        for placement in &plan.placements {
            let entry = &entries[placement.index];
            debug!(
                "Cell {} page {} at ({:.1}, {:.1}): {} [{}, {}]",
                placement.index,
                placement.page,
                placement.x,
                placement.y,
                entry,
                entry.type_label(),
                entry.genre()
            );

            if entry.image_small().is_empty() {
                continue;
            }

            let painted = Arc::clone(&painted);
            let cell = *placement;
            self.registry
                .bind_slot(scope, cell.index, entry.image_small(), move |thumbnail| {
                    painted.fetch_add(1, Ordering::SeqCst);
                    info!(
                        "Painted cell {} (page {}, column {}, row {}) with {}x{} artwork",
                        cell.index,
                        cell.page,
                        cell.column,
                        cell.row,
                        thumbnail.width,
                        thumbnail.height
                    );
                });
        }

        painted
    }

    async fn wait_for_thumbnails(&mut self, scope: FetchScope) {
        let deadline = tokio::time::sleep(self.delivery_timeout);
        tokio::pin!(deadline);

        while self.registry.pending_in_scope(scope) > 0 {
            tokio::select! {
                settled = self.deliveries.deliver_next() => {
                    if settled.is_none() {
                        break;
                    }
                }
                _ = &mut deadline => {
                    warn!("Timed out waiting for thumbnails");
                    break;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storesearch_core::testing::{fixtures, MockImageFetcher};

    fn results(names: &[&str]) -> SearchState {
        SearchState::from_page(fixtures::catalog_page(names))
    }

    #[tokio::test]
    async fn test_every_cell_gets_its_artwork() {
        let fetcher = Arc::new(MockImageFetcher::new());
        fetcher.set_default_response(fixtures::png_bytes(60, 60)).await;
        let (registry, deliveries) = FetchTaskRegistry::new(fetcher.clone());

        let adapter = GridAdapter::new(&Config::default(), registry.clone(), deliveries);
        adapter.show(&results(&["One", "Two", "Three"])).await;

        assert_eq!(fetcher.request_count().await, 3);
        assert_eq!(registry.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_teardown_cancels_slow_fetches() {
        let fetcher = Arc::new(MockImageFetcher::new());
        fetcher.set_default_response(fixtures::png_bytes(60, 60)).await;
        fetcher.set_delay(Duration::from_secs(30)).await;
        let (registry, deliveries) = FetchTaskRegistry::new(fetcher);

        let mut config = Config::default();
        config.thumbnails.delivery_timeout_secs = 0;

        let adapter = GridAdapter::new(&config, registry.clone(), deliveries);
        adapter.show(&results(&["Slow"])).await;

        assert_eq!(registry.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_no_results_starts_no_fetches() {
        let fetcher = Arc::new(MockImageFetcher::new());
        let (registry, deliveries) = FetchTaskRegistry::new(fetcher.clone());

        let adapter = GridAdapter::new(&Config::default(), registry, deliveries);
        adapter.show(&SearchState::NoResults).await;

        assert_eq!(fetcher.request_count().await, 0);
    }
}
