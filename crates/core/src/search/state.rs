use crate::catalog::{CatalogEntry, CatalogPage};

/// What the results screen should show.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchState {
    /// No search has been run, or the last one failed.
    #[default]
    NotSearchedYet,
    /// A search is in flight.
    Loading,
    /// The last search returned nothing.
    NoResults,
    /// The last search returned these entries, in feed order.
    Results(Vec<CatalogEntry>),
}

impl SearchState {
    /// State after a search returned `page`.
    pub fn from_page(page: CatalogPage) -> Self {
        if page.is_empty() {
            Self::NoResults
        } else {
            Self::Results(page.entries)
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Entries to lay out; empty unless results are showing.
    pub fn results(&self) -> &[CatalogEntry] {
        match self {
            Self::Results(entries) => entries,
            _ => &[],
        }
    }
}
