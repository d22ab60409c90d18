pub mod catalog;
pub mod config;
pub mod grid;
pub mod search;
pub mod testing;
pub mod thumbnail;

pub use catalog::{
    decode_page, decode_page_slice, CatalogClient, CatalogEntry, CatalogError, CatalogKind,
    CatalogPage, Category, DecodeError, ItunesClient, ItunesConfig,
};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use grid::{plan_tiling, GridGeometry, Placement, TilingPlan, Viewport};
pub use search::{SearchSession, SearchState};
pub use thumbnail::{
    DeliveryQueue, FetchError, FetchHandle, FetchScope, FetchTaskRegistry, HttpFetcher,
    ImageFetcher, Thumbnail, ThumbnailConfig,
};
