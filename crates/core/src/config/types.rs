use serde::{Deserialize, Serialize};

use crate::catalog::ItunesConfig;
use crate::grid::{GridGeometry, Viewport};
use crate::thumbnail::ThumbnailConfig;

/// Root configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: ItunesConfig,
    #[serde(default)]
    pub grid: GridGeometry,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub thumbnails: ThumbnailConfig,
}
