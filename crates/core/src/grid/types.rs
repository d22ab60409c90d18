use serde::{Deserialize, Serialize};

/// Visible area the grid is laid out in, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(default = "default_viewport_width")]
    pub width: f64,
    #[serde(default = "default_viewport_height")]
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

fn default_viewport_width() -> f64 {
    667.0
}

fn default_viewport_height() -> f64 {
    375.0
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

/// Cell and control sizes of the thumbnail grid.
///
/// Each cell is a fixed-size slot; the control (the tappable thumbnail) is
/// centered inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    #[serde(default = "default_cell_width")]
    pub cell_width: f64,
    #[serde(default = "default_cell_height")]
    pub cell_height: f64,
    #[serde(default = "default_control_size")]
    pub control_width: f64,
    #[serde(default = "default_control_size")]
    pub control_height: f64,
}

fn default_cell_width() -> f64 {
    94.0
}

fn default_cell_height() -> f64 {
    88.0
}

fn default_control_size() -> f64 {
    82.0
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            cell_width: default_cell_width(),
            cell_height: default_cell_height(),
            control_width: default_control_size(),
            control_height: default_control_size(),
        }
    }
}

/// Position of one item in the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Index of the item in the input list.
    pub index: usize,
    pub page: usize,
    pub row: usize,
    pub column: usize,
    /// Origin of the control, in the continuous horizontal space spanning
    /// all pages.
    pub x: f64,
    pub y: f64,
}

/// Complete layout of a list of items.
#[derive(Debug, Clone, PartialEq)]
pub struct TilingPlan {
    pub page_count: usize,
    pub columns_per_page: usize,
    pub rows_per_page: usize,
    pub margin_x: f64,
    pub margin_y: f64,
    /// One placement per item, in item order.
    pub placements: Vec<Placement>,
}

impl TilingPlan {
    pub fn items_per_page(&self) -> usize {
        self.columns_per_page.saturating_mul(self.rows_per_page)
    }

    /// Total scrollable width. An empty result still occupies one page.
    pub fn content_width(&self, viewport: Viewport) -> f64 {
        self.page_count.max(1) as f64 * viewport.width
    }

    /// Page shown at horizontal scroll offset `offset_x`.
    ///
    /// A page counts as current once more than half of it is visible.
    pub fn page_at_offset(&self, offset_x: f64, viewport_width: f64) -> usize {
        if viewport_width <= 0.0 || self.page_count == 0 {
            return 0;
        }
        let page = ((offset_x + viewport_width / 2.0) / viewport_width).floor();
        if page <= 0.0 {
            0
        } else {
            (page as usize).min(self.page_count - 1)
        }
    }

    /// Horizontal scroll offset that shows `page`.
    pub fn offset_for_page(&self, page: usize, viewport_width: f64) -> f64 {
        viewport_width * page as f64
    }

    /// Placements that land on `page`.
    pub fn placements_on_page(&self, page: usize) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.page == page)
    }
}
