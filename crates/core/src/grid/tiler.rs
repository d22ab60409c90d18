use super::types::{GridGeometry, Placement, TilingPlan, Viewport};

/// How many whole cells of size `cell` fit into `extent`.
fn cells_fitting(extent: f64, cell: f64) -> usize {
    if extent > 0.0 && cell > 0.0 {
        (extent / cell).floor() as usize
    } else {
        0
    }
}

/// Lay `item_count` items out on equally sized pages.
///
/// Items fill a page column by column, top to bottom. Pages sit side by side
/// in one continuous horizontal space, each centered in the viewport, so
/// moving to the next page skips the trailing margin of the current page and
/// the leading margin of the next one.
///
/// When the viewport cannot hold a single cell the plan has one page and no
/// placements. No items means no pages.
pub fn plan_tiling(item_count: usize, viewport: Viewport, geometry: GridGeometry) -> TilingPlan {
    let cell_width = geometry.cell_width;
    let cell_height = geometry.cell_height;

    let columns_per_page = cells_fitting(viewport.width, cell_width);
    let rows_per_page = cells_fitting(viewport.height, cell_height);

    let margin_x = (viewport.width - columns_per_page as f64 * cell_width) / 2.0;
    let margin_y = (viewport.height - rows_per_page as f64 * cell_height) / 2.0;

    let padding_horz = (cell_width - geometry.control_width) / 2.0;
    let padding_vert = (cell_height - geometry.control_height) / 2.0;

    // A huge viewport fits more cells than usize can count.
    let items_per_page = columns_per_page.saturating_mul(rows_per_page);

    let mut plan = TilingPlan {
        page_count: 0,
        columns_per_page,
        rows_per_page,
        margin_x,
        margin_y,
        placements: Vec::new(),
    };

    if item_count == 0 {
        return plan;
    }
    if items_per_page == 0 {
        plan.page_count = 1;
        return plan;
    }

    plan.placements.reserve(item_count);

    let mut row = 0;
    let mut column = 0;
    let mut page = 0;
    let mut x = margin_x;

    for index in 0..item_count {
        plan.placements.push(Placement {
            index,
            page,
            row,
            column,
            x: x + padding_horz,
            y: margin_y + row as f64 * cell_height + padding_vert,
        });

        row += 1;
        if row == rows_per_page {
            row = 0;
            x += cell_width;
            column += 1;
            if column == columns_per_page {
                column = 0;
                x += margin_x * 2.0;
                page += 1;
            }
        }
    }

    plan.page_count = 1 + (item_count - 1) / items_per_page;
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 7 columns x 4 rows with the default cell size.
    fn landscape() -> Viewport {
        Viewport::new(667.0, 375.0)
    }

    #[test]
    fn test_no_items_no_pages() {
        let plan = plan_tiling(0, landscape(), GridGeometry::default());
        assert_eq!(plan.page_count, 0);
        assert!(plan.placements.is_empty());
    }

    #[test]
    fn test_viewport_smaller_than_cell() {
        let plan = plan_tiling(5, Viewport::new(50.0, 300.0), GridGeometry::default());
        assert_eq!(plan.columns_per_page, 0);
        assert_eq!(plan.page_count, 1);
        assert!(plan.placements.is_empty());

        let plan = plan_tiling(5, Viewport::new(300.0, 80.0), GridGeometry::default());
        assert_eq!(plan.rows_per_page, 0);
        assert_eq!(plan.page_count, 1);
        assert!(plan.placements.is_empty());
    }

    #[test]
    fn test_huge_viewport_keeps_everything_on_one_page() {
        for viewport in [
            Viewport::new(1e30, 375.0),
            Viewport::new(667.0, 1e30),
            Viewport::new(f64::INFINITY, 375.0),
        ] {
            let plan = plan_tiling(3, viewport, GridGeometry::default());
            assert_eq!(plan.page_count, 1);
            assert_eq!(plan.placements.len(), 3);
            assert!(plan.placements.iter().all(|p| p.page == 0));
            assert_eq!(plan.items_per_page(), usize::MAX);
        }
    }

    #[test]
    fn test_exact_fit_has_zero_margins() {
        let viewport = Viewport::new(94.0 * 5.0, 88.0 * 3.0);
        let plan = plan_tiling(10, viewport, GridGeometry::default());

        assert_eq!(plan.columns_per_page, 5);
        assert_eq!(plan.rows_per_page, 3);
        assert_eq!(plan.margin_x, 0.0);
        assert_eq!(plan.margin_y, 0.0);
    }

    #[test]
    fn test_grid_metrics() {
        let plan = plan_tiling(1, landscape(), GridGeometry::default());
        assert_eq!(plan.columns_per_page, 7);
        assert_eq!(plan.rows_per_page, 4);
        assert_eq!(plan.items_per_page(), 28);
        assert_eq!(plan.margin_x, 4.5);
        assert_eq!(plan.margin_y, 11.5);
    }

    #[test]
    fn test_column_major_order() {
        let plan = plan_tiling(6, landscape(), GridGeometry::default());
        let positions: Vec<(usize, usize)> =
            plan.placements.iter().map(|p| (p.column, p.row)).collect();
        assert_eq!(
            positions,
            vec![(0, 0), (0, 1), (0, 2), (0, 3), (1, 0), (1, 1)]
        );

        let first = plan.placements[0];
        assert_eq!((first.x, first.y), (10.5, 14.5));

        let below = plan.placements[1];
        assert_eq!((below.x, below.y), (10.5, 102.5));

        let next_column = plan.placements[4];
        assert_eq!((next_column.x, next_column.y), (104.5, 14.5));
    }

    #[test]
    fn test_page_boundary_skips_both_margins() {
        let plan = plan_tiling(29, landscape(), GridGeometry::default());
        assert_eq!(plan.page_count, 2);

        let last_on_first = plan.placements[27];
        assert_eq!(
            (last_on_first.page, last_on_first.column, last_on_first.row),
            (0, 6, 3)
        );

        let first_on_second = plan.placements[28];
        assert_eq!(
            (first_on_second.page, first_on_second.column, first_on_second.row),
            (1, 0, 0)
        );
        assert_eq!(first_on_second.x, 667.0 + 10.5);
        assert_eq!(first_on_second.y, 14.5);
    }

    #[test]
    fn test_page_count() {
        let geometry = GridGeometry::default();
        assert_eq!(plan_tiling(1, landscape(), geometry).page_count, 1);
        assert_eq!(plan_tiling(28, landscape(), geometry).page_count, 1);
        assert_eq!(plan_tiling(29, landscape(), geometry).page_count, 2);
        assert_eq!(plan_tiling(56, landscape(), geometry).page_count, 2);
        assert_eq!(plan_tiling(57, landscape(), geometry).page_count, 3);
    }

    #[test]
    fn test_every_item_is_placed_on_its_page() {
        let plan = plan_tiling(200, landscape(), GridGeometry::default());
        assert_eq!(plan.placements.len(), 200);

        for (i, placement) in plan.placements.iter().enumerate() {
            assert_eq!(placement.index, i);
            assert_eq!(placement.page, i / plan.items_per_page());

            let expected_x = placement.page as f64 * 667.0
                + plan.margin_x
                + placement.column as f64 * 94.0
                + 6.0;
            assert!((placement.x - expected_x).abs() < 1e-9, "item {}", i);
        }
    }

    #[test]
    fn test_identical_inputs_identical_plans() {
        let viewport = Viewport::new(812.0, 375.0);
        let geometry = GridGeometry::default();

        let first = plan_tiling(123, viewport, geometry);
        let second = plan_tiling(123, viewport, geometry);
        assert_eq!(first, second);

        for (a, b) in first.placements.iter().zip(&second.placements) {
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
        }
    }

    #[test]
    fn test_custom_geometry_padding() {
        let geometry = GridGeometry {
            cell_width: 100.0,
            cell_height: 100.0,
            control_width: 80.0,
            control_height: 60.0,
        };
        let plan = plan_tiling(1, Viewport::new(200.0, 100.0), geometry);
        let placement = plan.placements[0];
        assert_eq!((placement.x, placement.y), (10.0, 20.0));
    }

    #[test]
    fn test_paging_helpers() {
        let plan = plan_tiling(60, landscape(), GridGeometry::default());
        assert_eq!(plan.page_count, 3);

        assert_eq!(plan.content_width(landscape()), 3.0 * 667.0);
        assert_eq!(plan.offset_for_page(2, 667.0), 1334.0);

        assert_eq!(plan.page_at_offset(0.0, 667.0), 0);
        assert_eq!(plan.page_at_offset(333.0, 667.0), 0);
        assert_eq!(plan.page_at_offset(334.0, 667.0), 1);
        assert_eq!(plan.page_at_offset(1334.0, 667.0), 2);
        assert_eq!(plan.page_at_offset(5000.0, 667.0), 2);
        assert_eq!(plan.page_at_offset(-200.0, 667.0), 0);

        assert_eq!(plan.placements_on_page(2).count(), 4);
    }

    #[test]
    fn test_empty_plan_still_has_one_page_of_content() {
        let plan = plan_tiling(0, landscape(), GridGeometry::default());
        assert_eq!(plan.content_width(landscape()), 667.0);
        assert_eq!(plan.page_at_offset(100.0, 667.0), 0);
    }
}
