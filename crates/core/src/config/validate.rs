use super::{types::Config, ConfigError};

/// The iTunes Search API never returns more than this many results.
const MAX_SEARCH_LIMIT: u32 = 200;

/// Validate configuration
/// Currently validates:
/// - Catalog base URL is set and the result limit is within the API range
/// - Grid cells have a positive, finite size and contain their control
/// - Viewport has a positive, finite size
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Catalog validation
    if config.catalog.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.base_url cannot be empty".to_string(),
        ));
    }
    if config.catalog.limit == 0 || config.catalog.limit > MAX_SEARCH_LIMIT {
        return Err(ConfigError::ValidationError(format!(
            "catalog.limit must be between 1 and {}",
            MAX_SEARCH_LIMIT
        )));
    }

    // Grid validation
    let grid = &config.grid;
    if !is_positive(grid.cell_width) || !is_positive(grid.cell_height) {
        return Err(ConfigError::ValidationError(
            "grid cell size must be positive and finite".to_string(),
        ));
    }
    if !is_positive(grid.control_width) || !is_positive(grid.control_height) {
        return Err(ConfigError::ValidationError(
            "grid control size must be positive and finite".to_string(),
        ));
    }
    if grid.control_width > grid.cell_width || grid.control_height > grid.cell_height {
        return Err(ConfigError::ValidationError(
            "grid control cannot be larger than its cell".to_string(),
        ));
    }

    // Viewport validation
    if !is_positive(config.viewport.width) || !is_positive(config.viewport.height) {
        return Err(ConfigError::ValidationError(
            "viewport size must be positive and finite".to_string(),
        ));
    }

    Ok(())
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridGeometry, Viewport};

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_limit_out_of_range() {
        let mut config = Config::default();
        config.catalog.limit = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));

        config.catalog.limit = 201;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_empty_base_url() {
        let mut config = Config::default();
        config.catalog.base_url = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_control_larger_than_cell() {
        let config = Config {
            grid: GridGeometry {
                cell_width: 80.0,
                cell_height: 80.0,
                control_width: 82.0,
                control_height: 82.0,
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("larger than its cell"));
    }

    #[test]
    fn test_validate_zero_viewport() {
        let config = Config {
            viewport: Viewport::new(0.0, 375.0),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_non_finite_sizes() {
        let config = Config {
            viewport: Viewport::new(f64::INFINITY, 375.0),
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("viewport size"));

        let config = Config {
            viewport: Viewport::new(667.0, f64::NAN),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.grid.cell_width = f64::INFINITY;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("grid cell size"));
    }
}
