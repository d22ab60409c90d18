use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable prefix for overrides, e.g. `STORESEARCH_CATALOG__LIMIT=50`.
const ENV_PREFIX: &str = "STORESEARCH_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[catalog]
limit = 50
category = "software"

[viewport]
width = 812.0
height = 375.0
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.catalog.limit, 50);
        assert_eq!(config.catalog.category, Category::Software);
        assert_eq!(config.viewport.width, 812.0);
        assert_eq!(config.grid.cell_width, 94.0);
    }

    #[test]
    fn test_load_config_from_str_empty_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.catalog.base_url, "https://itunes.apple.com");
        assert_eq!(config.catalog.limit, 200);
        assert_eq!(config.grid.control_width, 82.0);
        assert_eq!(config.thumbnails.timeout_secs, 15);
    }

    #[test]
    fn test_load_config_from_str_bad_type() {
        let toml = r#"
[catalog]
limit = "lots"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[catalog]
base_url = "http://127.0.0.1:3000"

[grid]
cell_width = 100.0
cell_height = 100.0

[thumbnails]
delivery_timeout_secs = 3
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.catalog.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.grid.cell_width, 100.0);
        assert_eq!(config.grid.control_height, 82.0);
        assert_eq!(config.thumbnails.delivery_timeout_secs, 3);
    }
}
