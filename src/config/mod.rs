//! Configuration management
//!
//! Settings are layered from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use negotiated_static::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Serving {} on {}", config.server.web_root.display(), config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Any key can be overridden with `NEGOTIATED_STATIC__<section>__<key>`:
//! - `NEGOTIATED_STATIC__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `NEGOTIATED_STATIC__SERVER__WEB_ROOT=/srv/www`
//! - `NEGOTIATED_STATIC__NEGOTIATION__ENABLE_IMAGE_SUBSTITUTION=false`
//!
//! # Configuration File
//!
//! By default the file is `config/negotiated-static.toml`; set
//! `NEGOTIATED_STATIC_CONFIG` to use another one.

mod models;
mod sources;
mod validation;

pub use models::{Config, NegotiationConfig, ServerConfig};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// User content type mappings keyed by `.ext`
    pub fn content_type_mappings(&self) -> impl Iterator<Item = (String, &str)> {
        self.content_types.iter().map(|(extension, media_type)| {
            (
                format!(".{}", extension.trim_start_matches('.')),
                media_type.as_str(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_full_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[server]
bind_addr = "0.0.0.0:8080"
web_root = "wwwroot"

[negotiation]
enable_precompressed_files = true
enable_image_substitution = true

[negotiation.image_substitution_cost_ratio]
"image/avif" = 2.0
"image/webp" = 0.9

[content_types]
webmanifest = "application/manifest+json"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.negotiation.image_substitution_cost_ratio.len(), 2);

        let mappings: Vec<_> = config.content_type_mappings().collect();
        assert_eq!(
            mappings,
            vec![(".webmanifest".to_string(), "application/manifest+json")]
        );
    }

    #[test]
    fn test_validation_catches_bad_ratio() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[negotiation.image_substitution_cost_ratio]
"image/png" = -1.0
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::InvalidCostRatio { .. })
        ));
    }
}
