//! Configuration loading and config file resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments (applied by the binary)
//! 2. Environment variables (`TUNEDIN_*`)
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! A missing config file is never fatal: a warning is logged and the compiled
//! defaults are used. Only an explicitly requested file that cannot be read or
//! parsed is an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "TUNEDIN_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

/// HTTP service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address for `serve`
    pub bind: String,
    /// Upper bound on one whole recommendation request
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5780".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Catalog (Spotify Web API) connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub api_base_url: String,
    /// Either the accounts-service token URL (with client credentials) or a
    /// token-vending proxy that needs no credentials
    pub token_endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    pub requests_per_second: u32,
    pub http_timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.spotify.com/v1".to_string(),
            token_endpoint: "https://accounts.spotify.com/api/token".to_string(),
            client_id: None,
            client_secret: None,
            requests_per_second: 10,
            http_timeout_secs: 15,
        }
    }
}

/// Candidate search and selection tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Lower bound of the initial popularity window
    pub popularity_min: u8,
    /// Upper bound of the initial popularity window
    pub popularity_max: u8,
    /// Widening applied to each side when the window filters out everything
    pub popularity_step: u8,
    /// Strategy execution stops once this many unique candidates exist
    pub candidate_cap: usize,
    /// Result limit for each catalog track search
    pub per_strategy_limit: u32,
    /// How many popularity-sorted survivors are scored
    pub score_top_n: usize,
    /// Distinct artists admitted by the first pool pass
    pub pool_artist_cap: usize,
    /// Total pool size
    pub pool_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            popularity_min: 25,
            popularity_max: 100,
            popularity_step: 10,
            candidate_cap: 100,
            per_strategy_limit: 50,
            score_top_n: 50,
            pool_artist_cap: 20,
            pool_size: 30,
        }
    }
}

/// Largest page the catalog search endpoint serves
pub const CATALOG_SEARCH_LIMIT_MAX: u32 = 50;

impl SearchConfig {
    /// Reject settings the selection stage cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.popularity_max > 100 {
            return Err(Error::Config(format!(
                "search.popularity_max must be at most 100 (got {})",
                self.popularity_max
            )));
        }
        if self.popularity_min > self.popularity_max {
            return Err(Error::Config(format!(
                "search.popularity_min ({}) exceeds search.popularity_max ({})",
                self.popularity_min, self.popularity_max
            )));
        }
        if self.popularity_step == 0 {
            return Err(Error::Config("search.popularity_step must be positive".to_string()));
        }
        if self.pool_size == 0 || self.candidate_cap == 0 || self.score_top_n == 0 {
            return Err(Error::Config(
                "search.pool_size, search.candidate_cap and search.score_top_n must be positive"
                    .to_string(),
            ));
        }
        if self.per_strategy_limit == 0 || self.per_strategy_limit > CATALOG_SEARCH_LIMIT_MAX {
            return Err(Error::Config(format!(
                "search.per_strategy_limit must be between 1 and {} (got {})",
                CATALOG_SEARCH_LIMIT_MAX, self.per_strategy_limit
            )));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl TomlConfig {
    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.search.validate()?;
        Ok(config)
    }

    /// Overlay `TUNEDIN_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        if let Some(bind) = env_value("TUNEDIN_BIND") {
            self.server.bind = bind;
        }
        if let Some(level) = env_value("TUNEDIN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(url) = env_value("TUNEDIN_API_BASE_URL") {
            self.catalog.api_base_url = url;
        }
        if let Some(url) = env_value("TUNEDIN_TOKEN_ENDPOINT") {
            self.catalog.token_endpoint = url;
        }
        if let Some(rps) = env_value("TUNEDIN_REQUESTS_PER_SECOND") {
            match rps.parse::<u32>() {
                Ok(v) if v > 0 => self.catalog.requests_per_second = v,
                _ => warn!("Ignoring invalid TUNEDIN_REQUESTS_PER_SECOND '{}'", rps),
            }
        }
    }
}

/// Non-empty, trimmed environment variable value
pub fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Per-user config file location (`~/.config/tunedin/config.toml` on Linux)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tunedin").join("config.toml"))
}

/// Find the config file to load, if any
///
/// Priority: explicit path → `TUNEDIN_CONFIG` → user config dir →
/// `/etc/tunedin/config.toml` (Linux only). Only the implicit locations are
/// checked for existence.
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(path) = env_value(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    if let Some(path) = user_config_path() {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system = PathBuf::from("/etc/tunedin/config.toml");
        if system.exists() {
            return Some(system);
        }
    }

    None
}

/// Load configuration with environment overrides applied
///
/// An explicitly passed path must exist; a path from `TUNEDIN_CONFIG` that
/// does not exist only produces a warning.
pub fn load_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let mut config = match locate_config_file(explicit) {
        Some(path) if path.exists() => {
            let config = TomlConfig::from_file(&path)?;
            info!("Loaded configuration from {}", path.display());
            config
        }
        Some(path) if explicit.is_some() => {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Some(path) => {
            warn!(
                "Config file {} does not exist, using compiled defaults",
                path.display()
            );
            TomlConfig::default()
        }
        None => {
            warn!("No config file found, using compiled defaults");
            TomlConfig::default()
        }
    };

    config.apply_env_overrides();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = TomlConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:5780");
        assert_eq!(config.search.popularity_min, 25);
        assert_eq!(config.search.popularity_max, 100);
        assert_eq!(config.search.pool_artist_cap, 20);
        assert_eq!(config.search.pool_size, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.catalog.client_id.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
            [search]
            popularity_min = 40
            "#,
        )
        .unwrap();
        assert_eq!(config.search.popularity_min, 40);
        assert_eq!(config.search.popularity_max, 100);
        assert_eq!(config.catalog, CatalogConfig::default());
    }

    #[test]
    fn test_inverted_popularity_window_rejected() {
        let err = TomlConfig::from_toml_str(
            r#"
            [search]
            popularity_min = 80
            popularity_max = 50
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_popularity_max_above_100_rejected() {
        let search = SearchConfig {
            popularity_max: 101,
            ..SearchConfig::default()
        };
        assert!(search.validate().is_err());
    }

    #[test]
    fn test_candidate_cap_must_be_positive() {
        let search = SearchConfig {
            candidate_cap: 0,
            ..SearchConfig::default()
        };
        let err = search.validate().unwrap_err();
        assert!(err.to_string().contains("candidate_cap"));
    }

    #[test]
    fn test_per_strategy_limit_bounded_by_catalog_page() {
        let at_max = SearchConfig {
            per_strategy_limit: CATALOG_SEARCH_LIMIT_MAX,
            ..SearchConfig::default()
        };
        assert!(at_max.validate().is_ok());

        for limit in [0, CATALOG_SEARCH_LIMIT_MAX + 1] {
            let search = SearchConfig {
                per_strategy_limit: limit,
                ..SearchConfig::default()
            };
            let err = search.validate().unwrap_err();
            assert!(err.to_string().contains("per_strategy_limit"), "{}", err);
        }
    }
}
