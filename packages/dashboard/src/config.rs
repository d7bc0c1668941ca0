//! Dashboard configuration.
//!
//! The default configuration in `config/default.toml` is baked into the
//! binary at compile time via [`include_str!`]. Setting `WEBGIS_CONFIG` to a
//! file path replaces it; individual values can then be overridden from the
//! environment (see [`DashboardConfig::apply_overrides`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_VAR: &str = "WEBGIS_CONFIG";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Configuration is not valid TOML or does not match the schema.
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("Invalid value {value:?} for {var}")]
    Override {
        /// Environment variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// A value parsed but is out of range.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

/// Complete dashboard configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    /// Survey API connection.
    pub source: SourceSettings,
    /// Initial map view and base layer.
    pub map: MapSettings,
    /// Bar chart labels.
    pub chart: ChartSettings,
    /// Refresh timer.
    pub refresh: RefreshSettings,
    /// Embedded HTTP server.
    pub server: ServerSettings,
}

/// Survey API connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceSettings {
    /// Assets endpoint (e.g., `"https://kf.kobotoolbox.org/api/v2/assets"`).
    pub base_url: String,
    /// Form (asset) identifier.
    pub form_id: String,
    /// API token sent as `Authorization: Token <api_token>`.
    #[serde(default)]
    pub api_token: String,
}

/// Initial map view settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapSettings {
    /// `[latitude, longitude]` of the initial view.
    pub center: [f64; 2],
    /// Initial zoom level.
    pub zoom: u8,
    /// Base tile layer URL template.
    pub tile_url: String,
    /// Base tile layer attribution.
    #[serde(default)]
    pub tile_attribution: String,
}

/// Chart labels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChartSettings {
    /// Fixed chart title.
    pub title: String,
    /// Legend name of the bar series.
    pub series_name: String,
}

/// Refresh timer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RefreshSettings {
    /// Milliseconds between refresh cycles.
    pub interval_ms: u64,
}

impl RefreshSettings {
    /// The refresh period.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Embedded HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Directory with the dashboard page.
    pub static_dir: PathBuf,
}

impl DashboardConfig {
    /// Loads the configuration from `WEBGIS_CONFIG` (or the embedded
    /// default) and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is malformed, or
    /// an override or value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::embedded_default()?,
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses the embedded default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the embedded TOML is malformed.
    pub fn embedded_default() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the TOML is malformed.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Applies overrides looked up by environment variable name.
    ///
    /// Recognized variables: `KOBO_API_TOKEN`, `KOBO_FORM_ID`,
    /// `KOBO_BASE_URL`, `REFRESH_INTERVAL_MS`, `BIND_ADDR`, `PORT`,
    /// `STATIC_DIR`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Override`] if a numeric variable does not
    /// parse.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("KOBO_API_TOKEN") {
            self.source.api_token = token;
        }
        if let Some(form_id) = lookup("KOBO_FORM_ID") {
            self.source.form_id = form_id;
        }
        if let Some(base_url) = lookup("KOBO_BASE_URL") {
            self.source.base_url = base_url;
        }
        if let Some(value) = lookup("REFRESH_INTERVAL_MS") {
            self.refresh.interval_ms = parse_override("REFRESH_INTERVAL_MS", value)?;
        }
        if let Some(bind_addr) = lookup("BIND_ADDR") {
            self.server.bind_addr = bind_addr;
        }
        if let Some(value) = lookup("PORT") {
            self.server.port = parse_override("PORT", value)?;
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            self.server.static_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Checks values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero refresh interval or an
    /// empty form id.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh.interval_ms == 0 {
            return Err(ConfigError::Invalid {
                message: "refresh.interval_ms must be greater than zero".to_string(),
            });
        }
        if self.source.form_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "source.form_id must not be empty".to_string(),
            });
        }
        if self.source.api_token.is_empty() {
            log::warn!("No API token configured; set KOBO_API_TOKEN to authenticate");
        }
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Override { var, value })
}
