//! Bootstrap configuration loading and config file resolution
//!
//! Config file priority order:
//! 1. Command-line argument (highest priority)
//! 2. `HRM_CONFIG` environment variable
//! 3. Platform config directory (`<config_dir>/hrm/<module>.toml`)
//! 4. Compiled defaults (no file)
//!
//! A missing or malformed file never aborts startup: a warning is logged and
//! compiled defaults are used instead.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "HRM_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Lyrics synchronisation defaults (optional)
    #[serde(default)]
    pub sync: SyncSection,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `[sync]` section: defaults for lyrics synchronisation requests
///
/// Every field is optional; unset fields fall through to the engine's
/// built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncSection {
    /// Expected recording length in seconds, used by the fallback path
    pub estimated_duration: Option<f64>,
    /// Linear RMS silence threshold override
    pub silence_threshold: Option<f32>,
    /// Lines below this confidence are reported for review
    pub confidence_threshold: Option<f32>,
    /// Language hint
    pub language: Option<String>,
    /// Cap on audio analysis wall time in seconds
    pub analysis_timeout_secs: Option<u64>,
    /// Minimum overall confidence recorded with a saved alignment
    pub confidence_floor: Option<f32>,
}

/// Resolve which config file to read, if any
pub fn resolve_config_path(cli_arg: Option<&Path>, module_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        debug!(path = %path.display(), "Config file from command line");
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            debug!(path = %path, "Config file from {}", CONFIG_ENV_VAR);
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    if let Some(path) = default_config_path(module_name) {
        if path.exists() {
            debug!(path = %path.display(), "Config file from platform config directory");
            return Some(path);
        }
    }

    // Priority 4: Compiled defaults
    None
}

/// Platform config file location for a module
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("hrm").join(format!("{}.toml", module_name)))
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Load config, degrading to compiled defaults on any failure
pub fn load_or_default(path: Option<&Path>) -> TomlConfig {
    let Some(path) = path else {
        debug!("No config file, using compiled defaults");
        return TomlConfig::default();
    };

    match load_toml_config(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{} - using compiled defaults", e);
            TomlConfig::default()
        }
    }
}

/// Write config to TOML, creating parent directories as needed
///
/// Writes to a temporary sibling first and renames it into place.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
