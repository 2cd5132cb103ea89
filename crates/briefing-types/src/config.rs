//! Settings loading for the briefing tools.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! Default config file lives at ~/.config/ai-briefing/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::BriefingError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Hours before the run that the collection window opens
    #[serde(default = "default_window_hours")]
    pub window_hours: u32,

    /// Prefix for generated topic identifiers; overrides the rules file
    #[serde(default)]
    pub id_prefix: Option<String>,

    /// Optional engine rules file (TOML)
    #[serde(default)]
    pub rules_path: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_window_hours() -> u32 {
    24
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            window_hours: default_window_hours(),
            id_prefix: None,
            rules_path: None,
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/ai-briefing/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (BRIEFING_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, BriefingError> {
        let config_dir = ProjectDirs::from("", "", "ai-briefing")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("log_level", default_log_level())
            .map_err(|e| BriefingError::Config(e.to_string()))?
            .set_default("window_hours", i64::from(default_window_hours()))
            .map_err(|e| BriefingError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // BRIEFING_LOG_LEVEL, BRIEFING_WINDOW_HOURS, BRIEFING_ID_PREFIX, ...
        builder = builder.add_source(Environment::with_prefix("BRIEFING").try_parsing(true));

        let config = builder
            .build()
            .map_err(|e| BriefingError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| BriefingError::Config(e.to_string()))?;
        settings.validate().map_err(BriefingError::Config)?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.window_hours == 0 {
            return Err("window_hours must be > 0".to_string());
        }
        if let Some(prefix) = &self.id_prefix {
            if prefix.trim().is_empty() {
                return Err("id_prefix must not be empty".to_string());
            }
            if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(format!("id_prefix must be alphanumeric or '-', got {prefix:?}"));
            }
        }
        Ok(())
    }
}
