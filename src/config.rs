//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/woprune/woprune.toml`
//! 3. Local config: `<dir>/.woprune.toml` (data directory or cwd)
//! 4. Environment variables: `WOPRUNE_*` prefix, `__` between sections

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::RiskThresholds;

/// Default Meteoblue endpoint for daily forecasts.
pub const METEOBLUE_BASE_URL: &str = "https://my.meteoblue.com/packages/basic-day";

/// Meteoblue wind lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MeteoblueConfig {
    /// API key; there is no built-in key
    pub api_key: Option<String>,
    /// Package endpoint
    pub base_url: String,
}

impl Default for MeteoblueConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: METEOBLUE_BASE_URL.to_string(),
        }
    }
}

/// Unified configuration for woprune.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the CSV tables (default: cwd)
    pub data_dir: PathBuf,
    /// Site table, relative to `data_dir` unless absolute
    pub sites_file: PathBuf,
    /// Species growth table
    pub growth_file: PathBuf,
    /// Tree table
    pub trees_file: PathBuf,
    /// Risk thresholds
    pub thresholds: RiskThresholds,
    /// Wind lookup
    pub meteoblue: MeteoblueConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            sites_file: PathBuf::from("wo_locations.csv"),
            growth_file: PathBuf::from("tree_growth.csv"),
            trees_file: PathBuf::from("tree_data.csv"),
            thresholds: RiskThresholds::default(),
            meteoblue: MeteoblueConfig::default(),
        }
    }
}

/// Get the XDG config directory for woprune.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "woprune").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("woprune.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".woprune.toml")
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input untouched on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    pub fn sites_path(&self) -> PathBuf {
        self.data_dir.join(&self.sites_file)
    }

    pub fn growth_path(&self) -> PathBuf {
        self.data_dir.join(&self.growth_file)
    }

    pub fn trees_path(&self) -> PathBuf {
        self.data_dir.join(&self.trees_file)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expand = |p: &Path| PathBuf::from(expand_env_vars(p.to_string_lossy().as_ref()));
        self.data_dir = expand(&self.data_dir);
        self.sites_file = expand(&self.sites_file);
        self.growth_file = expand(&self.growth_file);
        self.trees_file = expand(&self.trees_file);
    }

    /// Reject threshold combinations the classifier cannot work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.thresholds
            .validate()
            .map_err(|message| ApplicationError::Config { message })
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory searched for `.woprune.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), local_dir)
    }

    /// Same as [`Settings::load`] with an explicit global config file.
    pub fn load_from(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let defaults = Config::try_from(&Settings::default()).map_err(config_err)?;
        let mut builder = Config::builder().add_source(defaults);

        if let Some(path) = global_path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        if let Some(dir) = local_dir {
            let path = local_config_path(dir);
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        builder = builder.add_source(
            Environment::with_prefix("WOPRUNE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        settings.expand_paths();
        settings.validate()?;
        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# woprune configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/woprune/woprune.toml
#   Local:  <data_dir>/.woprune.toml
#   Env:    WOPRUNE_* environment variables, e.g. WOPRUNE_THRESHOLDS__WIND_THRESHOLD=35

# Directory with the CSV tables
# data_dir = "~/woprune-data"

# sites_file = "wo_locations.csv"
# growth_file = "tree_growth.csv"
# trees_file = "tree_data.csv"

[thresholds]
# Trees taller than this (m) are pruned when wind exceeds wind_threshold
# height_threshold = 10.0
# Wind speed (km/h)
# wind_threshold = 30.0
# Absolute height ceiling (m)
# wo_max_height = 20.0
# Start of the advisory band below the ceiling (m), must not exceed wo_max_height
# tolerance_min = 15.0

[meteoblue]
# api_key = "..."
# base_url = "https://my.meteoblue.com/packages/basic-day"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_settings_when_resolving_paths_then_joins_data_dir() {
        let settings = Settings {
            data_dir: PathBuf::from("/data"),
            ..Settings::default()
        };
        assert_eq!(settings.sites_path(), PathBuf::from("/data/wo_locations.csv"));
        assert_eq!(settings.growth_path(), PathBuf::from("/data/tree_growth.csv"));
        assert_eq!(settings.trees_path(), PathBuf::from("/data/tree_data.csv"));
    }

    #[test]
    fn given_absolute_table_path_when_resolving_then_ignores_data_dir() {
        let settings = Settings {
            data_dir: PathBuf::from("/data"),
            trees_file: PathBuf::from("/elsewhere/trees.csv"),
            ..Settings::default()
        };
        assert_eq!(settings.trees_path(), PathBuf::from("/elsewhere/trees.csv"));
    }

    #[test]
    fn given_tilde_in_data_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_dir: PathBuf::from("~/woprune"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let dir = settings.data_dir.to_string_lossy();
        assert!(dir.starts_with(&home), "data_dir should start with home: {dir}");
        assert!(!dir.contains('~'));
    }

    #[test]
    fn given_default_settings_when_validating_then_ok() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn given_template_when_parsed_then_yields_defaults() {
        let parsed: Settings = toml::from_str(&Settings::template()).expect("template parses");
        assert_eq!(parsed, Settings::default());
    }
}
