//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/masjid-roster/roster.toml`
//! 3. Environment variables: `ROSTER_*` prefix
//! 4. Command-line flags (applied by the CLI layer)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, IoResultExt};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Default data file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "data_organisasi.csv";

/// Unified configuration for the roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// CSV file holding the member table
    pub data_file: PathBuf,
    /// Directory receiving CSV exports
    pub export_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            export_dir: PathBuf::from("."),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
}

/// Get the XDG config directory for the roster.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "masjid-roster").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("roster.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the input as-is.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

fn load_raw_settings(fs: &dyn FileSystem, path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = fs
        .read_to_string(path)
        .with_path_context("read config file", path)?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Load settings with layered precedence from the default global config path.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(&RealFileSystem, global_config_path().as_deref())
    }

    /// Load settings, reading the global layer from `global_path` if it exists.
    pub fn load_from(
        fs: &dyn FileSystem,
        global_path: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = global_path {
            if fs.exists(path) {
                let raw = load_raw_settings(fs, path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Scalar merge: overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay
                .data_file
                .clone()
                .unwrap_or_else(|| self.data_file.clone()),
            export_dir: overlay
                .export_dir
                .clone()
                .unwrap_or_else(|| self.export_dir.clone()),
        }
    }

    /// Apply `ROSTER_*` environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("ROSTER").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("export_dir") {
            settings.export_dir = PathBuf::from(val);
        }

        Ok(settings)
    }

    fn expand_paths(&mut self) {
        self.data_file = PathBuf::from(expand_env_vars(&self.data_file.to_string_lossy()));
        self.export_dir = PathBuf::from(expand_env_vars(&self.export_dir.to_string_lossy()));
    }

    /// Override the data file (e.g. from `--data-file`).
    pub fn with_data_file(mut self, data_file: Option<PathBuf>) -> Self {
        if let Some(path) = data_file {
            self.data_file = PathBuf::from(expand_env_vars(&path.to_string_lossy()));
        }
        self
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# masjid-roster configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/masjid-roster/roster.toml
#   Env:    ROSTER_* environment variables (e.g. ROSTER_DATA_FILE)
#   Flags:  --data-file

# CSV file holding the member table
# data_file = "data_organisasi.csv"

# Directory receiving exports from `roster report --export`
# export_dir = "~/Documents"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
