//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/lineage/lineage.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `LINEAGE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::AgePolicy;

/// How `tree` output is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeStyle {
    /// Branch glyph dump with alive/deceased marks
    #[default]
    Glyph,
    /// Rendering via the termtree crate
    Termtree,
}

/// Unified configuration for lineage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Family definition to load (default: built-in House of Windsor)
    pub family_file: Option<PathBuf>,
    /// Age measurement for deceased members
    pub age_policy: AgePolicy,
    /// Tree rendering style
    pub tree_style: TreeStyle,
}

/// Raw settings for intermediate parsing (None means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub family_file: Option<PathBuf>,
    pub age_policy: Option<AgePolicy>,
    pub tree_style: Option<TreeStyle>,
}

/// Get the XDG config directory for lineage.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "lineage").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("lineage.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            family_file: overlay
                .family_file
                .clone()
                .or_else(|| self.family_file.clone()),
            age_policy: overlay.age_policy.unwrap_or(self.age_policy),
            tree_style: overlay.tree_style.unwrap_or(self.tree_style),
        }
    }

    /// Expand `~`, `$VAR` and `${VAR}` in the family file path.
    fn expand_paths(&mut self) -> Result<(), ApplicationError> {
        if let Some(path) = self.family_file.take() {
            let raw = path.to_string_lossy().into_owned();
            let expanded = shellexpand::full(&raw)
                .map_err(|e| ApplicationError::Config {
                    message: format!("expand family_file {}: {}", raw, e),
                })?
                .into_owned();
            self.family_file = Some(PathBuf::from(expanded));
        }
        Ok(())
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths()?;

        Ok(current)
    }

    /// Apply LINEAGE_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("LINEAGE"))
            .build()
            .map_err(config_err)?;

        let raw = RawSettings {
            family_file: config.get_string("family_file").ok().map(PathBuf::from),
            age_policy: match config.get_string("age_policy") {
                Ok(val) => Some(parse_enum(&val, "age_policy")?),
                Err(_) => None,
            },
            tree_style: match config.get_string("tree_style") {
                Ok(val) => Some(parse_enum(&val, "tree_style")?),
                Err(_) => None,
            },
        };
        Ok(settings.merge_with(&raw))
    }
}

/// Parse a snake_case enum value the same way the TOML layers do.
fn parse_enum<T: serde::de::DeserializeOwned>(value: &str, key: &str) -> Result<T, ApplicationError> {
    T::deserialize(serde::de::value::StrDeserializer::<serde::de::value::Error>::new(value)).map_err(
        |e| ApplicationError::Config {
            message: format!("invalid value for {}: {}", key, e),
        },
    )
}
