use super::priority::PriorityConfig;
use super::selection_profiles::SelectionProfileManager;
use super::types::*;
use crate::utils::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_CONFIG_DIR: &str = "track-remux";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub logging: LoggingConfig,
    pub progress: ProgressConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub default_profile: String,
    pub selection_profiles: BTreeMap<String, RawSelectionProfile>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)?;
        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the first configuration found: the given path, the bundled
    /// defaults next to the binary, the user config directory, then the
    /// built-in defaults.
    pub fn load_with_fallback<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        for candidate in Self::candidate_paths(config_path) {
            if candidate.exists() {
                debug!("Loading configuration from {}", candidate.display());
                return Self::load(&candidate);
            }
        }

        debug!("No configuration file found, using built-in defaults");
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    fn candidate_paths(config_path: &Path) -> Vec<PathBuf> {
        let mut paths = vec![
            config_path.to_path_buf(),
            PathBuf::from("config.default.yaml"),
            PathBuf::from("./config/config.default.yaml"),
        ];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(APP_CONFIG_DIR).join("config.yaml"));
        }
        paths
    }

    pub fn profile_manager(&self) -> Result<SelectionProfileManager> {
        SelectionProfileManager::new(self.selection_profiles.clone())
    }

    /// Resolves the named profile, or `default_profile` when none is given.
    pub fn resolve_profile(&self, name: Option<&str>) -> Result<PriorityConfig> {
        let manager = self.profile_manager()?;
        let name = name.unwrap_or(&self.default_profile);
        manager.get_profile(name).cloned()
    }

    pub fn validate(&self) -> Result<()> {
        if self.progress.update_interval_ms == 0 {
            return Err(Error::config("update_interval_ms must be greater than 0"));
        }

        if self.input.extensions.is_empty()
            || self.input.extensions.iter().any(|e| e.trim().is_empty())
        {
            return Err(Error::config(
                "input.extensions must list at least one non-empty extension",
            ));
        }

        if self.output.moved_dir_name.trim().is_empty() {
            return Err(Error::config("output.moved_dir_name must not be empty"));
        }

        let manager = self.profile_manager()?;
        if !manager.has_profile(&self.default_profile) {
            return Err(Error::config(format!(
                "default_profile '{}' is not defined (available: {})",
                self.default_profile,
                manager.list_profile_names().join(", ")
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tools: ToolsConfig::default(),
            logging: LoggingConfig::default(),
            progress: ProgressConfig::default(),
            input: InputConfig::default(),
            output: OutputConfig::default(),
            default_profile: "default".to_string(),
            selection_profiles: BTreeMap::new(),
        }
    }
}
