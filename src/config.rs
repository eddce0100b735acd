use crate::error::{Result, SoilWiseError};
use crate::logic::LsiMethod;
use crate::models::SlopeLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const RULES_DIR_ENV: &str = "SOILWISE_RULES_DIR";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one JSON requirement document per crop.
    pub rules_dir: PathBuf,
    pub lsi_method: LsiMethod,
    /// Slope requirement set used for crops that declare level1..level3.
    pub slope_level: SlopeLevel,
    /// Evaluate crops of a batch on the rayon thread pool.
    pub parallel: bool,
}

impl Config {
    /// Loads the configuration file, or the defaults when no file exists in
    /// a standard location. An explicit path that does not exist is an
    /// error.
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) if !p.exists() => {
                return Err(SoilWiseError::Config(format!(
                    "config file not found at {}",
                    p.display()
                )));
            }
            Some(p) => Some(p),
            None => Self::find_config_path(),
        };

        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };

        if let Ok(dir) = std::env::var(RULES_DIR_ENV) {
            if !dir.is_empty() {
                config.rules_dir = PathBuf::from(dir);
            }
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| {
                SoilWiseError::Config(format!("failed to read {}: {}", path.display(), e))
            })?;

        // Substitute environment variables
        let config_str = Self::substitute_env_vars(&config_str)?;

        let config: Config = serde_yaml::from_str(&config_str)
            .map_err(|e| {
                SoilWiseError::Config(format!("failed to parse {}: {}", path.display(), e))
            })?;

        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Search for a config file in standard locations.
    fn find_config_path() -> Option<PathBuf> {
        // Try current directory first
        let local_config = PathBuf::from("config/soilwise.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        // Try XDG config directory
        dirs::config_dir()
            .map(|dir| dir.join("soilwise").join("config.yaml"))
            .filter(|p| p.exists())
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| SoilWiseError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }

    /// Rules directory, with the CLI override taking priority.
    pub fn rules_dir(&self, rules_dir_override: Option<&PathBuf>) -> PathBuf {
        rules_dir_override
            .cloned()
            .unwrap_or_else(|| self.rules_dir.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_dir: PathBuf::from("data/crop_requirements"),
            lsi_method: LsiMethod::default(),
            slope_level: SlopeLevel::default(),
            parallel: true,
        }
    }
}
