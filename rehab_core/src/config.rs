//! Configuration file support for the rehab tracker.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/rehab/config.toml`.

use crate::program::{get_default_program, Program};
use crate::types::{clamp_rest_seconds, DEFAULT_REST_SECONDS};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub rest: RestConfig,

    #[serde(default)]
    pub program: ProgramConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Rest timer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RestConfig {
    #[serde(default = "default_rest_seconds")]
    pub default_seconds: u32,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            default_seconds: default_rest_seconds(),
        }
    }
}

/// Custom exercise definition
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseConfig {
    pub name: String,
    pub base_sets: i64,
    pub reps: String,
    pub media: Option<String>,
}

/// Program override; an empty list keeps the built-in protocol
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ProgramConfig {
    #[serde(default)]
    pub exercises: Vec<ExerciseConfig>,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|_| PathBuf::from("."))
    });
    base.join("rehab")
}

fn default_rest_seconds() -> u32 {
    DEFAULT_REST_SECONDS
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|_| PathBuf::from("."))
        });
        base.join("rehab").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// The program to run: custom exercises if any, else the built-in one
    pub fn program(&self) -> Result<Program> {
        if self.program.exercises.is_empty() {
            Ok(get_default_program().clone())
        } else {
            Program::from_config(&self.program.exercises)
        }
    }

    /// Configured rest duration, clamped into the allowed range
    pub fn rest_seconds(&self) -> u32 {
        clamp_rest_seconds(self.rest.default_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.rest.default_seconds, 60);
        assert!(config.program.exercises.is_empty());
        assert!(config.data.data_dir.ends_with("rehab"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.rest.default_seconds = 90;
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.rest.default_seconds, 90);
        assert_eq!(config.data.data_dir, parsed.data.data_dir);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[rest]
default_seconds = 45
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.rest.default_seconds, 45);
        assert!(config.program.exercises.is_empty()); // default
    }

    #[test]
    fn test_rest_seconds_clamped() {
        let toml_str = r#"
[rest]
default_seconds = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.rest_seconds(), 15);
    }

    #[test]
    fn test_custom_program() {
        let toml_str = r#"
[[program.exercises]]
name = "Wall Slide"
base_sets = 2
reps = "10"

[[program.exercises]]
name = "Side Plank"
base_sets = 3
reps = "20s"
media = "https://example.com/side-plank"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let program = config.program().unwrap();
        assert_eq!(program.len(), 2);
        assert_eq!(program.exercises()[0].name, "Wall Slide");
        assert!(program.exercises()[0].media_ref.is_none());
    }

    #[test]
    fn test_invalid_custom_program_is_config_error() {
        let toml_str = r#"
[[program.exercises]]
name = "Wall Slide"
base_sets = 0
reps = "10"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(matches!(config.program(), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.data.data_dir = temp_dir.path().join("data");
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.data.data_dir, temp_dir.path().join("data"));
    }
}
