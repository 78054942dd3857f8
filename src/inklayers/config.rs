use crate::error::{DocumentError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "inklayers.json";
const DEFAULT_OUTPUT_DIR: &str = "output";

/// CLI defaults, stored as `inklayers.json` in the working directory.
/// Command-line flags take precedence over every value here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayersConfig {
    /// Directory extracted layer files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Keep extracted layers at their original path instead of re-rooting them
    #[serde(default = "default_preserve_layer_paths")]
    pub preserve_layer_paths: bool,

    /// Only rewrite outputs that are missing or older than their input
    #[serde(default)]
    pub lazy: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_preserve_layer_paths() -> bool {
    true
}

impl Default for LayersConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            preserve_layer_paths: default_preserve_layer_paths(),
            lazy: false,
        }
    }
}

impl LayersConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(DocumentError::Io)?;
        let config: LayersConfig =
            serde_json::from_str(&content).map_err(DocumentError::Serialization)?;
        config.validate()?;
        log::debug!("loaded config from {}", config_path.display());
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        self.validate()?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(DocumentError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(DocumentError::Serialization)?;
        fs::write(config_path, content).map_err(DocumentError::Io)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(DocumentError::Config(
                "output_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
