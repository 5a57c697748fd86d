use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Engine settings, loaded from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Name save files are keyed by.
    pub target_name: String,
    /// Path to the packaged data bundle.
    pub bundle_path: PathBuf,
    /// Directory searched for loose data files before the bundle. Meant for
    /// development against an unpacked data checkout.
    pub extra_path: Option<PathBuf>,
    /// Directory save files are written to.
    pub save_dir: PathBuf,
    pub enable_music: bool,
    pub update_sound: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            target_name: "fernwood".to_owned(),
            bundle_path: PathBuf::from("fernwood.dat"),
            extra_path: None,
            save_dir: PathBuf::from("."),
            enable_music: true,
            update_sound: true,
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"target_name": "demo", "enable_music": false}"#).unwrap();
        assert_eq!(config.target_name, "demo");
        assert!(!config.enable_music);
        assert!(config.update_sound);
        assert_eq!(config.bundle_path, PathBuf::from("fernwood.dat"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<EngineConfig, _> =
            serde_json::from_str(r#"{"target": "typo-for-target-name"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = EngineConfig {
            extra_path: Some(PathBuf::from("/tmp/data")),
            ..EngineConfig::default()
        };
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        let loaded = EngineConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extra_path, config.extra_path);
        assert_eq!(loaded.target_name, config.target_name);
    }
}
