//! Application configuration.

use designdeck_core::storage::{FileStorage, StorageResult};
use designdeck_core::{ConfigError, EditorConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the command-line shell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Project directory. Falls back to the platform data directory.
    pub storage_dir: Option<PathBuf>,
    pub editor: EditorConfig,
}

impl AppConfig {
    /// Read a JSON config file, or use defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = serde_json::from_str(&json)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Replace the storage directory if one was given on the command line.
    pub fn with_storage_override(mut self, dir: Option<PathBuf>) -> Self {
        if dir.is_some() {
            self.storage_dir = dir;
        }
        self
    }

    pub fn storage_dir(&self) -> StorageResult<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => FileStorage::default_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_uses_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("designdeck.json");
        std::fs::write(&path, r#"{ "editor": { "history_depth": 5 } }"#).unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.editor.history_depth, 5);
        assert!(config.storage_dir.is_none());
        assert!((config.editor.resize_step - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_override_wins() {
        let config = AppConfig {
            storage_dir: Some(PathBuf::from("/a")),
            ..AppConfig::default()
        }
        .with_storage_override(Some(PathBuf::from("/b")));
        assert_eq!(config.storage_dir().unwrap(), PathBuf::from("/b"));

        let kept = config.with_storage_override(None);
        assert_eq!(kept.storage_dir().unwrap(), PathBuf::from("/b"));
    }

    #[test]
    fn test_unreadable_file() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/designdeck.json")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
