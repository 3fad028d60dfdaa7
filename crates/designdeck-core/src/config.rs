//! Editor configuration.

use crate::history::DEFAULT_HISTORY_DEPTH;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for an editor session. Every field has a default, so a partial
/// JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo snapshots kept.
    pub history_depth: usize,
    /// Growth per resize action, in pixels.
    pub resize_step: f64,
    /// Upper bound for element width under resize actions.
    pub max_element_width: f64,
    /// Upper bound for element height under resize actions.
    pub max_element_height: f64,
    /// Lower bound for element dimensions under resize actions.
    pub min_element_size: f64,
    /// Maximum delay between clicks of a double-click.
    pub double_click_ms: u64,
    /// Maximum pointer travel between clicks of a double-click.
    pub double_click_distance: f64,
    pub autosave_interval_secs: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
            resize_step: 10.0,
            max_element_width: 400.0,
            max_element_height: 400.0,
            min_element_size: 1.0,
            double_click_ms: 500,
            double_click_distance: 5.0,
            autosave_interval_secs: 30,
        }
    }
}

impl EditorConfig {
    pub fn max_element_size(&self) -> Size {
        Size::new(self.max_element_width, self.max_element_height)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{ "history_depth": 20 }"#).unwrap();
        assert_eq!(config.history_depth, 20);
        assert!((config.max_element_width - 400.0).abs() < f64::EPSILON);
        assert_eq!(config.double_click_ms, 500);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = EditorConfig::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r#"{ "resize_step": 25.0 }"#).unwrap();
        let config = EditorConfig::load(&path).unwrap();
        assert!((config.resize_step - 25.0).abs() < f64::EPSILON);
    }
}
