//! Storage abstraction for project persistence.

mod autosave;
mod file;
mod memory;

pub use autosave::{AutoSaveManager, DEFAULT_AUTOSAVE_INTERVAL_SECS};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::canvas::CanvasState;
use crate::template::ProductKind;
use crate::variant::SocialPlatform;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for saved projects.
pub type ProjectId = Uuid;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Project not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Descriptive data stored next to a canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    /// Assigned on first save.
    #[serde(default)]
    pub id: Option<ProjectId>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProductKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<SocialPlatform>,
    /// Name of the template the project started from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Seconds since the Unix epoch.
    #[serde(default)]
    pub updated_at: u64,
}

impl ProjectMetadata {
    pub fn new(name: impl Into<String>, kind: ProductKind) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind,
            platform: None,
            template: None,
            organization: None,
            updated_at: 0,
        }
    }

    /// Copy with the id filled in (a fresh one if unset) and the timestamp bumped.
    pub fn stamped(&self) -> Self {
        let mut stamped = self.clone();
        stamped.id = Some(self.id.unwrap_or_else(Uuid::new_v4));
        stamped.updated_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        stamped
    }
}

/// What a storage backend keeps for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub metadata: ProjectMetadata,
    pub canvas: CanvasState,
}

impl ProjectRecord {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut record: Self = serde_json::from_str(json)?;
        record.canvas.repair();
        Ok(record)
    }
}

/// Trait for project storage backends.
///
/// `save` assigns an id when the metadata has none and returns it; saving
/// again with that id overwrites the project.
pub trait Storage: Send + Sync {
    fn save(&self, canvas: &CanvasState, metadata: &ProjectMetadata) -> BoxFuture<'_, StorageResult<ProjectId>>;

    fn load(&self, id: ProjectId) -> BoxFuture<'_, StorageResult<ProjectRecord>>;

    fn delete(&self, id: ProjectId) -> BoxFuture<'_, StorageResult<()>>;

    /// Metadata of every stored project, most recently updated first.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<ProjectMetadata>>>;

    fn exists(&self, id: ProjectId) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Sort newest first, breaking ties by name.
pub(crate) fn sort_newest_first(projects: &mut [ProjectMetadata]) {
    projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.name.cmp(&b.name)));
}
