//! In-memory storage implementation.

use super::{BoxFuture, ProjectId, ProjectMetadata, ProjectRecord, Storage, StorageError, StorageResult, sort_newest_first};
use crate::canvas::CanvasState;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    projects: RwLock<HashMap<ProjectId, ProjectRecord>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, canvas: &CanvasState, metadata: &ProjectMetadata) -> BoxFuture<'_, StorageResult<ProjectId>> {
        let metadata = metadata.stamped();
        let canvas = canvas.select_element(None);
        Box::pin(async move {
            let id = metadata.id.ok_or_else(|| StorageError::Other("Project id missing".to_string()))?;
            let mut projects = self.projects.write().map_err(lock_error)?;
            projects.insert(id, ProjectRecord { metadata, canvas });
            Ok(id)
        })
    }

    fn load(&self, id: ProjectId) -> BoxFuture<'_, StorageResult<ProjectRecord>> {
        Box::pin(async move {
            let projects = self.projects.read().map_err(lock_error)?;
            projects
                .get(&id)
                .cloned()
                .ok_or_else(|| StorageError::NotFound(id.to_string()))
        })
    }

    fn delete(&self, id: ProjectId) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let mut projects = self.projects.write().map_err(lock_error)?;
            projects.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<ProjectMetadata>>> {
        Box::pin(async move {
            let projects = self.projects.read().map_err(lock_error)?;
            let mut list: Vec<_> = projects.values().map(|r| r.metadata.clone()).collect();
            sort_newest_first(&mut list);
            Ok(list)
        })
    }

    fn exists(&self, id: ProjectId) -> BoxFuture<'_, StorageResult<bool>> {
        Box::pin(async move {
            let projects = self.projects.read().map_err(lock_error)?;
            Ok(projects.contains_key(&id))
        })
    }
}
