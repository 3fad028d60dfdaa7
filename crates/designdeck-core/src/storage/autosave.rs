//! Auto-save functionality for project persistence.
//!
//! Provides periodic saving of the open project to prevent data loss.

use super::{ProjectId, ProjectMetadata, ProjectRecord, Storage, StorageResult};
use crate::canvas::CanvasState;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Manages automatic project persistence.
pub struct AutoSaveManager<S: Storage + ?Sized> {
    storage: Arc<S>,
    interval: Duration,
    last_save: Option<Instant>,
    /// Whether the project has unsaved changes.
    dirty: bool,
    /// Id of the open project, once saved or loaded.
    project_id: Option<ProjectId>,
}

impl<S: Storage + ?Sized> AutoSaveManager<S> {
    /// Create a new auto-save manager with the given storage backend.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            dirty: false,
            project_id: None,
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Mark the project as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    /// Forget the open project; the next save creates a new one.
    pub fn detach(&mut self) {
        self.project_id = None;
        self.last_save = None;
    }

    /// Check if enough time has passed for an auto-save.
    pub fn should_save(&self) -> bool {
        if !self.dirty {
            return false;
        }
        match self.last_save {
            Some(last) => last.elapsed() >= self.interval,
            None => true,
        }
    }

    /// Save if dirty and the interval has elapsed.
    /// Returns true if a save was performed.
    pub async fn maybe_save(&mut self, canvas: &CanvasState, metadata: &ProjectMetadata) -> StorageResult<bool> {
        if !self.should_save() {
            return Ok(false);
        }
        self.save(canvas, metadata).await?;
        Ok(true)
    }

    /// Save immediately, keeping the id of the open project.
    pub async fn save(&mut self, canvas: &CanvasState, metadata: &ProjectMetadata) -> StorageResult<ProjectId> {
        let mut metadata = metadata.clone();
        if metadata.id.is_none() {
            metadata.id = self.project_id;
        }
        let id = self.storage.save(canvas, &metadata).await?;
        self.project_id = Some(id);
        self.last_save = Some(Instant::now());
        self.dirty = false;
        Ok(id)
    }

    /// Load a project and make it the open one.
    pub async fn load(&mut self, id: ProjectId) -> StorageResult<ProjectRecord> {
        let record = self.storage.load(id).await?;
        self.project_id = Some(id);
        self.dirty = false;
        self.last_save = Some(Instant::now());
        Ok(record)
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}
