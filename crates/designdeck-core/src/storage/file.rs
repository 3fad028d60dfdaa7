//! File-based storage implementation.

use super::{BoxFuture, ProjectId, ProjectMetadata, ProjectRecord, Storage, StorageError, StorageResult, sort_newest_first};
use crate::canvas::CanvasState;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each project as a `<id>.json` file in a directory.
pub struct FileStorage {
    /// Base directory for project files.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(|e| StorageError::Io(format!("Failed to create storage directory: {}", e)))?;
        }
        Ok(Self { base_path })
    }

    /// Platform data directory for projects.
    ///
    /// On Linux: `~/.local/share/designdeck/projects/`
    /// On Windows: `%LOCALAPPDATA%\designdeck\projects\`
    pub fn default_path() -> StorageResult<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Ok(base.join("designdeck").join("projects"))
    }

    fn project_path(&self, id: ProjectId) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn read_record(path: &Path) -> StorageResult<ProjectRecord> {
    let json = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    ProjectRecord::from_json(&json)
        .map_err(|e| StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e)))
}

impl Storage for FileStorage {
    fn save(&self, canvas: &CanvasState, metadata: &ProjectMetadata) -> BoxFuture<'_, StorageResult<ProjectId>> {
        let metadata = metadata.stamped();
        let Some(id) = metadata.id else {
            return Box::pin(async { Err(StorageError::Other("Project id missing".to_string())) });
        };
        let record = ProjectRecord {
            metadata,
            canvas: canvas.select_element(None),
        };
        let path = self.project_path(id);

        Box::pin(async move {
            let json = record
                .to_json()
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            fs::write(&path, json)
                .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
            log::info!("Saved project {} to {}", id, path.display());
            Ok(id)
        })
    }

    fn load(&self, id: ProjectId) -> BoxFuture<'_, StorageResult<ProjectRecord>> {
        let path = self.project_path(id);
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id.to_string()));
            }
            read_record(&path)
        })
    }

    fn delete(&self, id: ProjectId) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(id);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path)
                    .map_err(|e| StorageError::Io(format!("Failed to delete {}: {}", path.display(), e)))?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<ProjectMetadata>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }
            let entries = fs::read_dir(&base).map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

            let mut projects = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_none_or(|ext| ext != "json") {
                    continue;
                }
                match read_record(&path) {
                    Ok(record) => projects.push(record.metadata),
                    Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
                }
            }
            sort_newest_first(&mut projects);
            Ok(projects)
        })
    }

    fn exists(&self, id: ProjectId) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.project_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}
