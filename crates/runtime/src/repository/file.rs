//! File-based ActorRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use myelin_core::{ActorRecord, EntityId};

use crate::api::Result;
use crate::repository::{ActorRepository, RepositoryError};

/// File-based implementation of ActorRepository.
///
/// Actors are stored as `actor_{id}.json`, written through a temp file and an
/// atomic rename.
pub struct FileActorRepository {
    base_dir: PathBuf,
}

impl FileActorRepository {
    /// Create a new file-based actor repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    /// Platform-specific default save directory.
    ///
    /// - Linux: `~/.local/share/myelin/saves` (or `$XDG_DATA_HOME/myelin/saves`)
    /// - macOS: `~/Library/Application Support/myelin/saves`
    /// - Windows: `%APPDATA%\myelin\saves`
    /// - Fallback: `./save_data`
    pub fn default_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", "myelin")
            .map(|dirs| dirs.data_dir().join("saves"))
            .unwrap_or_else(|| PathBuf::from("./save_data"))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn actor_path(&self, id: EntityId) -> PathBuf {
        self.base_dir.join(format!("actor_{}.json", id.0))
    }
}

impl ActorRepository for FileActorRepository {
    fn save(&self, record: &ActorRecord) -> Result<()> {
        let path = self.actor_path(record.id);
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(record)
            .map_err(|e| RepositoryError::Json(e.to_string()))?;

        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!("Saved actor[{}] to {}", record.id, path.display());

        Ok(())
    }

    fn load(&self, id: EntityId) -> Result<Option<ActorRecord>> {
        let path = self.actor_path(id);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let record: ActorRecord =
            serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Json(e.to_string()))?;

        tracing::debug!("Loaded actor[{}] from {}", id, path.display());

        Ok(Some(record))
    }

    fn exists(&self, id: EntityId) -> bool {
        self.actor_path(id).exists()
    }

    fn delete(&self, id: EntityId) -> Result<()> {
        let path = self.actor_path(id);

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted actor[{}]", id);
        }

        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<EntityId>> {
        let mut ids = Vec::new();

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;

        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id_str) = filename
                    .strip_prefix("actor_")
                    .and_then(|s| s.strip_suffix(".json"))
                && let Ok(id) = id_str.parse::<u32>()
            {
                ids.push(EntityId(id));
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }
}
