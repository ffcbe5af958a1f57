//! Repository contracts for saving and loading actors.

use myelin_core::{ActorRecord, EntityId};

use crate::api::Result;

/// Repository for actor persistence.
///
/// Records carry base attributes and the serialized effect registry;
/// attribute deltas are re-derived on restore.
pub trait ActorRepository: Send + Sync {
    /// Save (or overwrite) an actor record.
    fn save(&self, record: &ActorRecord) -> Result<()>;

    /// Load an actor record by id.
    fn load(&self, id: EntityId) -> Result<Option<ActorRecord>>;

    /// Check if a record exists.
    fn exists(&self, id: EntityId) -> bool;

    /// Delete a record. Missing records are not an error.
    fn delete(&self, id: EntityId) -> Result<()>;

    /// List every stored actor id.
    fn list_ids(&self) -> Result<Vec<EntityId>> {
        Ok(vec![])
    }
}
