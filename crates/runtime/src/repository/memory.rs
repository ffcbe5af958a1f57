//! In-memory ActorRepository used by tests and ephemeral sessions.

use std::collections::BTreeMap;
use std::sync::RwLock;

use myelin_core::{ActorRecord, EntityId};

use crate::api::Result;
use crate::repository::{ActorRepository, RepositoryError};

#[derive(Debug, Default)]
pub struct InMemoryActorRepository {
    records: RwLock<BTreeMap<EntityId, ActorRecord>>,
}

impl InMemoryActorRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActorRepository for InMemoryActorRepository {
    fn save(&self, record: &ActorRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        records.insert(record.id, record.clone());
        Ok(())
    }

    fn load(&self, id: EntityId) -> Result<Option<ActorRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.get(&id).cloned())
    }

    fn exists(&self, id: EntityId) -> bool {
        self.records
            .read()
            .map(|records| records.contains_key(&id))
            .unwrap_or(false)
    }

    fn delete(&self, id: EntityId) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        records.remove(&id);
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<EntityId>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.keys().copied().collect())
    }
}
