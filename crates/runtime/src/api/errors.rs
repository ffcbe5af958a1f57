//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the engine, content lookups and repositories so
//! clients can bubble them up with consistent context.
use thiserror::Error;

use myelin_core::{CraftingError, EntityId, ItemId, ItemUseError, SkillError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Skill(#[from] SkillError),

    #[error(transparent)]
    Item(#[from] ItemUseError),

    #[error(transparent)]
    Crafting(#[from] CraftingError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("no item definition `{0}`")]
    UnknownItem(String),

    #[error("no item instance {0}")]
    ItemNotFound(ItemId),

    #[error("runtime requires a content catalog before building")]
    MissingCatalog,
}
