//! Error types for item use.

use crate::effect::EffectError;
use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::skill::{SkillError, UserFailure};
use crate::state::{EntityId, ItemId};

/// Errors surfaced while using or equipping an item.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemUseError {
    #[error("{item} has no charges left")]
    Depleted { item: ItemId },

    /// The item carries neither an ability nor an effect.
    #[error("{item} is not usable")]
    NotUsable { item: ItemId },

    /// The item references content that does not exist or does not fit.
    #[error("{item} has an invalid usable configuration: {reason}")]
    InvalidConfiguration { item: ItemId, reason: String },

    /// The item's effect was refused by the stacking policy.
    #[error("{item} had no effect: {source}")]
    EffectRefused { item: ItemId, source: EffectError },

    #[error("ability failed: {0}")]
    Skill(#[from] SkillError),

    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl ItemUseError {
    pub fn invalid(item: ItemId, reason: impl ToString) -> Self {
        Self::InvalidConfiguration {
            item,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn from_effect(item: ItemId, source: EffectError) -> Self {
        if source.is_refusal() {
            Self::EffectRefused { item, source }
        } else {
            Self::invalid(item, source)
        }
    }

    pub fn user_failure(&self) -> UserFailure {
        match self {
            Self::Depleted { .. } => UserFailure::Depleted,
            Self::EffectRefused { .. } => UserFailure::NothingHappens,
            Self::Skill(err) => err.user_failure(),
            Self::NotUsable { .. }
            | Self::InvalidConfiguration { .. }
            | Self::ActorNotFound(_)
            | Self::Oracle(_) => UserFailure::CannotAct,
        }
    }
}

impl GameError for ItemUseError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Depleted { .. } | Self::EffectRefused { .. } => ErrorSeverity::Recoverable,
            Self::NotUsable { .. } | Self::ActorNotFound(_) => ErrorSeverity::Validation,
            Self::InvalidConfiguration { .. } | Self::Oracle(_) => ErrorSeverity::Configuration,
            Self::Skill(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Depleted { .. } => "ITEM_DEPLETED",
            Self::NotUsable { .. } => "ITEM_NOT_USABLE",
            Self::InvalidConfiguration { .. } => "ITEM_INVALID_CONFIGURATION",
            Self::EffectRefused { .. } => "ITEM_EFFECT_REFUSED",
            Self::Skill(err) => err.error_code(),
            Self::ActorNotFound(_) => "ITEM_ACTOR_NOT_FOUND",
            Self::Oracle(_) => "ITEM_ORACLE_UNAVAILABLE",
        }
    }
}
