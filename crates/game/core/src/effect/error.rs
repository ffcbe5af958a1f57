//! Effect creation and registry errors.

use crate::error::{ErrorSeverity, GameError};

/// Errors that can occur while creating or adding effects.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectError {
    /// A non-stackable effect with the same name is already active.
    #[error("effect `{name}` is already active")]
    AlreadyActive { name: String },

    /// The existing instance already holds the maximum number of stacks.
    #[error("effect `{name}` is at its stack limit ({max_stacks})")]
    StackLimitReached { name: String, max_stacks: u32 },

    /// The actor carries the maximum number of effects.
    #[error("effect registry is full ({capacity} effects)")]
    RegistryFull { capacity: usize },

    /// Deactivated instances cannot be re-added.
    #[error("effect `{name}` has already been deactivated")]
    Deactivated { name: String },

    /// The effect modifies an attribute the actor does not have.
    #[error("effect `{effect}` targets unknown attribute `{attribute}`")]
    UnknownAttribute { effect: String, attribute: String },

    /// No template is registered under this id.
    #[error("unknown effect template `{0}`")]
    UnknownTemplate(String),

    /// Template overrides do not match the effect kind's schema.
    #[error("invalid configuration for effect `{effect}`: {reason}")]
    InvalidConfiguration { effect: String, reason: String },
}

impl EffectError {
    pub fn invalid(effect: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            effect: effect.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for refusals by the stacking policy, as opposed to
    /// malformed content.
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            Self::AlreadyActive { .. } | Self::StackLimitReached { .. } | Self::RegistryFull { .. }
        )
    }
}

impl GameError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        use EffectError::*;
        match self {
            AlreadyActive { .. } | StackLimitReached { .. } | RegistryFull { .. } => {
                ErrorSeverity::Recoverable
            }
            Deactivated { .. } => ErrorSeverity::Validation,
            UnknownAttribute { .. } | UnknownTemplate(_) | InvalidConfiguration { .. } => {
                ErrorSeverity::Configuration
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use EffectError::*;
        match self {
            AlreadyActive { .. } => "EFFECT_ALREADY_ACTIVE",
            StackLimitReached { .. } => "EFFECT_STACK_LIMIT",
            RegistryFull { .. } => "EFFECT_REGISTRY_FULL",
            Deactivated { .. } => "EFFECT_DEACTIVATED",
            UnknownAttribute { .. } => "EFFECT_UNKNOWN_ATTRIBUTE",
            UnknownTemplate(_) => "EFFECT_UNKNOWN_TEMPLATE",
            InvalidConfiguration { .. } => "EFFECT_INVALID_CONFIGURATION",
        }
    }
}
