//! Skill invocation errors and their player-facing classification.

use crate::effect::EffectError;
use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::EntityId;
use crate::stats::AttributeError;

use super::Requirement;

/// Errors that can occur while invoking a skill.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillError {
    #[error("`{skill}` is on cooldown for {remaining} more")]
    Cooldown { skill: String, remaining: u64 },

    #[error("`{skill}` is passive and cannot be used directly")]
    Passive { skill: String },

    #[error("not enough {attribute}: {required} required, {available} available")]
    NotEnoughResources {
        attribute: String,
        required: i32,
        available: i32,
    },

    #[error(transparent)]
    UnknownAttribute(#[from] AttributeError),

    /// Content data for the skill is inconsistent.
    #[error("skill `{skill}` is misconfigured: {reason}")]
    InvalidConfiguration { skill: String, reason: String },

    /// The skill's effect was refused by the stacking policy.
    #[error("skill `{skill}` had no effect: {source}")]
    EffectRefused { skill: String, source: EffectError },

    #[error("`{skill}` requires {requirement}")]
    RequirementNotMet {
        skill: String,
        requirement: Requirement,
    },

    #[error("`{skill}` is already known")]
    AlreadyKnown { skill: String },

    #[error("unknown skill `{0}`")]
    UnknownSkill(String),

    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl SkillError {
    pub fn invalid(skill: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidConfiguration {
            skill: skill.into(),
            reason: reason.to_string(),
        }
    }

    /// Maps a registry failure: refusals (stack limit, capacity) stay
    /// recoverable, anything else is a content problem.
    pub fn from_effect(skill: impl Into<String>, source: EffectError) -> Self {
        if source.is_refusal() {
            Self::EffectRefused {
                skill: skill.into(),
                source,
            }
        } else {
            Self::invalid(skill, source)
        }
    }

    /// Classifies the error for the invoking layer.
    pub fn user_failure(&self) -> UserFailure {
        match self {
            Self::Cooldown { skill, remaining } => UserFailure::OnCooldown {
                skill: skill.clone(),
                remaining: *remaining,
            },
            Self::Passive { .. } => UserFailure::PassiveSkill,
            Self::NotEnoughResources { attribute, .. } => UserFailure::NotEnoughResources {
                attribute: attribute.clone(),
            },
            Self::RequirementNotMet { requirement, .. } => UserFailure::Unqualified {
                requirement: requirement.clone(),
            },
            Self::AlreadyKnown { .. } => UserFailure::AlreadyKnown,
            Self::InvalidConfiguration { .. } | Self::EffectRefused { .. } => {
                UserFailure::NothingHappens
            }
            Self::UnknownAttribute(_)
            | Self::UnknownSkill(_)
            | Self::ActorNotFound(_)
            | Self::Oracle(_) => UserFailure::CannotAct,
        }
    }
}

impl GameError for SkillError {
    fn severity(&self) -> ErrorSeverity {
        use SkillError::*;
        match self {
            Cooldown { .. }
            | NotEnoughResources { .. }
            | EffectRefused { .. }
            | RequirementNotMet { .. } => ErrorSeverity::Recoverable,
            Passive { .. }
            | AlreadyKnown { .. }
            | UnknownAttribute(_)
            | UnknownSkill(_)
            | ActorNotFound(_) => ErrorSeverity::Validation,
            InvalidConfiguration { .. } | Oracle(_) => ErrorSeverity::Configuration,
        }
    }

    fn error_code(&self) -> &'static str {
        use SkillError::*;
        match self {
            Cooldown { .. } => "SKILL_COOLDOWN",
            Passive { .. } => "SKILL_PASSIVE",
            NotEnoughResources { .. } => "SKILL_NOT_ENOUGH_RESOURCES",
            UnknownAttribute(_) => "SKILL_UNKNOWN_ATTRIBUTE",
            InvalidConfiguration { .. } => "SKILL_INVALID_CONFIGURATION",
            EffectRefused { .. } => "SKILL_EFFECT_REFUSED",
            RequirementNotMet { .. } => "SKILL_REQUIREMENT_NOT_MET",
            AlreadyKnown { .. } => "SKILL_ALREADY_KNOWN",
            UnknownSkill(_) => "SKILL_UNKNOWN",
            ActorNotFound(_) => "SKILL_ACTOR_NOT_FOUND",
            Oracle(_) => "SKILL_ORACLE_UNAVAILABLE",
        }
    }
}

/// Player-facing failure category.
///
/// Renderers turn these into messages; the core never formats text for
/// players.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UserFailure {
    OnCooldown { skill: String, remaining: u64 },
    PassiveSkill,
    NotEnoughResources { attribute: String },
    /// A level, attribute or skill-point prerequisite is missing.
    Unqualified { requirement: Requirement },
    AlreadyKnown,
    /// Item or skill had no effect.
    NothingHappens,
    /// Item has no charges left.
    Depleted,
    CannotAct,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_failures_map_to_user_failures() {
        let cooldown = SkillError::Cooldown {
            skill: "cloudmend".into(),
            remaining: 12,
        };
        assert_eq!(
            cooldown.user_failure(),
            UserFailure::OnCooldown {
                skill: "cloudmend".into(),
                remaining: 12
            }
        );
        assert!(cooldown.severity().is_recoverable());

        let passive = SkillError::Passive {
            skill: "disfigured".into(),
        };
        assert_eq!(passive.user_failure(), UserFailure::PassiveSkill);
        assert_eq!(passive.error_code(), "SKILL_PASSIVE");
    }

    #[test]
    fn configuration_errors_read_as_nothing_happens() {
        let err = SkillError::invalid("cloudmend", "missing effect template `mend`");
        assert_eq!(err.user_failure(), UserFailure::NothingHappens);
        assert!(err.severity().is_operator_facing());
    }

    #[test]
    fn capacity_refusal_reads_as_nothing_happens() {
        let err = SkillError::from_effect("secondwind", EffectError::RegistryFull { capacity: 32 });
        assert!(matches!(err, SkillError::EffectRefused { .. }));
        assert_eq!(err.user_failure(), UserFailure::NothingHappens);
        assert!(err.severity().is_recoverable());

        let err = SkillError::from_effect("secondwind", EffectError::UnknownTemplate("x".into()));
        assert!(matches!(err, SkillError::InvalidConfiguration { .. }));
    }

    #[test]
    fn unmet_requirement_is_recoverable() {
        let err = SkillError::RequirementNotMet {
            skill: "mend".into(),
            requirement: Requirement::Level(3),
        };
        assert_eq!(
            err.user_failure(),
            UserFailure::Unqualified {
                requirement: Requirement::Level(3)
            }
        );
        assert!(err.severity().is_recoverable());
        assert_eq!(err.to_string(), "`mend` requires level 3");
    }

    #[test]
    fn unknown_attribute_cannot_act() {
        let err = SkillError::from(AttributeError::unknown("aether"));
        assert_eq!(err.user_failure(), UserFailure::CannotAct);
    }
}
