//! Skills: resource-gated abilities and passive traits.
//!
//! A skill invocation runs through these stages:
//!
//! 1. [`SkillRequirements::check`]: level and attribute prerequisites
//! 2. [`gate::check`]: cooldown, passive and resource checks (read-only)
//! 3. [`gate::commit`]: cooldown installation and resource deduction
//! 4. the skill's [`SkillBehavior`], driven by [`executor::execute`]
//!
//! Nothing is mutated when a stage before the commit fails.
pub mod error;
pub mod executor;
pub mod gate;
pub mod health;
pub mod requirements;

pub use error::{SkillError, UserFailure};
pub use executor::{HealApplied, SkillOutcome, SkillRequest, SkillResult, execute};
pub use gate::GateReceipt;
pub use health::{HealRange, commit_damage, commit_heal, minor_heal_range};
pub use requirements::{Requirement, SkillRequirements};

use bitflags::bitflags;

use crate::effect::EffectSpec;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct SkillFlags: u8 {
        /// Runs automatically; never invoked directly.
        const PASSIVE = 1 << 0;
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillType {
    Feat,
    Mutation,
    Spell,
}

/// Resource spent when a skill is invoked.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceCost {
    pub attribute: String,
    pub cost: i32,
}

/// What a skill does once its cost is paid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillBehavior {
    /// Minor heal on the caster and every party member in the same room.
    AreaHeal {
        attribute: String,
        min_cap: i32,
        max_cap: i32,
    },

    /// Minor heal on the caster only.
    Heal {
        attribute: String,
        min_cap: i32,
        max_cap: i32,
    },

    /// Applies the skill's effect to the caster.
    ApplyEffect,

    /// Installs the skill's effect as a permanent passive trait.
    Passive,
}

impl SkillBehavior {
    pub fn needs_effect(&self) -> bool {
        matches!(self, Self::ApplyEffect)
    }
}

/// Content definition of a skill.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub skill_type: SkillType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: SkillFlags,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resource: Option<ResourceCost>,
    /// Cooldown length in game-time units; zero disables the cooldown.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: u64,
    pub behavior: SkillBehavior,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: Option<EffectSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub requirements: SkillRequirements,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl Skill {
    pub fn new(id: impl Into<String>, skill_type: SkillType, behavior: SkillBehavior) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            skill_type,
            flags: SkillFlags::empty(),
            resource: None,
            cooldown: 0,
            behavior,
            effect: None,
            requirements: SkillRequirements::default(),
            description: String::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_cost(mut self, attribute: impl Into<String>, cost: i32) -> Self {
        self.resource = Some(ResourceCost {
            attribute: attribute.into(),
            cost,
        });
        self
    }

    pub fn with_cooldown(mut self, cooldown: u64) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_effect(mut self, effect: EffectSpec) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn with_requirements(mut self, requirements: SkillRequirements) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn passive(mut self) -> Self {
        self.flags |= SkillFlags::PASSIVE;
        self
    }

    pub fn is_passive(&self) -> bool {
        self.flags.contains(SkillFlags::PASSIVE)
    }

    /// Semantic description for help and skill listings.
    pub fn info(&self) -> SkillInfo {
        SkillInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            skill_type: self.skill_type,
            passive: self.is_passive(),
            cost: self.resource.clone(),
            cooldown: self.cooldown,
            requirements: self.requirements.clone(),
            description: self.description.clone(),
        }
    }
}

/// Presentation-free description of a skill.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillInfo {
    pub id: String,
    pub name: String,
    pub skill_type: SkillType,
    pub passive: bool,
    pub cost: Option<ResourceCost>,
    pub cooldown: u64,
    pub requirements: SkillRequirements,
    pub description: String,
}

/// How a skill was triggered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Invocation {
    /// Player command or item use.
    Direct,
    /// Passive activation by the engine.
    Automatic,
}
