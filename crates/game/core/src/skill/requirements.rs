//! Skill prerequisites: minimum level and attributes, plus the skill-point
//! price of learning the skill.

use std::collections::BTreeMap;
use std::fmt;

use crate::state::ActorState;

use super::SkillError;

/// Prerequisites of a skill. An empty table gates nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillRequirements {
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: u32,
    /// Minimum current value per attribute.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: BTreeMap<String, i32>,
    /// Skill points spent when the skill is learned.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: u32,
}

/// A single unmet prerequisite.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Requirement {
    Level(u32),
    Attribute { attribute: String, required: i32 },
    SkillPoints(u32),
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level(level) => write!(f, "level {level}"),
            Self::Attribute {
                attribute,
                required,
            } => write!(f, "{required} {attribute}"),
            Self::SkillPoints(points) => write!(f, "{points} skill points"),
        }
    }
}

impl SkillRequirements {
    pub fn new(level: u32) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>, minimum: i32) -> Self {
        self.attributes.insert(attribute.into(), minimum);
        self
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.level == 0 && self.attributes.is_empty() && self.cost == 0
    }

    /// Level first, then attributes in name order. Attributes are compared
    /// by current value, so buffs and debuffs count.
    pub fn check(&self, skill: &str, actor: &ActorState) -> Result<(), SkillError> {
        let unmet = |requirement| SkillError::RequirementNotMet {
            skill: skill.to_string(),
            requirement,
        };

        if actor.level < self.level {
            return Err(unmet(Requirement::Level(self.level)));
        }
        for (attribute, &required) in &self.attributes {
            if actor.attributes.get(attribute)? < required {
                return Err(unmet(Requirement::Attribute {
                    attribute: attribute.clone(),
                    required,
                }));
            }
        }
        Ok(())
    }

    /// Prerequisites plus the skill-point price.
    pub fn check_learnable(&self, skill: &str, actor: &ActorState) -> Result<(), SkillError> {
        self.check(skill, actor)?;
        if actor.skill_points < self.cost {
            return Err(SkillError::RequirementNotMet {
                skill: skill.to_string(),
                requirement: Requirement::SkillPoints(self.cost),
            });
        }
        Ok(())
    }
}
