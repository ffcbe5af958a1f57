//! Resource and cooldown gate.
//!
//! `check` is read-only; `commit` mutates and must only run after a
//! successful `check` against the same actor state.

use tracing::debug;

use crate::effect::{EffectId, EffectInstance};
use crate::state::{ActorState, EntityId};

use super::{Invocation, Skill, SkillError};

/// What a successful commit charged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GateReceipt {
    /// `(attribute, amount)` deducted from the attribute's base.
    pub spent: Option<(String, i32)>,
    pub cooldown: Option<EffectId>,
}

/// Validates that `actor` may invoke `skill`. First failure wins:
///
/// 1. a cooldown effect for the skill with time left
/// 2. a passive skill invoked directly
/// 3. the declared resource is below the cost
pub fn check(skill: &Skill, invocation: Invocation, actor: &ActorState) -> Result<(), SkillError> {
    if let Some(cooldown) = actor.effects.cooldown_for(&skill.id) {
        return Err(SkillError::Cooldown {
            skill: skill.id.clone(),
            remaining: cooldown.remaining,
        });
    }

    if skill.is_passive() && invocation == Invocation::Direct {
        return Err(SkillError::Passive {
            skill: skill.id.clone(),
        });
    }

    if let Some(resource) = &skill.resource {
        let available = actor.attributes.get(&resource.attribute)?;
        if available < resource.cost {
            return Err(SkillError::NotEnoughResources {
                attribute: resource.attribute.clone(),
                required: resource.cost,
                available,
            });
        }
    }

    Ok(())
}

/// The cooldown a commit would install, if any.
pub fn cooldown_effect(
    skill: &Skill,
    owner: EntityId,
    cooldown_override: Option<u64>,
) -> Option<EffectInstance> {
    let length = cooldown_override.unwrap_or(skill.cooldown);
    (length > 0).then(|| EffectInstance::cooldown(&skill.id, length, owner))
}

/// Installs the cooldown and deducts the cost.
///
/// `cooldown_override` replaces the skill's own cooldown (items supply one);
/// a zero length installs nothing.
pub fn commit(
    skill: &Skill,
    actor: &mut ActorState,
    cooldown_override: Option<u64>,
) -> Result<GateReceipt, SkillError> {
    let mut receipt = GateReceipt::default();

    if let Some(cooldown) = cooldown_effect(skill, actor.id, cooldown_override) {
        let outcome = actor
            .add_effect(cooldown)
            .map_err(|source| SkillError::from_effect(&skill.id, source))?;
        receipt.cooldown = Some(outcome.id());
    }

    if let Some(resource) = &skill.resource {
        actor
            .attributes
            .adjust_base(&resource.attribute, -resource.cost)?;
        receipt.spent = Some((resource.attribute.clone(), resource.cost));
    }

    debug!(skill = %skill.id, actor = %actor.id, ?receipt, "skill cost committed");
    Ok(receipt)
}
