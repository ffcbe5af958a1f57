//! Skill execution: gate, commit, behavior.

use tracing::{debug, warn};

use crate::effect::{
    AddOutcome, EffectDuration, EffectError, EffectFlags, EffectInstance, EffectKind, EffectType,
};
use crate::env::{GameEnv, Notification, compute_seed};
use crate::state::{EntityId, GameState, SourceRef};

use super::gate::{self, GateReceipt};
use super::health::{HealRange, commit_heal, minor_heal_range};
use super::{Invocation, Skill, SkillBehavior, SkillError};

/// A single skill invocation.
#[derive(Clone, Copy, Debug)]
pub struct SkillRequest<'s> {
    pub actor: EntityId,
    pub skill: &'s Skill,
    pub invocation: Invocation,
    /// Cooldown supplied by the invoking item; wins over the skill's own.
    pub cooldown_override: Option<u64>,
    /// Registry slots the caller will fill after this invocation succeeds.
    pub reserved_slots: usize,
}

impl<'s> SkillRequest<'s> {
    pub fn direct(actor: EntityId, skill: &'s Skill) -> Self {
        Self {
            actor,
            skill,
            invocation: Invocation::Direct,
            cooldown_override: None,
            reserved_slots: 0,
        }
    }

    pub fn automatic(actor: EntityId, skill: &'s Skill) -> Self {
        Self {
            invocation: Invocation::Automatic,
            ..Self::direct(actor, skill)
        }
    }

    pub fn with_cooldown_override(mut self, cooldown: Option<u64>) -> Self {
        self.cooldown_override = cooldown;
        self
    }

    pub fn with_reserved_slots(mut self, slots: usize) -> Self {
        self.reserved_slots = slots;
        self
    }
}

/// Heal committed to one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealApplied {
    pub target: EntityId,
    /// Value sampled from the heal range.
    pub rolled: i32,
    /// Value actually added after clamping to the cap.
    pub applied: i32,
}

/// What a skill's behavior did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkillResult {
    Healed {
        range: HealRange,
        heals: Vec<HealApplied>,
        /// Targets that were missing, dead or lacked the attribute.
        skipped: Vec<EntityId>,
    },
    EffectApplied(AddOutcome),
    PassiveInstalled(AddOutcome),
}

/// Complete outcome of a successful invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillOutcome {
    pub skill: String,
    pub actor: EntityId,
    pub receipt: GateReceipt,
    pub result: SkillResult,
}

/// Work decided before the commit, so that nothing is charged for an
/// invocation that cannot run.
enum Plan {
    Heal {
        attribute: String,
        range: HealRange,
        targets: Vec<EntityId>,
    },
    Effect(EffectInstance),
}

/// Checks requirements and the gate, commits the cost and executes the
/// skill's behavior.
///
/// The cooldown, the skill's effect and `reserved_slots` are admitted
/// against the registry together before anything is charged.
///
/// Heal targets are processed independently: a missing or ineligible target
/// is recorded in `skipped` and does not abort the others. The state's nonce
/// advances after every successful execution.
pub fn execute(
    state: &mut GameState,
    env: &GameEnv<'_>,
    request: SkillRequest<'_>,
) -> Result<SkillOutcome, SkillError> {
    let skill = request.skill;
    let actor_id = request.actor;
    let actor = state
        .entities
        .actor(actor_id)
        .ok_or(SkillError::ActorNotFound(actor_id))?;

    skill.requirements.check(&skill.id, actor)?;
    gate::check(skill, request.invocation, actor)?;

    let plan = match &skill.behavior {
        SkillBehavior::AreaHeal {
            attribute,
            min_cap,
            max_cap,
        }
        | SkillBehavior::Heal {
            attribute,
            min_cap,
            max_cap,
        } => {
            // No RNG means nothing could be rolled; fail before charging.
            env.rng()?;
            let targets = match skill.behavior {
                SkillBehavior::AreaHeal { .. } => state.entities.party_in_room(actor_id),
                _ => vec![actor_id],
            };
            Plan::Heal {
                attribute: attribute.clone(),
                range: minor_heal_range(
                    actor.attributes.get("willpower")?,
                    actor.attributes.get("intellect")?,
                    actor.level,
                    *min_cap,
                    *max_cap,
                ),
                targets,
            }
        }
        SkillBehavior::ApplyEffect | SkillBehavior::Passive => {
            Plan::Effect(prepare_effect(skill, actor_id, env)?)
        }
    };

    let cooldown = gate::cooldown_effect(skill, actor_id, request.cooldown_override);
    let incoming: Vec<&EffectInstance> = cooldown
        .iter()
        .chain(match &plan {
            Plan::Effect(effect) => Some(effect),
            Plan::Heal { .. } => None,
        })
        .collect();
    actor
        .effects
        .admit_batch(&incoming, request.reserved_slots, &actor.attributes)
        .map_err(|source| SkillError::from_effect(&skill.id, source))?;

    let actor = state
        .entities
        .actor_mut(actor_id)
        .ok_or(SkillError::ActorNotFound(actor_id))?;
    let receipt = gate::commit(skill, actor, request.cooldown_override)?;

    let result = match plan {
        Plan::Heal {
            attribute,
            range,
            targets,
        } => run_heal(state, env, actor_id, &attribute, range, &targets)?,
        Plan::Effect(effect) => {
            let name = effect.name.clone();
            let hidden = effect.is_hidden();
            let outcome = actor
                .add_effect(effect)
                .map_err(|source| SkillError::from_effect(&skill.id, source))?;
            env.notify(Notification::effect_added(actor_id, &name, hidden, &outcome));
            match skill.behavior {
                SkillBehavior::Passive => SkillResult::PassiveInstalled(outcome),
                _ => SkillResult::EffectApplied(outcome),
            }
        }
    };

    state.nonce += 1;
    debug!(
        skill = %skill.id,
        actor = %actor_id,
        invocation = ?request.invocation,
        "skill executed"
    );

    Ok(SkillOutcome {
        skill: skill.id.clone(),
        actor: actor_id,
        receipt,
        result,
    })
}

fn run_heal(
    state: &mut GameState,
    env: &GameEnv<'_>,
    source: EntityId,
    attribute: &str,
    range: HealRange,
    targets: &[EntityId],
) -> Result<SkillResult, SkillError> {
    let rng = env.rng()?;
    let (game_seed, nonce) = (state.game_seed, state.nonce);

    let mut heals = Vec::with_capacity(targets.len());
    let mut skipped = Vec::new();
    for (index, &target_id) in targets.iter().enumerate() {
        let Some(target) = state
            .entities
            .actor_mut(target_id)
            .filter(|target| target.is_alive())
        else {
            skipped.push(target_id);
            continue;
        };

        let context = u32::try_from(index).unwrap_or(u32::MAX);
        let rolled = range.roll(rng, compute_seed(game_seed, nonce, source.0, context));
        match commit_heal(target, attribute, rolled) {
            Ok(applied) => {
                heals.push(HealApplied {
                    target: target_id,
                    rolled,
                    applied,
                });
                env.notify(Notification::Healed {
                    source,
                    target: target_id,
                    amount: applied,
                });
            }
            Err(err) => {
                warn!(target = %target_id, %err, "heal skipped");
                skipped.push(target_id);
            }
        }
    }

    Ok(SkillResult::Healed {
        range,
        heals,
        skipped,
    })
}

/// Instantiates the effect a skill installs. Passive skills without an
/// effect install a hidden marker.
fn prepare_effect(
    skill: &Skill,
    owner: EntityId,
    env: &GameEnv<'_>,
) -> Result<EffectInstance, SkillError> {
    let passive = matches!(skill.behavior, SkillBehavior::Passive);
    let source = SourceRef::Skill(skill.id.clone());

    let Some(spec) = &skill.effect else {
        if !passive {
            return Err(SkillError::invalid(&skill.id, "no effect configured"));
        }
        return Ok(EffectInstance::new(
            "passive",
            skill.name.clone(),
            EffectType::Passive,
            EffectKind::PassiveSkill {
                skill: skill.id.clone(),
            },
            EffectDuration::Infinite,
            owner,
        )
        .with_flags(EffectFlags::PASSIVE | EffectFlags::HIDDEN)
        .with_source(source));
    };

    let template = env.catalog()?.effect(&spec.effect).ok_or_else(|| {
        SkillError::invalid(&skill.id, EffectError::UnknownTemplate(spec.effect.clone()))
    })?;
    let mut effect = template
        .instantiate(owner, &spec.config, &spec.state)
        .map_err(|source| SkillError::invalid(&skill.id, source))?;
    if passive {
        effect.flags |= EffectFlags::PASSIVE;
    }
    Ok(effect.with_source(source))
}
