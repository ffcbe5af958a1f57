//! Engine façade over [`GameState`].
//!
//! The [`GameEngine`] is the single entry point for state mutation: skill
//! invocation and learning, passive activation, item use, item-sourced
//! effects and the per-tick advancement of every actor's effects. Failures are logged and
//! reported to the notification sink before they are returned, so callers
//! only need the `Result` for control flow.

mod clock;
mod errors;
mod items;

pub use clock::TickSummary;
pub use errors::ItemUseError;
pub use items::ItemUseOutcome;

use tracing::{debug, error, warn};

use crate::effect::{EffectId, EffectInstance};
use crate::env::{GameEnv, Notification};
use crate::error::{ErrorSeverity, GameError};
use crate::skill::{self, Invocation, SkillError, SkillOutcome, SkillRequest, commit_damage};
use crate::state::{EntityId, GameState};

/// Game engine that owns every state mutation for the duration of a borrow.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    /// Creates a new game engine with the given state.
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Invokes a skill directly (player command).
    pub fn execute_skill(
        &mut self,
        env: GameEnv<'_>,
        actor: EntityId,
        skill_id: &str,
    ) -> Result<SkillOutcome, SkillError> {
        let result = self.lookup_and_run(&env, actor, skill_id, Invocation::Direct);
        self.report(&env, actor, skill_id, result)
    }

    /// Performs the automatic invocation of a passive skill.
    pub fn activate_passive(
        &mut self,
        env: GameEnv<'_>,
        actor: EntityId,
        skill_id: &str,
    ) -> Result<SkillOutcome, SkillError> {
        let result = self.lookup_and_run(&env, actor, skill_id, Invocation::Automatic);
        self.report(&env, actor, skill_id, result)
    }

    fn lookup_and_run(
        &mut self,
        env: &GameEnv<'_>,
        actor: EntityId,
        skill_id: &str,
        invocation: Invocation,
    ) -> Result<SkillOutcome, SkillError> {
        let skill = env
            .catalog()?
            .skill(skill_id)
            .ok_or_else(|| SkillError::UnknownSkill(skill_id.to_string()))?;
        let request = SkillRequest {
            invocation,
            ..SkillRequest::direct(actor, &skill)
        };
        skill::execute(self.state, env, request)
    }

    /// Spends skill points to learn a skill. Level and attribute
    /// prerequisites are checked as for an invocation.
    pub fn learn_skill(
        &mut self,
        env: GameEnv<'_>,
        actor: EntityId,
        skill_id: &str,
    ) -> Result<(), SkillError> {
        let result = self.try_learn(&env, actor, skill_id);
        self.report(&env, actor, skill_id, result)
    }

    fn try_learn(
        &mut self,
        env: &GameEnv<'_>,
        actor_id: EntityId,
        skill_id: &str,
    ) -> Result<(), SkillError> {
        let skill = env
            .catalog()?
            .skill(skill_id)
            .ok_or_else(|| SkillError::UnknownSkill(skill_id.to_string()))?;
        let actor = self
            .state
            .entities
            .actor_mut(actor_id)
            .ok_or(SkillError::ActorNotFound(actor_id))?;

        if actor.knows(&skill.id) {
            return Err(SkillError::AlreadyKnown { skill: skill.id });
        }
        skill.requirements.check_learnable(&skill.id, actor)?;

        actor.skill_points -= skill.requirements.cost;
        actor.skills.insert(skill.id.clone());
        debug!(
            actor = %actor_id,
            skill = %skill.id,
            points_left = actor.skill_points,
            "skill learned"
        );
        env.notify(Notification::SkillLearned {
            actor: actor_id,
            skill: skill.id,
            name: skill.name,
        });
        Ok(())
    }

    fn report<T>(
        &self,
        env: &GameEnv<'_>,
        actor: EntityId,
        skill_id: &str,
        result: Result<T, SkillError>,
    ) -> Result<T, SkillError> {
        if let Err(err) = &result {
            log_failure(err, actor, skill_id);
            env.notify(Notification::SkillFailed {
                actor,
                skill: skill_id.to_string(),
                failure: err.user_failure(),
            });
        }
        result
    }

    /// Applies damage to `attribute`, scaled by the target's incoming damage
    /// multipliers. Returns the damage dealt.
    pub fn apply_damage(
        &mut self,
        target: EntityId,
        attribute: &str,
        amount: i32,
    ) -> Result<i32, SkillError> {
        let actor = self
            .state
            .entities
            .actor_mut(target)
            .ok_or(SkillError::ActorNotFound(target))?;
        let dealt = commit_damage(actor, attribute, amount)?;
        debug!(%target, attribute, amount, dealt, "damage applied");
        Ok(dealt)
    }

    /// Removes one effect explicitly. Unknown actors or ids are a no-op.
    pub fn remove_effect(
        &mut self,
        env: GameEnv<'_>,
        actor: EntityId,
        id: EffectId,
    ) -> Option<EffectInstance> {
        let removed = self.state.entities.actor_mut(actor)?.remove_effect(id)?;
        env.notify(Notification::EffectRemoved {
            target: actor,
            effect: removed.name.clone(),
        });
        Some(removed)
    }
}

/// Logs a failure at a level matching its severity.
pub(crate) fn log_failure(err: &impl GameError, actor: EntityId, subject: &str) {
    match err.severity() {
        ErrorSeverity::Configuration => {
            error!(%actor, subject, code = err.error_code(), %err, "invalid configuration")
        }
        ErrorSeverity::Validation => {
            warn!(%actor, subject, code = err.error_code(), %err, "cannot act")
        }
        ErrorSeverity::Recoverable => {
            debug!(%actor, subject, code = err.error_code(), %err, "refused")
        }
    }
}
