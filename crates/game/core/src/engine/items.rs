use tracing::debug;

use crate::effect::{
    AddOutcome, Admission, EffectInstance, EffectSpec, OverrideValue, Overrides,
};
use crate::env::{GameEnv, Notification, UsableItem};
use crate::skill::{self, SkillOutcome, SkillRequest};
use crate::state::{EntityId, ItemId, SourceRef};

use super::errors::ItemUseError;
use super::{GameEngine, log_failure};

/// Result of a successful item use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemUseOutcome {
    pub item: ItemId,
    /// Outcome of the item's ability, if it has one.
    pub skill: Option<SkillOutcome>,
    /// Outcome of the item's effect, if it has one.
    pub effect: Option<AddOutcome>,
    /// `None` for unlimited items.
    pub charges_left: Option<u32>,
    /// The caller must remove the item instance.
    pub destroyed: bool,
}

/// Item methods for GameEngine.
impl<'a> GameEngine<'a> {
    /// Uses an item: runs its ability and/or applies its effect, then spends
    /// one charge.
    ///
    /// The effect is instantiated and admitted before the ability runs, so a
    /// misconfigured or refused effect charges neither the ability cost nor
    /// an item charge. A registry slot the effect will take is reserved in
    /// the ability's own admission check.
    pub fn use_item(
        &mut self,
        env: GameEnv<'_>,
        actor: EntityId,
        item: &mut UsableItem,
    ) -> Result<ItemUseOutcome, ItemUseError> {
        let result = self.run_item(&env, actor, item);
        match &result {
            Ok(outcome) => {
                if outcome.charges_left == Some(0) {
                    env.notify(Notification::ItemDepleted {
                        actor,
                        item: item.id,
                        name: item.name.clone(),
                        destroyed: outcome.destroyed,
                    });
                }
            }
            Err(err) => {
                log_failure(err, actor, &item.name);
                env.notify(Notification::ItemFailed {
                    actor,
                    item: item.id,
                    name: item.name.clone(),
                    failure: err.user_failure(),
                });
            }
        }
        result
    }

    fn run_item(
        &mut self,
        env: &GameEnv<'_>,
        actor_id: EntityId,
        item: &mut UsableItem,
    ) -> Result<ItemUseOutcome, ItemUseError> {
        let usable = &item.usable;
        if usable.is_depleted() {
            return Err(ItemUseError::Depleted { item: item.id });
        }
        if usable.ability.is_none() && usable.effect.is_none() {
            return Err(ItemUseError::NotUsable { item: item.id });
        }

        let mut reserved_slots = 0;
        let effect = match &usable.effect {
            Some(template) => {
                let mut config = Overrides::new();
                config.insert("name".into(), OverrideValue::from(item.name.as_str()));
                config.extend(usable.config.clone());
                let spec = EffectSpec {
                    effect: template.clone(),
                    config,
                    state: usable.state.clone(),
                };
                let effect = self.item_effect(env, actor_id, item.id, &spec)?;
                let actor = self
                    .state
                    .entities
                    .actor(actor_id)
                    .ok_or(ItemUseError::ActorNotFound(actor_id))?;
                let admission = actor
                    .effects
                    .admission(&effect, &actor.attributes)
                    .map_err(|source| ItemUseError::from_effect(item.id, source))?;
                if admission == Admission::Insert {
                    reserved_slots = 1;
                }
                Some(effect)
            }
            None => None,
        };

        let skill = match &usable.ability {
            Some(skill_id) => {
                let skill = env
                    .catalog()?
                    .skill(skill_id)
                    .ok_or_else(|| {
                        ItemUseError::invalid(item.id, format!("unknown ability `{skill_id}`"))
                    })?;
                let request = SkillRequest::direct(actor_id, &skill)
                    .with_cooldown_override(usable.cooldown)
                    .with_reserved_slots(reserved_slots);
                Some(skill::execute(self.state, env, request)?)
            }
            None => None,
        };

        let effect = match effect {
            Some(effect) => Some(self.install(env, actor_id, item.id, effect)?),
            None => None,
        };

        let usable = &mut item.usable;
        if let Some(charges) = usable.charges.as_mut() {
            *charges = charges.saturating_sub(1);
        }
        let destroyed = usable.destroy_on_depleted && usable.charges == Some(0);

        debug!(
            item = %item.id,
            actor = %actor_id,
            charges = ?usable.charges,
            destroyed,
            "item used"
        );

        Ok(ItemUseOutcome {
            item: item.id,
            skill,
            effect,
            charges_left: usable.charges,
            destroyed,
        })
    }

    /// Applies an effect sourced from an item (equip, worn pouch, aura) and
    /// tags it so that [`Self::revoke_source`] can take it back.
    pub fn grant_item_effect(
        &mut self,
        env: GameEnv<'_>,
        actor: EntityId,
        item: ItemId,
        spec: &EffectSpec,
    ) -> Result<AddOutcome, ItemUseError> {
        let result = self
            .item_effect(&env, actor, item, spec)
            .and_then(|effect| self.install(&env, actor, item, effect));
        if let Err(err) = &result {
            log_failure(err, actor, &spec.effect);
        }
        result
    }

    /// Removes every effect tagged with `source`, notifying each removal.
    pub fn revoke_source(
        &mut self,
        env: GameEnv<'_>,
        actor: EntityId,
        source: &SourceRef,
    ) -> Vec<EffectInstance> {
        let Some(actor_state) = self.state.entities.actor_mut(actor) else {
            return Vec::new();
        };
        let removed = actor_state.remove_effects_by_source(source);
        for effect in &removed {
            env.notify(Notification::EffectRemoved {
                target: actor,
                effect: effect.name.clone(),
            });
        }
        removed
    }

    fn item_effect(
        &self,
        env: &GameEnv<'_>,
        owner: EntityId,
        item: ItemId,
        spec: &EffectSpec,
    ) -> Result<EffectInstance, ItemUseError> {
        let template = env
            .catalog()?
            .effect(&spec.effect)
            .ok_or_else(|| ItemUseError::invalid(item, format!("unknown effect `{}`", spec.effect)))?;
        let effect = template
            .instantiate(owner, &spec.config, &spec.state)
            .map_err(|source| ItemUseError::invalid(item, source))?;
        Ok(effect.with_source(SourceRef::Item(item)))
    }

    fn install(
        &mut self,
        env: &GameEnv<'_>,
        actor_id: EntityId,
        item: ItemId,
        effect: EffectInstance,
    ) -> Result<AddOutcome, ItemUseError> {
        let actor = self
            .state
            .entities
            .actor_mut(actor_id)
            .ok_or(ItemUseError::ActorNotFound(actor_id))?;
        let name = effect.name.clone();
        let hidden = effect.is_hidden();
        let outcome = actor
            .add_effect(effect)
            .map_err(|source| ItemUseError::from_effect(item, source))?;
        env.notify(Notification::effect_added(actor_id, &name, hidden, &outcome));
        Ok(outcome)
    }
}
