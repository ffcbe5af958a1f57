//! Per-actor collection of active effects.
//!
//! The registry is the only writer of attribute deltas. Every mutation of the
//! effect set goes through [`EffectRegistry::add`], [`EffectRegistry::remove`]
//! or [`EffectRegistry::tick`], which keep the following invariant:
//!
//! ```text
//! store.delta(attr) == Σ contribution(effect) for every active effect on attr
//! ```

use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::state::SourceRef;
use crate::stats::AttributeStore;

use super::error::EffectError;
use super::instance::{EffectId, EffectInstance, EffectPhase};
use super::kinds::{EffectFlags, EffectKind, EffectType};

/// Result of a successful [`EffectRegistry::add`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// Inserted as a new instance.
    Added(EffectId),
    /// Merged into an existing instance of the same name.
    Stacked { id: EffectId, stacks: u32 },
    /// Took the place of an existing instance of the same name.
    Replaced {
        removed: EffectInstance,
        id: EffectId,
    },
}

impl AddOutcome {
    /// Id of the instance that now carries the effect.
    pub fn id(&self) -> EffectId {
        match self {
            Self::Added(id) | Self::Stacked { id, .. } | Self::Replaced { id, .. } => *id,
        }
    }
}

/// How an incoming effect would be admitted. Indices refer to the registry's
/// current order and are only valid until the next mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    Insert,
    Stack(usize),
    Replace(usize),
}

/// Effects removed by a [`EffectRegistry::tick`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub expired: Vec<EffectInstance>,
}

/// Persisted form of an [`EffectRegistry`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegistrySnapshot {
    pub next_id: u64,
    pub effects: Vec<EffectInstance>,
}

/// Ordered collection of the effects active on one actor.
///
/// Insertion order is preserved and used for ticking and listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectRegistry {
    effects: Vec<EffectInstance>,
    next_id: u64,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides how `effect` would be admitted without changing anything.
    ///
    /// - same name, stackable, below `max_stacks`: stacks are merged
    /// - same name otherwise: refused, unless the incoming effect is
    ///   configured with `replace`
    /// - no match: inserted, if the registry has room
    pub fn admission(
        &self,
        effect: &EffectInstance,
        store: &AttributeStore,
    ) -> Result<Admission, EffectError> {
        if effect.phase() == EffectPhase::Deactivated {
            return Err(EffectError::Deactivated {
                name: effect.name.clone(),
            });
        }
        if let Some(attribute) = effect.kind.attribute()
            && !store.contains(attribute)
        {
            return Err(EffectError::UnknownAttribute {
                effect: effect.name.clone(),
                attribute: attribute.to_string(),
            });
        }

        let Some(index) = self.effects.iter().position(|e| e.name == effect.name) else {
            if self.effects.len() >= GameConfig::MAX_EFFECTS {
                return Err(EffectError::RegistryFull {
                    capacity: GameConfig::MAX_EFFECTS,
                });
            }
            return Ok(Admission::Insert);
        };

        let existing = &self.effects[index];
        let max_stacks = existing.config.max_stacks;
        if existing.config.is_stackable() && existing.state.stacks < max_stacks {
            Ok(Admission::Stack(index))
        } else if effect.config.replace {
            Ok(Admission::Replace(index))
        } else if existing.config.is_stackable() {
            Err(EffectError::StackLimitReached {
                name: effect.name.clone(),
                max_stacks,
            })
        } else {
            Err(EffectError::AlreadyActive {
                name: effect.name.clone(),
            })
        }
    }

    /// Checks that `incoming` could all be added, keeping `reserved` further
    /// slots free. Each effect is admitted against the current contents, so
    /// the batch must not contain two effects with the same name.
    pub fn admit_batch(
        &self,
        incoming: &[&EffectInstance],
        reserved: usize,
        store: &AttributeStore,
    ) -> Result<(), EffectError> {
        let mut inserts = reserved;
        for effect in incoming {
            if self.admission(effect, store)? == Admission::Insert {
                inserts += 1;
            }
        }
        if self.effects.len() + inserts > GameConfig::MAX_EFFECTS {
            return Err(EffectError::RegistryFull {
                capacity: GameConfig::MAX_EFFECTS,
            });
        }
        Ok(())
    }

    /// Adds an effect according to the stacking policy described on
    /// [`Self::admission`]. Stacking refreshes the remaining time to the
    /// incoming duration.
    ///
    /// Nothing is changed when an error is returned.
    pub fn add(
        &mut self,
        mut effect: EffectInstance,
        store: &mut AttributeStore,
    ) -> Result<AddOutcome, EffectError> {
        let admission = self.admission(&effect, store).inspect_err(|err| {
            if err.is_refusal() {
                warn!(effect = %effect.name, owner = %effect.owner, %err, "effect refused");
            }
        })?;

        let replaced = match admission {
            Admission::Stack(index) => {
                let existing = &mut self.effects[index];
                let stacks = existing
                    .state
                    .stacks
                    .saturating_add(effect.state.stacks)
                    .min(existing.config.max_stacks);
                existing.restack(stacks, store);
                existing.duration = effect.duration;
                existing.remaining = effect.duration.initial_remaining();
                debug!(effect = %existing.name, stacks, "effect stacked");
                return Ok(AddOutcome::Stacked {
                    id: existing.id,
                    stacks,
                });
            }
            Admission::Replace(index) => {
                let mut removed = self.effects.remove(index);
                removed.deactivate(store);
                Some(removed)
            }
            Admission::Insert => None,
        };

        self.next_id += 1;
        let id = EffectId(self.next_id);
        effect.id = id;
        effect.activate(store);
        debug!(effect = %effect.name, %id, owner = %effect.owner, "effect added");
        self.effects.push(effect);

        Ok(match replaced {
            Some(removed) => AddOutcome::Replaced { removed, id },
            None => AddOutcome::Added(id),
        })
    }

    /// Deactivates and drops an effect. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: EffectId, store: &mut AttributeStore) -> Option<EffectInstance> {
        let index = self.effects.iter().position(|e| e.id == id)?;
        let mut effect = self.effects.remove(index);
        effect.deactivate(store);
        debug!(effect = %effect.name, %id, "effect removed");
        Some(effect)
    }

    /// Removes every effect whose configured source matches.
    pub fn remove_by_source(
        &mut self,
        source: &SourceRef,
        store: &mut AttributeStore,
    ) -> Vec<EffectInstance> {
        let ids: Vec<EffectId> = self
            .effects
            .iter()
            .filter(|e| e.config.source.as_ref() == Some(source))
            .map(|e| e.id)
            .collect();

        ids.into_iter()
            .filter_map(|id| self.remove(id, store))
            .collect()
    }

    /// Advances every effect by `elapsed` game-time units.
    ///
    /// Deltas are cleared first and rebuilt by the `update` hook of every
    /// effect. Expired effects are removed after all updates have run.
    pub fn tick(&mut self, elapsed: u64, store: &mut AttributeStore) -> TickReport {
        store.clear_deltas();

        let snapshot: Vec<EffectId> = self.effects.iter().map(|e| e.id).collect();
        let mut expiring = Vec::new();
        for id in snapshot {
            let Some(effect) = self.effects.iter_mut().find(|e| e.id == id) else {
                continue;
            };
            if effect.duration.is_finite() {
                effect.remaining = effect.remaining.saturating_sub(elapsed);
            }
            effect.update(store);
            if effect.duration.is_finite() && effect.remaining == 0 {
                expiring.push(id);
            }
        }

        let expired = expiring
            .into_iter()
            .filter_map(|id| self.remove(id, store))
            .collect();
        TickReport { expired }
    }

    pub fn get(&self, id: EffectId) -> Option<&EffectInstance> {
        self.effects.iter().find(|e| e.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&EffectInstance> {
        self.effects.iter().find(|e| e.name == name)
    }

    pub fn filter_by_type(&self, effect_type: EffectType) -> impl Iterator<Item = &EffectInstance> {
        self.effects
            .iter()
            .filter(move |e| e.effect_type == effect_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectInstance> {
        self.effects.iter()
    }

    /// Effects shown to the player.
    pub fn visible(&self) -> impl Iterator<Item = &EffectInstance> {
        self.effects.iter().filter(|e| !e.is_hidden())
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Active cooldown for a skill, if any time is left on it.
    pub fn cooldown_for(&self, skill: &str) -> Option<&EffectInstance> {
        self.effects.iter().find(|e| {
            matches!(&e.kind, EffectKind::Cooldown { skill: s } if s == skill) && e.remaining > 0
        })
    }

    /// Returns true if `skill` has installed its passive effect.
    pub fn has_passive(&self, skill: &str) -> bool {
        self.effects.iter().any(|e| match &e.kind {
            EffectKind::PassiveSkill { skill: s } => s == skill,
            _ => {
                e.flags.contains(EffectFlags::PASSIVE)
                    && matches!(&e.config.source, Some(SourceRef::Skill(s)) if s == skill)
            }
        })
    }

    /// Combined incoming-damage multiplier for an attribute, in percent.
    ///
    /// Multipliers compound per stack: two 200% stacks yield 400%.
    pub fn incoming_damage_percent(&self, attribute: &str) -> i32 {
        let percent = self
            .effects
            .iter()
            .filter_map(|e| match &e.kind {
                EffectKind::DamageTaken {
                    attribute: target,
                    percent,
                } if target == attribute => Some((i64::from(*percent), e.state.stacks)),
                _ => None,
            })
            .fold(100_i64, |acc, (percent, stacks)| {
                (0..stacks).fold(acc, |acc, _| acc.saturating_mul(percent) / 100)
            });
        i32::try_from(percent).unwrap_or(i32::MAX)
    }

    pub fn serialize(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            next_id: self.next_id,
            effects: self.effects.clone(),
        }
    }

    /// Restores a registry and re-derives every delta of `store` from the
    /// restored effects. Effects targeting attributes the store lacks are
    /// dropped.
    pub fn deserialize(snapshot: RegistrySnapshot, store: &mut AttributeStore) -> Self {
        store.clear_deltas();

        let mut next_id = snapshot.next_id;
        let mut effects = Vec::with_capacity(snapshot.effects.len());
        for mut effect in snapshot.effects {
            if let Some(attribute) = effect.kind.attribute()
                && !store.contains(attribute)
            {
                warn!(effect = %effect.name, attribute, "dropping effect with unknown attribute");
                continue;
            }
            next_id = next_id.max(effect.id.0);
            effect.restore(store);
            effects.push(effect);
        }

        Self { effects, next_id }
    }
}
