//! Actor state: identity, location markers, attributes and effects.

use std::collections::{BTreeMap, BTreeSet};

use crate::crafting::CraftingResources;
use crate::effect::{
    AddOutcome, EffectError, EffectId, EffectInstance, EffectRegistry, RegistrySnapshot, TickReport,
};
use crate::stats::{AttributeRecord, AttributeStore};

use super::common::{EntityId, PartyId, RoomId, SourceRef};

/// Complete state of one actor.
///
/// # Invariants
///
/// - `attributes` deltas are written only through `effects`
/// - `room` and `party` are opaque markers used for co-location checks
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorState {
    pub id: EntityId,
    pub name: String,
    pub level: u32,
    pub is_npc: bool,
    pub room: Option<RoomId>,
    pub party: Option<PartyId>,
    pub attributes: AttributeStore,
    pub effects: EffectRegistry,
    pub resources: CraftingResources,
    /// Unspent points for learning skills.
    pub skill_points: u32,
    /// Skills learned by spending skill points.
    pub skills: BTreeSet<String>,
}

impl ActorState {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            level: 1,
            is_npc: false,
            room: None,
            party: None,
            attributes: AttributeStore::new(),
            effects: EffectRegistry::new(),
            resources: CraftingResources::new(),
            skill_points: 0,
            skills: BTreeSet::new(),
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn in_room(mut self, room: RoomId) -> Self {
        self.room = Some(room);
        self
    }

    pub fn in_party(mut self, party: PartyId) -> Self {
        self.party = Some(party);
        self
    }

    pub fn with_skill_points(mut self, points: u32) -> Self {
        self.skill_points = points;
        self
    }

    pub fn knows(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }

    pub fn npc(mut self) -> Self {
        self.is_npc = true;
        self
    }

    /// Quick check if the actor still has health left.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.attributes.get("health").is_ok_and(|health| health > 0)
    }

    pub fn add_effect(&mut self, effect: EffectInstance) -> Result<AddOutcome, EffectError> {
        self.effects.add(effect, &mut self.attributes)
    }

    pub fn remove_effect(&mut self, id: EffectId) -> Option<EffectInstance> {
        self.effects.remove(id, &mut self.attributes)
    }

    pub fn remove_effects_by_source(&mut self, source: &SourceRef) -> Vec<EffectInstance> {
        self.effects.remove_by_source(source, &mut self.attributes)
    }

    pub fn tick_effects(&mut self, elapsed: u64) -> TickReport {
        self.effects.tick(elapsed, &mut self.attributes)
    }

    pub fn record(&self) -> ActorRecord {
        ActorRecord {
            id: self.id,
            name: self.name.clone(),
            level: self.level,
            is_npc: self.is_npc,
            room: self.room,
            party: self.party,
            attributes: self.attributes.serialize(),
            effects: self.effects.serialize(),
            resources: self.resources.clone(),
            skill_points: self.skill_points,
            skills: self.skills.clone(),
        }
    }

    /// Restores an actor. Attribute deltas are re-derived from the saved
    /// effects rather than trusted from the record.
    pub fn from_record(record: ActorRecord) -> Self {
        let mut attributes = AttributeStore::deserialize(record.attributes);
        let effects = EffectRegistry::deserialize(record.effects, &mut attributes);
        Self {
            id: record.id,
            name: record.name,
            level: record.level,
            is_npc: record.is_npc,
            room: record.room,
            party: record.party,
            attributes,
            effects,
            resources: record.resources,
            skill_points: record.skill_points,
            skills: record.skills,
        }
    }
}

/// Persisted form of an [`ActorState`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorRecord {
    pub id: EntityId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_npc: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub room: Option<RoomId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub party: Option<PartyId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: BTreeMap<String, AttributeRecord>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: RegistrySnapshot,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resources: CraftingResources,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skill_points: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: BTreeSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{EffectDuration, EffectKind, EffectType};
    use crate::state::ItemId;

    #[test]
    fn record_round_trip_rederives_deltas() {
        let mut actor = ActorState::new(EntityId(3), "Mira")
            .with_level(4)
            .with_skill_points(2);
        actor.skills.insert("mend".into());
        actor
            .add_effect(
                EffectInstance::new(
                    "alms",
                    "Alms Pouch",
                    EffectType::Resource,
                    EffectKind::Modifier {
                        attribute: "willpower".into(),
                        amount: 4,
                    },
                    EffectDuration::Infinite,
                    actor.id,
                )
                .with_source(SourceRef::Item(ItemId(9))),
            )
            .unwrap();
        actor.attributes.adjust_base("health", -30).unwrap();

        let restored = ActorState::from_record(actor.record());

        assert_eq!(restored, actor);
        assert_eq!(restored.attributes.get("willpower"), Ok(14));
        assert_eq!(restored.attributes.get("health"), Ok(70));
    }

    #[test]
    fn dropping_source_reverts_buff() {
        let mut actor = ActorState::new(EntityId(1), "Mira");
        let pouch = SourceRef::Item(ItemId(2));
        actor
            .add_effect(
                EffectInstance::new(
                    "alms",
                    "Alms Pouch",
                    EffectType::Resource,
                    EffectKind::Modifier {
                        attribute: "focus".into(),
                        amount: 15,
                    },
                    EffectDuration::Infinite,
                    actor.id,
                )
                .with_source(pouch.clone()),
            )
            .unwrap();
        assert_eq!(actor.attributes.get("focus"), Ok(115));

        assert_eq!(actor.remove_effects_by_source(&pouch).len(), 1);
        assert_eq!(actor.attributes.get("focus"), Ok(100));
    }
}
