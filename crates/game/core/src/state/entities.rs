use std::collections::BTreeMap;

use super::actor::ActorState;
use super::common::EntityId;

/// Every actor tracked by the engine, keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntitiesState {
    actors: BTreeMap<EntityId, ActorState>,
}

impl EntitiesState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an actor, returning the one previously stored under its id.
    pub fn insert(&mut self, actor: ActorState) -> Option<ActorState> {
        self.actors.insert(actor.id, actor)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<ActorState> {
        self.actors.remove(&id)
    }

    pub fn actor(&self, id: EntityId) -> Option<&ActorState> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: EntityId) -> Option<&mut ActorState> {
        self.actors.get_mut(&id)
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.actors.keys().copied().collect()
    }

    pub fn all_actors(&self) -> impl Iterator<Item = &ActorState> {
        self.actors.values()
    }

    pub fn all_actors_mut(&mut self) -> impl Iterator<Item = &mut ActorState> {
        self.actors.values_mut()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// The actor followed by every party member sharing its room.
    ///
    /// An actor without a party or room only targets itself.
    pub fn party_in_room(&self, id: EntityId) -> Vec<EntityId> {
        let Some(actor) = self.actors.get(&id) else {
            return Vec::new();
        };

        let mut targets = vec![id];
        if let (Some(party), Some(room)) = (actor.party, actor.room) {
            targets.extend(
                self.actors
                    .values()
                    .filter(|ally| ally.id != id)
                    .filter(|ally| ally.party == Some(party) && ally.room == Some(room))
                    .map(|ally| ally.id),
            );
        }
        targets
    }
}
