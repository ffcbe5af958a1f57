//! Authoritative game state representation.
//!
//! This module owns the actors, the game clock and the RNG bookkeeping.
//! Runtime layers clone or query this state but mutate it exclusively
//! through [`crate::engine::GameEngine`].
mod actor;
mod common;
mod entities;

pub use actor::{ActorRecord, ActorState};
pub use common::{EntityId, ItemId, PartyId, RoomId, SourceRef, Tick};
pub use entities::EntitiesState;

/// Canonical snapshot of the game state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameState {
    /// RNG seed for deterministic random generation.
    ///
    /// Set once at game initialization and never modified. Combined with
    /// `nonce` to derive a unique seed for each random event.
    pub game_seed: u64,

    /// Incremented after every successful skill execution.
    pub nonce: u64,

    /// Game time elapsed since the state was created.
    pub clock: Tick,

    pub entities: EntitiesState,
}

impl GameState {
    pub fn with_seed(game_seed: u64) -> Self {
        Self {
            game_seed,
            ..Self::default()
        }
    }

    pub fn with_actor(mut self, actor: ActorState) -> Self {
        self.entities.insert(actor);
        self
    }
}
