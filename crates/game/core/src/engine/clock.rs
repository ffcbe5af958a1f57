use crate::effect::EffectInstance;
use crate::env::{GameEnv, Notification};
use crate::state::{EntityId, Tick};

use super::GameEngine;

/// Effects that expired during one [`GameEngine::tick`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Clock value after the tick.
    pub clock: Tick,
    pub expired: Vec<(EntityId, EffectInstance)>,
}

/// Clock methods for GameEngine.
impl<'a> GameEngine<'a> {
    /// Returns the current game clock value.
    pub fn clock(&self) -> Tick {
        self.state.clock
    }

    /// Advances the clock and every actor's effects by `elapsed` units.
    ///
    /// Actors are processed in id order; each actor's registry ticks
    /// independently.
    pub fn tick(&mut self, env: GameEnv<'_>, elapsed: u64) -> TickSummary {
        let mut expired = Vec::new();
        for actor in self.state.entities.all_actors_mut() {
            let report = actor.tick_effects(elapsed);
            for effect in report.expired {
                env.notify(Notification::EffectExpired {
                    target: actor.id,
                    effect: effect.name.clone(),
                    hidden: effect.is_hidden(),
                });
                expired.push((actor.id, effect));
            }
        }

        self.state.clock += elapsed;
        TickSummary {
            clock: self.state.clock,
            expired,
        }
    }
}
