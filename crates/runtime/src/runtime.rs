//! High-level runtime orchestrator.
//!
//! The runtime owns the game state, the content catalogs and the notification
//! channel, and exposes a builder-based API for clients to drive the
//! simulation. A tokio interval drives the tick loop; engine operations never
//! block or await.

use std::collections::BTreeMap;
use std::future::Future;

use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use myelin_content::{Catalog, CraftingCatalog};
use myelin_core::{
    ActorState, Env, EntityId, GameEngine, GameEnv, GameState, ItemId, ItemUseOutcome,
    Notification, PcgRng, SkillOutcome, SourceRef, TickSummary, UsableItem,
};

use crate::api::{Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{ChannelSink, NotificationReceiver};
use crate::messages::{self, MessageContext};
use crate::repository::ActorRepository;

/// An item instance tracked by the runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemInstance {
    pub id: ItemId,
    /// Definition id in the catalog.
    pub definition: String,
    pub name: String,
    /// Usable view with its remaining charges.
    pub usable: Option<UsableItem>,
}

/// Main runtime that orchestrates the simulation.
pub struct Runtime {
    config: RuntimeConfig,
    state: GameState,
    catalog: Catalog,
    crafting: CraftingCatalog,
    rng: PcgRng,
    sink: ChannelSink,
    repository: Option<Box<dyn ActorRepository>>,
    items: BTreeMap<ItemId, ItemInstance>,
    next_item: u64,
}

/// Borrows the engine and its environment from disjoint runtime fields.
macro_rules! engine {
    ($runtime:expr) => {{
        let env: GameEnv<'_> =
            Env::with_all(&$runtime.catalog, &$runtime.rng, &$runtime.sink).as_game_env();
        (GameEngine::new(&mut $runtime.state), env)
    }};
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn crafting(&self) -> &CraftingCatalog {
        &self.crafting
    }

    pub fn crafting_mut(&mut self) -> &mut CraftingCatalog {
        &mut self.crafting
    }

    pub fn actor(&self, id: EntityId) -> Result<&ActorState> {
        self.state
            .entities
            .actor(id)
            .ok_or(RuntimeError::ActorNotFound(id))
    }

    /// Adds an actor and activates the given passive skills for it.
    pub fn add_actor(&mut self, actor: ActorState, passives: &[&str]) -> Result<()> {
        let id = actor.id;
        self.state.entities.insert(actor);
        for skill in passives {
            self.activate_passive(id, skill)?;
        }
        Ok(())
    }

    /// Advances the clock by one configured tick.
    pub fn tick(&mut self) -> TickSummary {
        let elapsed = self.config.game_config.tick_length;
        let (mut engine, env) = engine!(self);
        engine.tick(env, elapsed)
    }

    /// Direct skill invocation (player command).
    pub fn use_skill(&mut self, actor: EntityId, skill: &str) -> Result<SkillOutcome> {
        let (mut engine, env) = engine!(self);
        Ok(engine.execute_skill(env, actor, skill)?)
    }

    /// Spends the actor's skill points on a skill.
    pub fn learn_skill(&mut self, actor: EntityId, skill: &str) -> Result<()> {
        let (mut engine, env) = engine!(self);
        Ok(engine.learn_skill(env, actor, skill)?)
    }

    pub fn activate_passive(&mut self, actor: EntityId, skill: &str) -> Result<SkillOutcome> {
        let (mut engine, env) = engine!(self);
        Ok(engine.activate_passive(env, actor, skill)?)
    }

    pub fn apply_damage(&mut self, target: EntityId, attribute: &str, amount: i32) -> Result<i32> {
        let (mut engine, _) = engine!(self);
        Ok(engine.apply_damage(target, attribute, amount)?)
    }

    /// Creates an item instance from its catalog definition.
    pub fn create_item(&mut self, definition: &str) -> Result<ItemId> {
        let def = self
            .catalog
            .item(definition)
            .ok_or_else(|| RuntimeError::UnknownItem(definition.to_string()))?;

        self.next_item += 1;
        let id = ItemId(self.next_item);
        let instance = ItemInstance {
            id,
            definition: def.id.clone(),
            name: def.name.clone(),
            usable: def.instantiate(id),
        };
        self.items.insert(id, instance);
        debug!(item = %id, definition, "item created");
        Ok(id)
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemInstance> {
        self.items.get(&id)
    }

    /// Uses an item. Destroyed items are dropped from the runtime.
    pub fn use_item(&mut self, actor: EntityId, item: ItemId) -> Result<ItemUseOutcome> {
        let instance = self
            .items
            .get(&item)
            .ok_or(RuntimeError::ItemNotFound(item))?;
        let mut usable = instance.usable.clone().unwrap_or_else(|| {
            UsableItem::new(item, instance.name.clone(), Default::default())
        });

        let (mut engine, env) = engine!(self);
        let outcome = engine.use_item(env, actor, &mut usable)?;

        if outcome.destroyed {
            self.items.remove(&item);
        } else if let Some(instance) = self.items.get_mut(&item) {
            instance.usable = Some(usable);
        }
        Ok(outcome)
    }

    /// Applies the item's worn effect to its new holder, if it has one.
    pub fn pick_up(&mut self, actor: EntityId, item: ItemId) -> Result<()> {
        let definition = &self
            .items
            .get(&item)
            .ok_or(RuntimeError::ItemNotFound(item))?
            .definition;
        let Some(spec) = self
            .catalog
            .item(definition)
            .and_then(|def| def.worn.clone())
        else {
            return Ok(());
        };

        let (mut engine, env) = engine!(self);
        engine.grant_item_effect(env, actor, item, &spec)?;
        Ok(())
    }

    /// Revokes every effect the item granted to `actor`.
    pub fn drop_item(&mut self, actor: EntityId, item: ItemId) -> usize {
        let (mut engine, env) = engine!(self);
        engine
            .revoke_source(env, actor, &SourceRef::Item(item))
            .len()
    }

    /// Crafts `item` from the actor's resources and returns the experience
    /// earned.
    pub fn craft(&mut self, actor: EntityId, item: &str) -> Result<u32> {
        let actor_state = self
            .state
            .entities
            .actor_mut(actor)
            .ok_or(RuntimeError::ActorNotFound(actor))?;
        let experience = self.crafting.craft(&mut actor_state.resources, item)?;
        info!(%actor, item, experience, "item crafted");
        Ok(experience)
    }

    /// The `effects` listing of an actor.
    pub fn effects_view(&self, actor: EntityId) -> Result<Vec<String>> {
        Ok(messages::effects_listing(self.actor(actor)?))
    }

    /// Renders a notification for its recipient.
    pub fn render(&self, notification: &Notification) -> Option<String> {
        messages::render(
            notification,
            MessageContext {
                entities: &self.state.entities,
            },
        )
    }

    /// Persists one actor. A runtime without a repository saves nothing.
    pub fn save_actor(&self, actor: EntityId) -> Result<()> {
        let Some(repository) = &self.repository else {
            return Ok(());
        };
        repository.save(&self.actor(actor)?.record())
    }

    pub fn save_all(&self) -> Result<usize> {
        let Some(repository) = &self.repository else {
            return Ok(0);
        };
        let mut saved = 0;
        for actor in self.state.entities.all_actors() {
            repository.save(&actor.record())?;
            saved += 1;
        }
        info!(saved, "actors saved");
        Ok(saved)
    }

    /// Restores an actor from the repository, replacing the in-memory one.
    /// Returns false when nothing is stored under `id`.
    pub fn load_actor(&mut self, id: EntityId) -> Result<bool> {
        let Some(repository) = &self.repository else {
            return Ok(false);
        };
        let Some(record) = repository.load(id)? else {
            return Ok(false);
        };
        self.state.entities.insert(ActorState::from_record(record));
        debug!(actor = %id, "actor restored");
        Ok(true)
    }

    /// Runs the tick loop until `max_ticks` is reached (or forever).
    pub async fn run(&mut self) -> u64 {
        self.run_until(std::future::pending()).await
    }

    /// Runs the tick loop until `shutdown` resolves or `max_ticks` is
    /// reached. Returns the number of ticks run.
    pub async fn run_until(&mut self, shutdown: impl Future<Output = ()>) -> u64 {
        self.run_with(shutdown, |_, _| {}).await
    }

    /// Like [`Runtime::run_until`], calling `observer` after every tick.
    pub async fn run_with<F>(&mut self, shutdown: impl Future<Output = ()>, mut observer: F) -> u64
    where
        F: FnMut(&Runtime, &TickSummary),
    {
        let mut interval = time::interval(self.config.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut ticks = 0;
        while self.config.max_ticks.is_none_or(|max| ticks < max) {
            tokio::select! {
                _ = &mut shutdown => {
                    info!(ticks, "shutdown requested");
                    break;
                }
                _ = interval.tick() => {
                    let summary = self.tick();
                    ticks += 1;
                    if !summary.expired.is_empty() {
                        debug!(clock = %summary.clock, expired = summary.expired.len(), "effects expired");
                    }
                    observer(self, &summary);
                }
            }
        }
        ticks
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<GameState>,
    catalog: Option<Catalog>,
    crafting: Option<CraftingCatalog>,
    repository: Option<Box<dyn ActorRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            catalog: None,
            crafting: None,
            repository: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide initial game state
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set required content catalog
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn crafting(mut self, crafting: CraftingCatalog) -> Self {
        self.crafting = Some(crafting);
        self
    }

    pub fn repository(mut self, repository: impl ActorRepository + 'static) -> Self {
        self.repository = Some(Box::new(repository));
        self
    }

    /// Build the runtime and the receiving end of its notification channel.
    pub fn build(self) -> Result<(Runtime, NotificationReceiver)> {
        let catalog = self.catalog.ok_or(RuntimeError::MissingCatalog)?;
        let state = self
            .state
            .unwrap_or_else(|| GameState::with_seed(self.config.game_seed));
        if self.repository.is_none() {
            warn!("no actor repository configured; saves are disabled");
        }

        let (sink, receiver) = ChannelSink::channel();
        let runtime = Runtime {
            config: self.config,
            state,
            catalog,
            crafting: self.crafting.unwrap_or_default(),
            rng: PcgRng,
            sink,
            repository: self.repository,
            items: BTreeMap::new(),
            next_item: 0,
        };
        Ok((runtime, receiver))
    }
}
