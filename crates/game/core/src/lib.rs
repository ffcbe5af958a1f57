//! Deterministic attribute, effect and skill rules shared across clients.
//!
//! `myelin-core` defines the canonical rules (attributes, effects, skill
//! gating, item use, crafting) and exposes pure APIs that can be reused by
//! both the runtime and offline tools. All state mutation flows through
//! [`engine::GameEngine`], and supporting crates depend on the types
//! re-exported here.
pub mod config;
pub mod crafting;
pub mod effect;
pub mod engine;
pub mod env;
pub mod error;
pub mod skill;
pub mod state;
pub mod stats;

pub use config::GameConfig;
pub use crafting::{CraftCategory, CraftingError, CraftingResources, Quality, Recipe, RecipeItem};
pub use effect::{
    AddOutcome, EffectDuration, EffectError, EffectFlags, EffectId, EffectInstance, EffectKind,
    EffectRegistry, EffectSpec, EffectTemplate, EffectType, OverrideValue, Overrides,
};
pub use engine::{GameEngine, ItemUseError, ItemUseOutcome, TickSummary};
pub use env::{
    CatalogOracle, Env, GameEnv, MemorySink, Notification, NotificationSink, OracleError, PcgRng,
    RngOracle, UsableBehavior, UsableItem,
};
pub use error::{ErrorSeverity, GameError};
pub use skill::{
    Invocation, Requirement, ResourceCost, Skill, SkillBehavior, SkillError, SkillFlags,
    SkillInfo, SkillOutcome, SkillRequest, SkillRequirements, SkillResult, SkillType,
    UserFailure,
};
pub use state::{
    ActorRecord, ActorState, EntitiesState, EntityId, GameState, ItemId, PartyId, RoomId,
    SourceRef, Tick,
};
pub use stats::{Attribute, AttributeError, AttributeStore};
