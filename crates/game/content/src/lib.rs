//! Data-driven content definitions and loaders.
//!
//! This crate houses static game content and provides loaders for RON/TOML data files:
//! - Effect templates (data-driven via RON)
//! - Skills (data-driven via RON)
//! - Usable items (data-driven via RON)
//! - Crafting resources and recipes (data-driven via RON)
//! - Game configuration (data-driven via TOML)
//!
//! Content is consumed by the engine through [`Catalog`] and never appears in
//! game state.

pub mod catalog;
pub mod crafting;
pub mod items;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::Catalog;
pub use crafting::{CraftingCatalog, ResourceDefinition};
pub use items::ItemDefinition;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, CraftingLoader, EffectLoader, ItemLoader, SkillLoader,
};
