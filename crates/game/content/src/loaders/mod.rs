//! Content loaders for reading game data from files.
//!
//! RON wrapper structs (`(effects: [...])`, `(skills: [...])`, ...) keep the
//! files self-describing; TOML is used for configuration.

pub mod config;
pub mod crafting;
pub mod effects;
pub mod factory;
pub mod items;
pub mod skills;

pub use config::ConfigLoader;
pub use crafting::CraftingLoader;
pub use effects::EffectLoader;
pub use factory::ContentFactory;
pub use items::ItemLoader;
pub use skills::SkillLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
