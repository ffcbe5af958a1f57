//! Content factory for building catalogs from data files.

use std::path::{Path, PathBuf};

use myelin_core::{EffectTemplate, GameConfig, Recipe, Skill};
use tracing::info;

use crate::catalog::Catalog;
use crate::crafting::{CraftingCatalog, ResourceDefinition};
use crate::items::ItemDefinition;
use crate::loaders::{
    ConfigLoader, CraftingLoader, EffectLoader, ItemLoader, LoadResult, SkillLoader,
};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── effects.ron
/// ├── skills.ron
/// ├── items.ron
/// ├── resources.ron
/// └── recipes.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load effect templates from `effects.ron`.
    pub fn load_effects(&self) -> LoadResult<Vec<EffectTemplate>> {
        EffectLoader::load(&self.data_dir.join("effects.ron"))
    }

    /// Load skills from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<Vec<Skill>> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemDefinition>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load crafting resources from `resources.ron`.
    pub fn load_resources(&self) -> LoadResult<Vec<ResourceDefinition>> {
        CraftingLoader::load_resources(&self.data_dir.join("resources.ron"))
    }

    /// Load recipes from `recipes.ron`.
    pub fn load_recipes(&self) -> LoadResult<Vec<Recipe>> {
        CraftingLoader::load_recipes(&self.data_dir.join("recipes.ron"))
    }

    /// Loads and validates effects, skills and items as one catalog.
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        let catalog = Catalog::from_parts(
            self.load_effects()?,
            self.load_skills()?,
            self.load_items()?,
        )
        .map_err(|e| e.context(format!("Invalid content in {}", self.data_dir.display())))?;
        info!(data_dir = %self.data_dir.display(), "content catalog loaded");
        Ok(catalog)
    }

    /// Loads resources and recipes as one crafting catalog.
    pub fn load_crafting(&self) -> LoadResult<CraftingCatalog> {
        CraftingCatalog::new(self.load_resources()?, self.load_recipes()?)
    }

    /// Re-reads crafting data into an existing catalog, dropping its caches.
    pub fn reload_crafting(&self, catalog: &mut CraftingCatalog) -> LoadResult<()> {
        catalog.reload(self.load_resources()?, self.load_recipes()?)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let factory = ContentFactory::new("/nonexistent/myelin");
        let err = factory.load_skills().unwrap_err();
        assert!(err.to_string().contains("skills.ron"));
    }
}
