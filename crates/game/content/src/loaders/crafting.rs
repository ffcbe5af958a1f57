//! Crafting resource and recipe loaders.

use std::path::Path;

use myelin_core::Recipe;
use serde::{Deserialize, Serialize};

use crate::crafting::ResourceDefinition;
use crate::loaders::{LoadResult, read_file};

/// Resource file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceFile {
    pub resources: Vec<ResourceDefinition>,
}

/// Recipe file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeFile {
    pub recipes: Vec<Recipe>,
}

/// Loader for crafting data from RON files.
pub struct CraftingLoader;

impl CraftingLoader {
    pub fn load_resources(path: &Path) -> LoadResult<Vec<ResourceDefinition>> {
        let content = read_file(path)?;
        let file: ResourceFile = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse crafting resources RON: {}", e))?;
        Ok(file.resources)
    }

    pub fn load_recipes(path: &Path) -> LoadResult<Vec<Recipe>> {
        let content = read_file(path)?;
        Self::parse_recipes(&content)
    }

    pub fn parse_recipes(content: &str) -> LoadResult<Vec<Recipe>> {
        let file: RecipeFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse recipes RON: {}", e))?;
        Ok(file.recipes)
    }
}

#[cfg(test)]
mod tests {
    use myelin_core::{CraftCategory, Quality};

    use super::*;

    #[test]
    fn recipe_quality_defaults_to_common() {
        let recipes = CraftingLoader::parse_recipes(
            r#"(recipes: [
                (
                    item: (name: "iron sword", category: Weapon),
                    resources: {"iron": 6},
                ),
            ])"#,
        )
        .unwrap();

        assert_eq!(recipes[0].item.category, CraftCategory::Weapon);
        assert_eq!(recipes[0].item.quality, Quality::Common);
        assert_eq!(recipes[0].experience(), 6);
    }
}
