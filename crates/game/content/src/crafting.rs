//! Recipe catalog with explicit lookup caches.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use anyhow::{Result, bail};
use myelin_core::crafting::{self, CraftCategory, CraftingError, CraftingResources, Recipe};
use strum::IntoEnumIterator;
use tracing::debug;

/// A craftable resource key and its display name.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceDefinition {
    pub id: String,
    pub name: String,
}

/// Recipes indexed by category and by search keyword.
///
/// The category index is built eagerly; search results are memoized per
/// query. Both caches are dropped by [`CraftingCatalog::reload`].
#[derive(Clone, Debug, Default)]
pub struct CraftingCatalog {
    resources: BTreeMap<String, ResourceDefinition>,
    recipes: Vec<Recipe>,
    by_category: BTreeMap<CraftCategory, Vec<usize>>,
    search_cache: HashMap<String, Vec<usize>>,
}

impl CraftingCatalog {
    /// Builds the catalog. Every recipe requirement must name a known
    /// resource and every item name must be unique.
    pub fn new(resources: Vec<ResourceDefinition>, recipes: Vec<Recipe>) -> Result<Self> {
        let mut catalog = Self::default();
        catalog.reload(resources, recipes)?;
        Ok(catalog)
    }

    /// Replaces the catalog's data and rebuilds every cache. The previous
    /// data is kept when validation fails.
    pub fn reload(&mut self, resources: Vec<ResourceDefinition>, recipes: Vec<Recipe>) -> Result<()> {
        let resources: BTreeMap<String, ResourceDefinition> = resources
            .into_iter()
            .map(|resource| (resource.id.clone(), resource))
            .collect();

        let mut names = BTreeSet::new();
        for recipe in &recipes {
            if !names.insert(recipe.item.name.as_str()) {
                bail!("duplicate recipe for `{}`", recipe.item.name);
            }
            if let Some(unknown) = recipe.resources.keys().find(|key| !resources.contains_key(*key))
            {
                bail!(
                    "recipe `{}` requires unknown resource `{unknown}`",
                    recipe.item.name
                );
            }
        }

        let mut by_category: BTreeMap<CraftCategory, Vec<usize>> =
            CraftCategory::iter().map(|category| (category, Vec::new())).collect();
        for (index, recipe) in recipes.iter().enumerate() {
            by_category
                .entry(recipe.item.category)
                .or_default()
                .push(index);
        }

        self.resources = resources;
        self.recipes = recipes;
        self.by_category = by_category;
        self.search_cache.clear();
        debug!(
            resources = self.resources.len(),
            recipes = self.recipes.len(),
            "crafting catalog loaded"
        );
        Ok(())
    }

    pub fn resource(&self, id: &str) -> Option<&ResourceDefinition> {
        self.resources.get(id)
    }

    pub fn recipe(&self, item: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.item.name == item)
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn by_category(&self, category: CraftCategory) -> Vec<&Recipe> {
        self.by_category
            .get(&category)
            .map(|indices| indices.iter().map(|&index| &self.recipes[index]).collect())
            .unwrap_or_default()
    }

    /// Recipes whose item name or keywords contain `query`.
    pub fn search(&mut self, query: &str) -> Vec<&Recipe> {
        let indices = self
            .search_cache
            .entry(query.to_string())
            .or_insert_with(|| {
                self.recipes
                    .iter()
                    .enumerate()
                    .filter(|(_, recipe)| recipe.item.matches(query))
                    .map(|(index, _)| index)
                    .collect()
            })
            .clone();
        indices.into_iter().map(|index| &self.recipes[index]).collect()
    }

    /// Number of memoized search queries.
    pub fn cached_searches(&self) -> usize {
        self.search_cache.len()
    }

    /// Checks and deducts the requirements of `item`'s recipe. Returns the
    /// crafting experience earned.
    pub fn craft(&self, resources: &mut CraftingResources, item: &str) -> Result<u32, CraftingError> {
        let recipe = self.recipe(item).ok_or_else(|| CraftingError::UnknownRecipe {
            item: item.to_string(),
        })?;
        crafting::consume(resources, recipe)?;
        Ok(recipe.experience())
    }
}

#[cfg(test)]
mod tests {
    use myelin_core::{Quality, RecipeItem};

    use super::*;

    fn resources() -> Vec<ResourceDefinition> {
        ["herb", "water", "iron"]
            .into_iter()
            .map(|id| ResourceDefinition {
                id: id.into(),
                name: id.into(),
            })
            .collect()
    }

    fn recipe(name: &str, category: CraftCategory, needs: &[(&str, u32)]) -> Recipe {
        Recipe {
            item: RecipeItem {
                name: name.into(),
                category,
                quality: Quality::Common,
                keywords: vec![],
            },
            resources: needs
                .iter()
                .map(|(key, amount)| (key.to_string(), *amount))
                .collect(),
        }
    }

    fn catalog() -> CraftingCatalog {
        CraftingCatalog::new(
            resources(),
            vec![
                recipe("healing potion", CraftCategory::Consumable, &[("herb", 3), ("water", 2)]),
                recipe("iron sword", CraftCategory::Weapon, &[("iron", 6)]),
                recipe("iron helm", CraftCategory::Armor, &[("iron", 4)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn categories_are_indexed() {
        let catalog = catalog();
        assert_eq!(catalog.by_category(CraftCategory::Weapon).len(), 1);
        assert!(catalog.by_category(CraftCategory::Container).is_empty());
    }

    #[test]
    fn search_results_are_cached_until_reload() {
        let mut catalog = catalog();
        let names: Vec<_> = catalog
            .search("iron")
            .into_iter()
            .map(|recipe| recipe.item.name.clone())
            .collect();
        assert_eq!(names, vec!["iron sword", "iron helm"]);
        catalog.search("potion");
        assert_eq!(catalog.cached_searches(), 2);

        catalog.reload(resources(), vec![]).unwrap();
        assert_eq!(catalog.cached_searches(), 0);
        assert!(catalog.search("iron").is_empty());
    }

    #[test]
    fn unknown_resource_is_rejected_and_data_kept() {
        let mut catalog = catalog();
        let bad = recipe("gold ring", CraftCategory::Armor, &[("gold", 1)]);
        assert!(catalog.reload(resources(), vec![bad]).is_err());
        assert_eq!(catalog.recipes().len(), 3);
    }

    #[test]
    fn craft_consumes_and_grants_experience() {
        let catalog = catalog();
        let mut purse = CraftingResources::new();
        purse.add("iron", 7);

        assert_eq!(catalog.craft(&mut purse, "iron sword"), Ok(6));
        assert_eq!(purse.get("iron"), 1);
        assert_eq!(
            catalog.craft(&mut purse, "iron helm"),
            Err(CraftingError::MissingResource {
                resource: "iron".into(),
                difference: 3
            })
        );
        assert!(matches!(
            catalog.craft(&mut purse, "mithril axe"),
            Err(CraftingError::UnknownRecipe { .. })
        ));
    }
}
