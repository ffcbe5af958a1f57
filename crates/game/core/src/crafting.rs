//! Crafting requirements and experience.
//!
//! Recipes map resource keys to required amounts. Actors carry a
//! [`CraftingResources`] purse; the checks here never touch item instances.

use std::collections::BTreeMap;

use crate::error::{ErrorSeverity, GameError};

/// Item quality tier. Drives crafting experience.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Quality {
    Poor,
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
}

impl Quality {
    /// Experience multiplier for crafting an item of this quality.
    pub const fn weight(self) -> u32 {
        match self {
            Self::Poor => 1,
            Self::Common => 3,
            Self::Uncommon => 5,
            Self::Rare => 8,
            Self::Epic => 10,
        }
    }
}

/// Category a crafted item is listed under.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CraftCategory {
    Consumable,
    Weapon,
    Armor,
    Container,
}

/// Item produced by a recipe.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecipeItem {
    pub name: String,
    pub category: CraftCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub quality: Quality,
    #[cfg_attr(feature = "serde", serde(default))]
    pub keywords: Vec<String>,
}

impl RecipeItem {
    /// Substring match on the name or any keyword.
    pub fn matches(&self, query: &str) -> bool {
        self.name.contains(query) || self.keywords.iter().any(|keyword| keyword.contains(query))
    }
}

/// A crafting recipe: resource key → required amount.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recipe {
    pub item: RecipeItem,
    pub resources: BTreeMap<String, u32>,
}

impl Recipe {
    pub fn total_required(&self) -> u32 {
        self.resources.values().copied().fold(0, u32::saturating_add)
    }

    /// Experience granted for crafting this recipe.
    pub fn experience(&self) -> u32 {
        experience(self.total_required(), self.item.quality)
    }
}

/// Crafting failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CraftingError {
    #[error("not enough {resource}: {difference} more needed")]
    MissingResource { resource: String, difference: u32 },

    #[error("no recipe for `{item}`")]
    UnknownRecipe { item: String },
}

impl GameError for CraftingError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingResource { .. } => ErrorSeverity::Recoverable,
            Self::UnknownRecipe { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingResource { .. } => "CRAFTING_MISSING_RESOURCE",
            Self::UnknownRecipe { .. } => "CRAFTING_UNKNOWN_RECIPE",
        }
    }
}

/// Crafting resources held by an actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CraftingResources {
    amounts: BTreeMap<String, u32>,
}

impl CraftingResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, resource: &str) -> u32 {
        self.amounts.get(resource).copied().unwrap_or(0)
    }

    pub fn add(&mut self, resource: &str, amount: u32) {
        let entry = self.amounts.entry(resource.to_string()).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.amounts.iter().map(|(key, amount)| (key.as_str(), *amount))
    }
}

/// Checks every requirement of `recipe`; reports the first shortfall.
pub fn can_craft(resources: &CraftingResources, recipe: &Recipe) -> Result<(), CraftingError> {
    for (resource, required) in &recipe.resources {
        let held = resources.get(resource);
        if held < *required {
            return Err(CraftingError::MissingResource {
                resource: resource.clone(),
                difference: required - held,
            });
        }
    }
    Ok(())
}

/// Deducts the recipe's requirements. Nothing is deducted on failure.
pub fn consume(resources: &mut CraftingResources, recipe: &Recipe) -> Result<(), CraftingError> {
    can_craft(resources, recipe)?;
    for (resource, required) in &recipe.resources {
        if let Some(held) = resources.amounts.get_mut(resource) {
            *held -= required;
        }
    }
    Ok(())
}

/// `ceil(total_required / 5) × quality weight`.
pub fn experience(total_required: u32, quality: Quality) -> u32 {
    total_required.div_ceil(5).saturating_mul(quality.weight())
}
