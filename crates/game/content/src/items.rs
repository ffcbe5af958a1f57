//! Item definitions.

use myelin_core::{EffectSpec, ItemId, UsableBehavior, UsableItem};

/// Static item definition.
///
/// `usable` drives the `use` command; `worn` is applied while the item is
/// carried and revoked when it leaves the owner.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub usable: Option<UsableBehavior>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub worn: Option<EffectSpec>,
}

impl ItemDefinition {
    /// Creates an instance view of a usable item, with fresh charges.
    pub fn instantiate(&self, id: ItemId) -> Option<UsableItem> {
        self.usable
            .clone()
            .map(|usable| UsableItem::new(id, self.name.clone(), usable))
    }
}
