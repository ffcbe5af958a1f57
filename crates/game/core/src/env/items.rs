//! Usable item behavior.
//!
//! Item instances and inventories live outside the core. The engine only
//! sees the usable part of an item and its id.

use crate::effect::Overrides;
use crate::state::ItemId;

/// What happens when an item is used.
///
/// An item carries either an `ability` (a skill executed directly) or an
/// `effect` (a template applied to the user).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UsableBehavior {
    /// Remaining uses. `None` means unlimited.
    pub charges: Option<u32>,
    /// Skill id.
    pub ability: Option<String>,
    /// Effect template id.
    pub effect: Option<String>,
    pub config: Overrides,
    pub state: Overrides,
    /// Replaces the ability's own cooldown.
    pub cooldown: Option<u64>,
    pub destroy_on_depleted: bool,
}

impl UsableBehavior {
    pub fn casting(skill: impl Into<String>) -> Self {
        Self {
            ability: Some(skill.into()),
            ..Self::default()
        }
    }

    pub fn applying(template: impl Into<String>) -> Self {
        Self {
            effect: Some(template.into()),
            ..Self::default()
        }
    }

    pub fn with_charges(mut self, charges: u32) -> Self {
        self.charges = Some(charges);
        self
    }

    pub fn destroyed_when_depleted(mut self) -> Self {
        self.destroy_on_depleted = true;
        self
    }

    pub fn is_depleted(&self) -> bool {
        self.charges == Some(0)
    }
}

/// The usable view of one item instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UsableItem {
    pub id: ItemId,
    pub name: String,
    pub usable: UsableBehavior,
}

impl UsableItem {
    pub fn new(id: ItemId, name: impl Into<String>, usable: UsableBehavior) -> Self {
        Self {
            id,
            name: name.into(),
            usable,
        }
    }
}
