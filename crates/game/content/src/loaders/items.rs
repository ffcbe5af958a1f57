//! Item catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::items::ItemDefinition;
use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFile {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ItemDefinition>> {
        let file: ItemFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;
        Ok(file.items)
    }
}

#[cfg(test)]
mod tests {
    use myelin_core::ItemId;

    use super::*;

    #[test]
    fn parses_usable_and_worn_items() {
        let items = ItemLoader::parse(
            r#"(items: [
                (
                    id: "bull_tonic",
                    name: "Bull Tonic",
                    usable: Some((
                        charges: Some(2),
                        effect: Some("buff.might"),
                        config: {"duration": 15},
                        destroy_on_depleted: true,
                    )),
                ),
                (
                    id: "alms_pouch",
                    name: "Alms Pouch",
                    worn: Some((effect: "item.alms")),
                ),
            ])"#,
        )
        .unwrap();

        let tonic = items[0].instantiate(ItemId(1)).unwrap();
        assert_eq!(tonic.name, "Bull Tonic");
        assert_eq!(tonic.usable.charges, Some(2));
        assert!(tonic.usable.destroy_on_depleted);

        assert!(items[1].instantiate(ItemId(2)).is_none());
        assert_eq!(items[1].worn.as_ref().map(|spec| spec.effect.as_str()), Some("item.alms"));
    }
}
