//! Effect template loader.

use std::path::Path;

use myelin_core::EffectTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Effect template file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectFile {
    pub effects: Vec<EffectTemplate>,
}

/// Loader for effect templates from RON files.
pub struct EffectLoader;

impl EffectLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EffectTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<EffectTemplate>> {
        let file: EffectFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse effect templates RON: {}", e))?;
        Ok(file.effects)
    }
}

#[cfg(test)]
mod tests {
    use myelin_core::{EffectDuration, EffectFlags, EffectKind, EffectType};

    use super::*;

    #[test]
    fn parses_templates() {
        let effects = EffectLoader::parse(
            r#"(effects: [
                (
                    id: "skill.curse",
                    name: "Disfigured",
                    effect_type: Curse,
                    flags: "PASSIVE",
                    duration: Infinite,
                    kind: DamageTaken(attribute: "health", percent: 200),
                ),
                (
                    id: "buff.might",
                    name: "Might",
                    effect_type: Buff,
                    duration: Finite(30),
                    kind: Modifier(attribute: "might", amount: 2),
                    config: (max_stacks: 3),
                ),
            ])"#,
        )
        .unwrap();

        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0].flags, EffectFlags::PASSIVE);
        assert_eq!(effects[0].effect_type, EffectType::Curse);
        assert_eq!(
            effects[0].kind,
            EffectKind::DamageTaken {
                attribute: "health".into(),
                percent: 200
            }
        );
        assert_eq!(effects[1].duration, EffectDuration::Finite(30));
        assert_eq!(effects[1].config.max_stacks, 3);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let err = EffectLoader::parse("(effects: [(id: 3)])").unwrap_err();
        assert!(err.to_string().contains("Failed to parse effect templates"));
    }
}
