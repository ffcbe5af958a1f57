//! Skill loader.

use std::path::Path;

use myelin_core::Skill;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Skill file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillFile {
    pub skills: Vec<Skill>,
}

/// Loader for skills from RON files.
pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<Skill>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<Skill>> {
        let file: SkillFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skills RON: {}", e))?;
        Ok(file.skills)
    }
}

#[cfg(test)]
mod tests {
    use myelin_core::{OverrideValue, SkillBehavior, SkillType};

    use super::*;

    #[test]
    fn parses_cost_cooldown_requirements_and_effect_overrides() {
        let skills = SkillLoader::parse(
            r#"(skills: [
                (
                    id: "cloudmend",
                    name: "Cloudmend",
                    skill_type: Feat,
                    resource: Some((attribute: "focus", cost: 45)),
                    cooldown: 20,
                    behavior: AreaHeal(attribute: "health", min_cap: 20, max_cap: 100),
                    requirements: (level: 2, attributes: {"willpower": 12}),
                ),
                (
                    id: "disfigured",
                    name: "Disfigured",
                    skill_type: Mutation,
                    flags: "PASSIVE",
                    behavior: Passive,
                    effect: Some((effect: "skill.curse", state: {"percent": 200})),
                ),
            ])"#,
        )
        .unwrap();

        let cloudmend = &skills[0];
        assert_eq!(cloudmend.skill_type, SkillType::Feat);
        assert_eq!(cloudmend.requirements.level, 2);
        assert_eq!(cloudmend.requirements.attributes.get("willpower"), Some(&12));
        assert_eq!(cloudmend.requirements.cost, 0);
        assert_eq!(cloudmend.resource.as_ref().map(|r| r.cost), Some(45));
        assert_eq!(cloudmend.cooldown, 20);
        assert!(matches!(cloudmend.behavior, SkillBehavior::AreaHeal { .. }));

        let disfigured = &skills[1];
        assert!(disfigured.is_passive());
        assert!(disfigured.requirements.is_empty());
        let spec = disfigured.effect.as_ref().unwrap();
        assert_eq!(spec.state.get("percent"), Some(&OverrideValue::Int(200)));
    }
}
