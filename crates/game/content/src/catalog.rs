//! In-memory content catalog backing the engine's [`CatalogOracle`].

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use myelin_core::{
    CatalogOracle, EffectSpec, EffectTemplate, EntityId, GameConfig, Skill, SkillBehavior,
    UsableBehavior,
};
use tracing::debug;

use crate::items::ItemDefinition;

/// Effect templates, skills and items keyed by id.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    effects: BTreeMap<String, EffectTemplate>,
    skills: BTreeMap<String, Skill>,
    items: BTreeMap<String, ItemDefinition>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog and validates every cross reference.
    ///
    /// Duplicate ids are rejected rather than silently overwritten.
    pub fn from_parts(
        effects: Vec<EffectTemplate>,
        skills: Vec<Skill>,
        items: Vec<ItemDefinition>,
    ) -> Result<Self> {
        let mut catalog = Self::new();
        for effect in effects {
            let id = effect.id.clone();
            if catalog.effects.insert(id.clone(), effect).is_some() {
                bail!("duplicate effect template `{id}`");
            }
        }
        for skill in skills {
            let id = skill.id.clone();
            if catalog.skills.insert(id.clone(), skill).is_some() {
                bail!("duplicate skill `{id}`");
            }
        }
        for item in items {
            let id = item.id.clone();
            if catalog.items.insert(id.clone(), item).is_some() {
                bail!("duplicate item `{id}`");
            }
        }

        catalog.validate()?;
        debug!(
            effects = catalog.effects.len(),
            skills = catalog.skills.len(),
            items = catalog.items.len(),
            "catalog built"
        );
        Ok(catalog)
    }

    pub fn with_effect(mut self, effect: EffectTemplate) -> Self {
        self.effects.insert(effect.id.clone(), effect);
        self
    }

    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.insert(skill.id.clone(), skill);
        self
    }

    pub fn with_item(mut self, item: ItemDefinition) -> Self {
        self.items.insert(item.id.clone(), item);
        self
    }

    /// Checks that every reference resolves and every override fits its
    /// template. All problems are reported together.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        for skill in self.skills.values() {
            let passive_behavior = matches!(skill.behavior, SkillBehavior::Passive);
            if skill.is_passive() != passive_behavior {
                problems.push(format!(
                    "skill `{}`: PASSIVE flag and Passive behavior must go together",
                    skill.id
                ));
            }
            if skill.behavior.needs_effect() && skill.effect.is_none() {
                problems.push(format!("skill `{}`: behavior needs an effect", skill.id));
            }
            if let Some(resource) = &skill.resource
                && resource.cost < 0
            {
                problems.push(format!("skill `{}`: negative cost", skill.id));
            }
            for attribute in skill.requirements.attributes.keys() {
                if GameConfig::baseline(attribute).is_none() {
                    problems.push(format!(
                        "skill `{}`: requires unknown attribute `{attribute}`",
                        skill.id
                    ));
                }
            }
            if let Some(spec) = &skill.effect {
                self.check_spec(&format!("skill `{}`", skill.id), spec, &mut problems);
            }
        }

        for item in self.items.values() {
            let context = format!("item `{}`", item.id);
            if let Some(usable) = &item.usable {
                self.check_usable(&context, item, usable, &mut problems);
            }
            if let Some(spec) = &item.worn {
                self.check_spec(&context, spec, &mut problems);
            }
        }

        if problems.is_empty() {
            return Ok(());
        }
        bail!("invalid content:\n  - {}", problems.join("\n  - "))
    }

    fn check_usable(
        &self,
        context: &str,
        item: &ItemDefinition,
        usable: &UsableBehavior,
        problems: &mut Vec<String>,
    ) {
        if usable.ability.is_none() && usable.effect.is_none() {
            problems.push(format!("{context}: usable without ability or effect"));
        }
        if let Some(ability) = &usable.ability {
            match self.skills.get(ability) {
                None => problems.push(format!("{context}: unknown ability `{ability}`")),
                Some(skill) if skill.is_passive() => {
                    problems.push(format!("{context}: ability `{ability}` is passive"))
                }
                Some(_) => {}
            }
        }
        if let Some(effect) = &usable.effect {
            let mut spec = EffectSpec {
                effect: effect.clone(),
                config: usable.config.clone(),
                state: usable.state.clone(),
            };
            spec.config
                .entry("name".into())
                .or_insert_with(|| item.name.as_str().into());
            self.check_spec(context, &spec, problems);
        }
    }

    fn check_spec(&self, context: &str, spec: &EffectSpec, problems: &mut Vec<String>) {
        match self.effects.get(&spec.effect) {
            None => problems.push(format!("{context}: unknown effect `{}`", spec.effect)),
            Some(template) => {
                if let Err(err) = template.instantiate(EntityId::default(), &spec.config, &spec.state)
                {
                    problems.push(format!("{context}: {err}"));
                }
            }
        }
    }

    pub fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }

    pub fn effects(&self) -> impl Iterator<Item = &EffectTemplate> {
        self.effects.values()
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    /// Passive skills, in id order.
    pub fn passives(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values().filter(|skill| skill.is_passive())
    }
}

impl CatalogOracle for Catalog {
    fn skill(&self, id: &str) -> Option<Skill> {
        self.skills.get(id).cloned()
    }

    fn effect(&self, id: &str) -> Option<EffectTemplate> {
        self.effects.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use myelin_core::{EffectDuration, EffectKind, EffectType, SkillRequirements, SkillType};

    use super::*;

    fn curse() -> EffectTemplate {
        EffectTemplate::new(
            "skill.curse",
            EffectType::Curse,
            EffectDuration::Infinite,
            EffectKind::DamageTaken {
                attribute: "health".into(),
                percent: 200,
            },
        )
    }

    fn disfigured() -> Skill {
        Skill::new("disfigured", SkillType::Mutation, SkillBehavior::Passive)
            .with_effect(EffectSpec::new("skill.curse"))
            .passive()
    }

    #[test]
    fn valid_catalog_resolves_lookups() {
        let catalog = Catalog::from_parts(vec![curse()], vec![disfigured()], vec![]).unwrap();

        assert!(catalog.skill("disfigured").is_some());
        assert!(catalog.effect("skill.curse").is_some());
        assert!(catalog.skill("cloudmend").is_none());
        assert_eq!(catalog.passives().count(), 1);
    }

    #[test]
    fn missing_template_is_reported() {
        let err = Catalog::from_parts(vec![], vec![disfigured()], vec![]).unwrap_err();
        assert!(err.to_string().contains("unknown effect `skill.curse`"));
    }

    #[test]
    fn bad_override_is_reported() {
        let skill = Skill::new("disfigured", SkillType::Mutation, SkillBehavior::Passive)
            .with_effect(EffectSpec::new("skill.curse").with_state("percent", "double"))
            .passive();
        let err = Catalog::from_parts(vec![curse()], vec![skill], vec![]).unwrap_err();
        assert!(err.to_string().contains("`percent` expects an integer"));
    }

    #[test]
    fn passive_flag_must_match_behavior() {
        let skill = Skill::new("disfigured", SkillType::Mutation, SkillBehavior::Passive)
            .with_effect(EffectSpec::new("skill.curse"));
        assert!(Catalog::from_parts(vec![curse()], vec![skill], vec![]).is_err());
    }

    #[test]
    fn requirement_attributes_must_exist() {
        let skill = disfigured()
            .with_requirements(SkillRequirements::new(1).with_attribute("charm", 12));
        let err = Catalog::from_parts(vec![curse()], vec![skill], vec![]).unwrap_err();
        assert!(err.to_string().contains("requires unknown attribute `charm`"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Catalog::from_parts(vec![curse(), curse()], vec![], vec![]).unwrap_err();
        assert!(err.to_string().contains("duplicate effect template"));
    }

    #[test]
    fn usable_item_must_reference_known_ability() {
        let wand = ItemDefinition {
            id: "wand".into(),
            name: "Wand".into(),
            usable: Some(UsableBehavior::casting("cloudmend")),
            worn: None,
        };
        let err = Catalog::from_parts(vec![], vec![], vec![wand]).unwrap_err();
        assert!(err.to_string().contains("unknown ability `cloudmend`"));
    }
}
