//! Loads the shipped data directory and hand-written data sets.

use std::fs;
use std::path::PathBuf;

use myelin_content::ContentFactory;
use myelin_core::{CatalogOracle, CraftCategory, EffectFlags, SkillBehavior, SkillType};

fn shipped_data() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../../data")
}

#[test]
fn shipped_content_is_valid() {
    let factory = ContentFactory::new(shipped_data());

    let config = factory.load_config().unwrap();
    assert!(config.tick_length >= 1);

    let catalog = factory.load_catalog().unwrap();
    let cloudmend = catalog.skill("cloudmend").unwrap();
    assert_eq!(cloudmend.cooldown, 20);
    assert_eq!(cloudmend.resource.as_ref().map(|r| r.cost), Some(45));
    assert!(matches!(cloudmend.behavior, SkillBehavior::AreaHeal { .. }));
    assert_eq!(cloudmend.skill_type, SkillType::Feat);

    let mend = catalog.skill("mend").unwrap();
    assert_eq!(mend.requirements.attributes.get("intellect"), Some(&13));
    assert_eq!(mend.requirements.cost, 1);

    let disfigured = catalog.skill("disfigured").unwrap();
    assert!(disfigured.is_passive());
    let curse = catalog.effect("skill.curse").unwrap();
    assert_eq!(curse.flags, EffectFlags::DEBUFF | EffectFlags::PASSIVE);
    assert_eq!(
        catalog.effect("resource.buff").map(|e| e.flags),
        Some(EffectFlags::BUFF)
    );
    assert!(catalog.item("alms_pouch").and_then(|item| item.worn.as_ref()).is_some());

    let mut crafting = factory.load_crafting().unwrap();
    assert_eq!(crafting.by_category(CraftCategory::Container).len(), 1);
    assert_eq!(crafting.search("potion").len(), 1);
}

#[test]
fn dangling_reference_fails_the_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("effects.ron"), "(effects: [])").unwrap();
    fs::write(
        dir.path().join("skills.ron"),
        r#"(skills: [(
            id: "secondwind",
            name: "Second Wind",
            skill_type: Feat,
            behavior: ApplyEffect,
            effect: Some((effect: "regen.health")),
        )])"#,
    )
    .unwrap();
    fs::write(dir.path().join("items.ron"), "(items: [])").unwrap();

    let err = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("unknown effect `regen.health`"), "{message}");
}

#[test]
fn reload_picks_up_new_recipes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("resources.ron"),
        r#"(resources: [(id: "iron", name: "Iron Scrap")])"#,
    )
    .unwrap();
    fs::write(dir.path().join("recipes.ron"), "(recipes: [])").unwrap();

    let factory = ContentFactory::new(dir.path());
    let mut crafting = factory.load_crafting().unwrap();
    assert!(crafting.search("sword").is_empty());

    fs::write(
        dir.path().join("recipes.ron"),
        r#"(recipes: [(item: (name: "iron sword", category: Weapon), resources: {"iron": 6})])"#,
    )
    .unwrap();
    factory.reload_crafting(&mut crafting).unwrap();
    assert_eq!(crafting.search("sword").len(), 1);
}
