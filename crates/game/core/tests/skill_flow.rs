//! End-to-end skill and item flows through the engine façade.

use std::collections::BTreeMap;

use myelin_core::{
    ActorState, CatalogOracle, EffectDuration, EffectError, EffectInstance, EffectKind,
    EffectSpec, EffectTemplate, EffectType, EntityId, Env, GameConfig, GameEngine, GameEnv,
    GameState, ItemId, ItemUseError, MemorySink, Notification, PartyId, PcgRng, Requirement,
    RoomId, Skill, SkillBehavior, SkillError, SkillRequirements, SkillResult, SkillType,
    SourceRef, UsableBehavior, UsableItem, UserFailure,
};

const MIRA: EntityId = EntityId(1);
const BRAM: EntityId = EntityId(2);
const OSKA: EntityId = EntityId(3);
const TAMSIN: EntityId = EntityId(4);

struct TestCatalog {
    skills: BTreeMap<String, Skill>,
    effects: BTreeMap<String, EffectTemplate>,
}

impl TestCatalog {
    fn new() -> Self {
        let skills = [
            Skill::new(
                "cloudmend",
                SkillType::Spell,
                SkillBehavior::AreaHeal {
                    attribute: "health".into(),
                    min_cap: 20,
                    max_cap: 100,
                },
            )
            .named("Cloudmend")
            .with_cost("focus", 45)
            .with_cooldown(20),
            Skill::new("disfigured", SkillType::Mutation, SkillBehavior::Passive)
                .named("Disfigured")
                .with_effect(EffectSpec::new("skill.curse"))
                .passive(),
            Skill::new("secondwind", SkillType::Feat, SkillBehavior::ApplyEffect)
                .named("Second Wind")
                .with_cost("energy", 30)
                .with_cooldown(60)
                .with_effect(EffectSpec::new("regen.health")),
            Skill::new(
                "mend",
                SkillType::Spell,
                SkillBehavior::Heal {
                    attribute: "health".into(),
                    min_cap: 20,
                    max_cap: 100,
                },
            )
            .named("Mend")
            .with_cost("focus", 10)
            .with_cooldown(5)
            .with_requirements(
                SkillRequirements::new(1)
                    .with_attribute("intellect", 13)
                    .with_attribute("willpower", 12)
                    .with_cost(1),
            ),
        ];
        let effects = [
            EffectTemplate::new(
                "skill.curse",
                EffectType::Curse,
                EffectDuration::Infinite,
                EffectKind::DamageTaken {
                    attribute: "health".into(),
                    percent: 200,
                },
            )
            .named("Disfigured"),
            EffectTemplate::new(
                "item.stat",
                EffectType::Buff,
                EffectDuration::Finite(10),
                EffectKind::Modifier {
                    attribute: "might".into(),
                    amount: 2,
                },
            ),
            EffectTemplate::new(
                "item.alms",
                EffectType::Resource,
                EffectDuration::Infinite,
                EffectKind::Modifier {
                    attribute: "willpower".into(),
                    amount: 4,
                },
            )
            .named("Alms Pouch"),
            EffectTemplate::new(
                "regen.health",
                EffectType::Buff,
                EffectDuration::Finite(10),
                EffectKind::Regeneration {
                    attribute: "health".into(),
                    amount: 2,
                },
            )
            .named("Second Wind"),
        ];
        Self {
            skills: skills.into_iter().map(|s| (s.id.clone(), s)).collect(),
            effects: effects.into_iter().map(|e| (e.id.clone(), e)).collect(),
        }
    }
}

impl CatalogOracle for TestCatalog {
    fn skill(&self, id: &str) -> Option<Skill> {
        self.skills.get(id).cloned()
    }

    fn effect(&self, id: &str) -> Option<EffectTemplate> {
        self.effects.get(id).cloned()
    }
}

struct Fixture {
    catalog: TestCatalog,
    rng: PcgRng,
    sink: MemorySink,
}

impl Fixture {
    fn new() -> Self {
        Self {
            catalog: TestCatalog::new(),
            rng: PcgRng,
            sink: MemorySink::new(),
        }
    }

    fn env(&self) -> GameEnv<'_> {
        Env::<TestCatalog, PcgRng, MemorySink>::with_all(&self.catalog, &self.rng, &self.sink)
            .as_game_env()
    }
}

fn adventurer(id: EntityId, name: &str, room: u32) -> ActorState {
    let mut actor = ActorState::new(id, name)
        .with_level(4)
        .in_room(RoomId(room))
        .in_party(PartyId(1));
    actor.attributes.set("willpower", 20, 0);
    actor.attributes.set("intellect", 14, 0);
    actor.attributes.set("health", 40, 0);
    actor
}

fn party() -> GameState {
    GameState::with_seed(7)
        .with_actor(adventurer(MIRA, "Mira", 1))
        .with_actor(adventurer(BRAM, "Bram", 1))
        .with_actor(adventurer(OSKA, "Oska", 2))
}

/// Fills `count` registry slots with permanent markers.
fn crowd(state: &mut GameState, id: EntityId, count: usize) {
    let actor = state.entities.actor_mut(id).unwrap();
    for i in 0..count {
        let marker = EffectInstance::new(
            "marker",
            format!("marker {i}"),
            EffectType::Passive,
            EffectKind::PassiveSkill {
                skill: format!("marker{i}"),
            },
            EffectDuration::Infinite,
            id,
        );
        actor.add_effect(marker).unwrap();
    }
}

fn value(state: &GameState, id: EntityId, attribute: &str) -> i32 {
    state
        .entities
        .actor(id)
        .and_then(|actor| actor.attributes.get(attribute).ok())
        .unwrap()
}

#[test]
fn area_heal_covers_party_in_room_and_starts_cooldown() {
    let fixture = Fixture::new();
    let mut state = party();
    let mut engine = GameEngine::new(&mut state);

    let outcome = engine.execute_skill(fixture.env(), MIRA, "cloudmend").unwrap();

    let SkillResult::Healed { range, heals, .. } = &outcome.result else {
        panic!("expected heal result, got {:?}", outcome.result);
    };
    assert_eq!((range.min, range.max), (14, 35));
    let healed: Vec<EntityId> = heals.iter().map(|heal| heal.target).collect();
    assert_eq!(healed, vec![MIRA, BRAM]);
    for heal in heals {
        assert!((14..=35).contains(&heal.rolled));
        assert_eq!(heal.applied, heal.rolled);
    }

    let state = engine.state();
    assert_eq!(value(state, MIRA, "focus"), 55);
    assert_eq!(value(state, OSKA, "health"), 40);
    assert!(value(state, BRAM, "health") > 40);
    assert_eq!(state.nonce, 1);

    let cooldown = state
        .entities
        .actor(MIRA)
        .and_then(|actor| actor.effects.cooldown_for("cloudmend"))
        .unwrap();
    assert_eq!(cooldown.remaining, 20);

    let healed_notifications = fixture
        .sink
        .drain()
        .into_iter()
        .filter(|n| matches!(n, Notification::Healed { .. }))
        .count();
    assert_eq!(healed_notifications, 2);
}

#[test]
fn cooldown_is_reported_before_missing_resources() {
    let fixture = Fixture::new();
    let mut state = party();
    let mut engine = GameEngine::new(&mut state);

    engine.execute_skill(fixture.env(), MIRA, "cloudmend").unwrap();
    fixture.sink.drain();

    engine.apply_damage(MIRA, "focus", 50).unwrap();
    assert_eq!(value(engine.state(), MIRA, "focus"), 5);

    let err = engine.execute_skill(fixture.env(), MIRA, "cloudmend").unwrap_err();
    assert!(matches!(err, SkillError::Cooldown { remaining: 20, .. }));
    assert_eq!(value(engine.state(), MIRA, "focus"), 5);

    assert_eq!(
        fixture.sink.drain(),
        vec![Notification::SkillFailed {
            actor: MIRA,
            skill: "cloudmend".into(),
            failure: UserFailure::OnCooldown {
                skill: "cloudmend".into(),
                remaining: 20
            },
        }]
    );
}

#[test]
fn cooldown_expires_after_enough_ticks() {
    let fixture = Fixture::new();
    let mut state = party();
    let mut engine = GameEngine::new(&mut state);

    engine.execute_skill(fixture.env(), MIRA, "cloudmend").unwrap();
    fixture.sink.drain();

    let summary = engine.tick(fixture.env(), 19);
    assert!(summary.expired.is_empty());

    let summary = engine.tick(fixture.env(), 1);
    assert_eq!(summary.clock.0, 20);
    assert_eq!(summary.expired.len(), 1);
    assert_eq!(summary.expired[0].0, MIRA);
    assert!(matches!(
        fixture.sink.drain().as_slice(),
        [Notification::EffectExpired { target: MIRA, .. }]
    ));

    // focus 55 covers one more cast
    engine.execute_skill(fixture.env(), MIRA, "cloudmend").unwrap();
    assert_eq!(value(engine.state(), MIRA, "focus"), 10);
}

#[test]
fn passive_cannot_be_invoked_directly() {
    let fixture = Fixture::new();
    let mut state = party();
    let mut engine = GameEngine::new(&mut state);

    let err = engine.execute_skill(fixture.env(), MIRA, "disfigured").unwrap_err();
    assert!(matches!(err, SkillError::Passive { .. }));
    assert_eq!(err.user_failure(), UserFailure::PassiveSkill);
}

#[test]
fn disfigured_passive_doubles_incoming_damage() {
    let fixture = Fixture::new();
    let mut state = party();
    let mut engine = GameEngine::new(&mut state);

    let outcome = engine
        .activate_passive(fixture.env(), MIRA, "disfigured")
        .unwrap();
    assert!(matches!(outcome.result, SkillResult::PassiveInstalled(_)));

    let dealt = engine.apply_damage(MIRA, "health", 10).unwrap();
    assert_eq!(dealt, 20);
    assert_eq!(value(engine.state(), MIRA, "health"), 20);

    let dealt = engine.apply_damage(BRAM, "health", 10).unwrap();
    assert_eq!(dealt, 10);

    let actor = engine.state().entities.actor(MIRA).unwrap();
    assert!(actor.effects.has_passive("disfigured"));

    // a second activation is refused by the stacking policy
    let err = engine
        .activate_passive(fixture.env(), MIRA, "disfigured")
        .unwrap_err();
    assert_eq!(err.user_failure(), UserFailure::NothingHappens);
}

#[test]
fn unknown_skill_is_reported_as_cannot_act() {
    let fixture = Fixture::new();
    let mut state = party();
    let mut engine = GameEngine::new(&mut state);

    let err = engine.execute_skill(fixture.env(), MIRA, "fireball").unwrap_err();
    assert_eq!(err, SkillError::UnknownSkill("fireball".into()));
    assert_eq!(err.user_failure(), UserFailure::CannotAct);
}

#[test]
fn item_charges_run_out_and_destroy_the_item() {
    let fixture = Fixture::new();
    let mut state = party();
    let mut engine = GameEngine::new(&mut state);

    let mut tonic = UsableItem::new(
        ItemId(9),
        "Bull Tonic",
        UsableBehavior::applying("item.stat")
            .with_charges(1)
            .destroyed_when_depleted(),
    );

    let outcome = engine.use_item(fixture.env(), MIRA, &mut tonic).unwrap();
    assert_eq!(outcome.charges_left, Some(0));
    assert!(outcome.destroyed);
    assert_eq!(value(engine.state(), MIRA, "might"), 12);

    let effect = engine
        .state()
        .entities
        .actor(MIRA)
        .and_then(|actor| actor.effects.find_by_name("Bull Tonic"))
        .unwrap();
    assert_eq!(effect.config.source, Some(SourceRef::Item(ItemId(9))));

    let notifications = fixture.sink.drain();
    assert!(notifications.contains(&Notification::ItemDepleted {
        actor: MIRA,
        item: ItemId(9),
        name: "Bull Tonic".into(),
        destroyed: true,
    }));

    let err = engine.use_item(fixture.env(), MIRA, &mut tonic).unwrap_err();
    assert_eq!(err, ItemUseError::Depleted { item: ItemId(9) });
    assert_eq!(err.user_failure(), UserFailure::Depleted);
}

#[test]
fn refused_item_effect_keeps_its_charge() {
    let fixture = Fixture::new();
    let mut state = party();
    let mut engine = GameEngine::new(&mut state);

    let mut tonic = UsableItem::new(
        ItemId(9),
        "Bull Tonic",
        UsableBehavior::applying("item.stat").with_charges(3),
    );

    engine.use_item(fixture.env(), MIRA, &mut tonic).unwrap();
    let err = engine.use_item(fixture.env(), MIRA, &mut tonic).unwrap_err();

    assert!(matches!(err, ItemUseError::EffectRefused { .. }));
    assert_eq!(err.user_failure(), UserFailure::NothingHappens);
    assert_eq!(tonic.usable.charges, Some(2));
    assert_eq!(value(engine.state(), MIRA, "might"), 12);
}

#[test]
fn item_ability_uses_the_item_cooldown() {
    let fixture = Fixture::new();
    let mut state = party();
    let mut engine = GameEngine::new(&mut state);

    let mut wand = UsableItem::new(
        ItemId(4),
        "Wand of Mending",
        UsableBehavior {
            cooldown: Some(5),
            ..UsableBehavior::casting("cloudmend")
        },
    );

    let outcome = engine.use_item(fixture.env(), MIRA, &mut wand).unwrap();
    assert!(outcome.skill.is_some());
    assert_eq!(outcome.charges_left, None);

    let cooldown = engine
        .state()
        .entities
        .actor(MIRA)
        .and_then(|actor| actor.effects.cooldown_for("cloudmend"))
        .unwrap();
    assert_eq!(cooldown.remaining, 5);
}

#[test]
fn alms_pouch_effect_follows_its_item() {
    let fixture = Fixture::new();
    let mut state = party();
    let mut engine = GameEngine::new(&mut state);
    let pouch = SourceRef::Item(ItemId(12));

    engine
        .grant_item_effect(fixture.env(), MIRA, ItemId(12), &EffectSpec::new("item.alms"))
        .unwrap();
    assert_eq!(value(engine.state(), MIRA, "willpower"), 24);

    // infinite effects survive ticks
    engine.tick(fixture.env(), 100);
    assert_eq!(value(engine.state(), MIRA, "willpower"), 24);

    let removed = engine.revoke_source(fixture.env(), MIRA, &pouch);
    assert_eq!(removed.len(), 1);
    assert_eq!(value(engine.state(), MIRA, "willpower"), 20);
    assert!(
        fixture
            .sink
            .drain()
            .contains(&Notification::EffectRemoved {
                target: MIRA,
                effect: "Alms Pouch".into(),
            })
    );

    assert!(engine.revoke_source(fixture.env(), MIRA, &pouch).is_empty());
}

#[test]
fn heal_without_rng_charges_nothing() {
    let catalog = TestCatalog::new();
    let env = Env::<TestCatalog, PcgRng, MemorySink>::new(Some(&catalog), None, None);
    let mut state = party();
    let mut engine = GameEngine::new(&mut state);

    let err = engine
        .execute_skill(env.as_game_env(), MIRA, "cloudmend")
        .unwrap_err();
    assert!(matches!(err, SkillError::Oracle(_)));
    assert_eq!(value(engine.state(), MIRA, "focus"), 100);
}

#[test]
fn area_heal_skips_dead_members_and_heals_the_rest() {
    let fixture = Fixture::new();
    let mut state = party().with_actor(adventurer(TAMSIN, "Tamsin", 1));
    state
        .entities
        .actor_mut(BRAM)
        .unwrap()
        .attributes
        .set("health", 0, 0);
    let mut engine = GameEngine::new(&mut state);

    let outcome = engine.execute_skill(fixture.env(), MIRA, "cloudmend").unwrap();

    let SkillResult::Healed { heals, skipped, .. } = &outcome.result else {
        panic!("expected heal result, got {:?}", outcome.result);
    };
    let healed: Vec<EntityId> = heals.iter().map(|heal| heal.target).collect();
    assert_eq!(healed, vec![MIRA, TAMSIN]);
    assert_eq!(skipped, &vec![BRAM]);

    let state = engine.state();
    assert_eq!(value(state, BRAM, "health"), 0);
    assert!(value(state, TAMSIN, "health") > 40);
    assert_eq!(value(state, OSKA, "health"), 40);
}

#[test]
fn full_registry_refuses_the_skill_before_charging() {
    let fixture = Fixture::new();
    let mut state = party();
    crowd(&mut state, MIRA, GameConfig::MAX_EFFECTS - 1);
    let mut engine = GameEngine::new(&mut state);

    // one free slot, but the cooldown and the regeneration need two
    let err = engine.execute_skill(fixture.env(), MIRA, "secondwind").unwrap_err();
    assert_eq!(
        err,
        SkillError::EffectRefused {
            skill: "secondwind".into(),
            source: EffectError::RegistryFull {
                capacity: GameConfig::MAX_EFFECTS
            },
        }
    );
    assert_eq!(err.user_failure(), UserFailure::NothingHappens);

    let state = engine.state();
    let actor = state.entities.actor(MIRA).unwrap();
    assert_eq!(value(state, MIRA, "energy"), 100);
    assert!(actor.effects.cooldown_for("secondwind").is_none());
    assert!(actor.effects.find_by_name("Second Wind").is_none());
    assert_eq!(actor.effects.len(), GameConfig::MAX_EFFECTS - 1);
    assert_eq!(state.nonce, 0);
}

#[test]
fn item_effect_slot_is_reserved_during_its_ability() {
    let fixture = Fixture::new();
    let mut state = party();
    crowd(&mut state, MIRA, GameConfig::MAX_EFFECTS - 2);
    let mut engine = GameEngine::new(&mut state);

    let mut flask = UsableItem::new(
        ItemId(6),
        "Flask of Vigor",
        UsableBehavior {
            effect: Some("item.stat".into()),
            ..UsableBehavior::casting("secondwind").with_charges(3)
        },
    );

    let err = engine.use_item(fixture.env(), MIRA, &mut flask).unwrap_err();
    assert!(matches!(
        err,
        ItemUseError::Skill(SkillError::EffectRefused {
            source: EffectError::RegistryFull { .. },
            ..
        })
    ));
    assert_eq!(flask.usable.charges, Some(3));
    assert_eq!(value(engine.state(), MIRA, "energy"), 100);
    assert_eq!(value(engine.state(), MIRA, "might"), 10);
    let actor = engine.state().entities.actor(MIRA).unwrap();
    assert!(actor.effects.cooldown_for("secondwind").is_none());
}

#[test]
fn unmet_requirement_blocks_the_cast() {
    let fixture = Fixture::new();
    let mut state = party();
    state
        .entities
        .actor_mut(MIRA)
        .unwrap()
        .attributes
        .set("intellect", 12, 0);
    let mut engine = GameEngine::new(&mut state);

    let err = engine.execute_skill(fixture.env(), MIRA, "mend").unwrap_err();
    let unmet = Requirement::Attribute {
        attribute: "intellect".into(),
        required: 13,
    };
    assert_eq!(
        err,
        SkillError::RequirementNotMet {
            skill: "mend".into(),
            requirement: unmet.clone(),
        }
    );
    assert_eq!(value(engine.state(), MIRA, "focus"), 100);
    assert_eq!(
        fixture.sink.drain(),
        vec![Notification::SkillFailed {
            actor: MIRA,
            skill: "mend".into(),
            failure: UserFailure::Unqualified { requirement: unmet },
        }]
    );

    // Bram meets every prerequisite
    let outcome = engine.execute_skill(fixture.env(), BRAM, "mend").unwrap();
    assert!(matches!(outcome.result, SkillResult::Healed { .. }));
    assert_eq!(value(engine.state(), BRAM, "focus"), 90);
}

#[test]
fn learning_a_skill_spends_skill_points_once() {
    let fixture = Fixture::new();
    let mut state = party();
    state.entities.actor_mut(MIRA).unwrap().skill_points = 2;
    let mut engine = GameEngine::new(&mut state);

    engine.learn_skill(fixture.env(), MIRA, "mend").unwrap();
    let mira = engine.state().entities.actor(MIRA).unwrap();
    assert!(mira.knows("mend"));
    assert_eq!(mira.skill_points, 1);
    assert_eq!(
        fixture.sink.drain(),
        vec![Notification::SkillLearned {
            actor: MIRA,
            skill: "mend".into(),
            name: "Mend".into(),
        }]
    );

    let err = engine.learn_skill(fixture.env(), MIRA, "mend").unwrap_err();
    assert_eq!(
        err,
        SkillError::AlreadyKnown {
            skill: "mend".into()
        }
    );
    assert_eq!(engine.state().entities.actor(MIRA).unwrap().skill_points, 1);

    let err = engine.learn_skill(fixture.env(), BRAM, "mend").unwrap_err();
    assert_eq!(
        err.user_failure(),
        UserFailure::Unqualified {
            requirement: Requirement::SkillPoints(1)
        }
    );
    assert!(!engine.state().entities.actor(BRAM).unwrap().knows("mend"));
}
