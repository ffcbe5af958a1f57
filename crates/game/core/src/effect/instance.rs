//! A single effect attached to an actor and its lifecycle hooks.

use std::fmt;

use crate::state::{EntityId, SourceRef};
use crate::stats::AttributeStore;

use super::kinds::{EffectFlags, EffectKind, EffectType, scale};

/// Registry-assigned effect identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectId(pub u64);

impl EffectId {
    /// Placeholder carried by effects that have not been added yet.
    pub const PENDING: Self = Self(0);
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect#{}", self.0)
    }
}

/// How long an effect lasts, in game-time units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectDuration {
    Finite(u64),
    /// Never expires through ticking; removed only explicitly.
    Infinite,
}

impl EffectDuration {
    pub fn is_finite(&self) -> bool {
        matches!(self, Self::Finite(_))
    }

    /// Remaining time for a freshly applied effect.
    pub fn initial_remaining(&self) -> u64 {
        match self {
            Self::Finite(length) => *length,
            Self::Infinite => u64::MAX,
        }
    }
}

/// Static configuration of an effect instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EffectConfig {
    pub description: String,
    /// Originating item, actor or skill. Used by `remove_by_source`.
    pub source: Option<SourceRef>,
    /// Values above 1 make the effect stackable.
    pub max_stacks: u32,
    pub hidden: bool,
    /// When the stacking policy refuses this effect, replace the existing
    /// instance instead.
    pub replace: bool,
}

impl EffectConfig {
    pub fn is_stackable(&self) -> bool {
        self.max_stacks > 1
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            description: String::new(),
            source: None,
            max_stacks: 1,
            hidden: false,
            replace: false,
        }
    }
}

/// Mutable per-instance state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectState {
    pub stacks: u32,
}

impl Default for EffectState {
    fn default() -> Self {
        Self { stacks: 1 }
    }
}

/// Lifecycle position of an effect.
///
/// `Created → Active → Deactivated`; there is no way back from
/// `Deactivated`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EffectPhase {
    #[default]
    Created,
    Active,
    Deactivated,
}

/// An effect instance.
///
/// Created by [`super::EffectTemplate::instantiate`] (or
/// [`EffectInstance::cooldown`]) and owned by the owner's
/// [`super::EffectRegistry`] once added.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectInstance {
    pub id: EffectId,
    /// Template the instance was created from.
    pub template: String,
    pub name: String,
    pub effect_type: EffectType,
    pub flags: EffectFlags,
    pub duration: EffectDuration,
    pub remaining: u64,
    pub config: EffectConfig,
    pub state: EffectState,
    pub kind: EffectKind,
    /// Back-reference for lookups only.
    pub owner: EntityId,
    #[cfg_attr(feature = "serde", serde(skip))]
    phase: EffectPhase,
}

impl EffectInstance {
    pub fn new(
        template: impl Into<String>,
        name: impl Into<String>,
        effect_type: EffectType,
        kind: EffectKind,
        duration: EffectDuration,
        owner: EntityId,
    ) -> Self {
        Self {
            id: EffectId::PENDING,
            template: template.into(),
            name: name.into(),
            effect_type,
            flags: EffectFlags::empty(),
            duration,
            remaining: duration.initial_remaining(),
            config: EffectConfig::default(),
            state: EffectState::default(),
            kind,
            owner,
            phase: EffectPhase::Created,
        }
    }

    /// Cooldown marker for a skill. Replaces any lingering cooldown of the
    /// same skill.
    pub fn cooldown(skill: &str, length: u64, owner: EntityId) -> Self {
        let mut effect = Self::new(
            "cooldown",
            Self::cooldown_name(skill),
            EffectType::Cooldown,
            EffectKind::Cooldown {
                skill: skill.to_string(),
            },
            EffectDuration::Finite(length),
            owner,
        );
        effect.flags = EffectFlags::HIDDEN;
        effect.config.replace = true;
        effect.config.source = Some(SourceRef::Skill(skill.to_string()));
        effect
    }

    pub fn cooldown_name(skill: &str) -> String {
        format!("cooldown:{skill}")
    }

    pub fn with_flags(mut self, flags: EffectFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_config(mut self, config: EffectConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_source(mut self, source: SourceRef) -> Self {
        self.config.source = Some(source);
        self
    }

    pub fn phase(&self) -> EffectPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == EffectPhase::Active
    }

    pub fn is_hidden(&self) -> bool {
        self.config.hidden || self.flags.contains(EffectFlags::HIDDEN)
    }

    /// Time left, or `None` for infinite effects.
    pub fn time_left(&self) -> Option<u64> {
        self.duration.is_finite().then_some(self.remaining)
    }

    /// Transient delta this effect currently contributes.
    pub fn contribution(&self) -> Option<(&str, i32)> {
        self.kind.contribution(self.state.stacks)
    }

    // ------------------------------------------------------------------------
    // Lifecycle hooks (driven by the registry only)
    // ------------------------------------------------------------------------

    pub(crate) fn activate(&mut self, store: &mut AttributeStore) {
        self.push_contribution(store, 1);
        self.phase = EffectPhase::Active;
    }

    pub(crate) fn update(&mut self, store: &mut AttributeStore) {
        self.push_contribution(store, 1);
        if let EffectKind::Regeneration { attribute, amount } = &self.kind {
            // Attribute presence is checked before activation.
            let _ = store.adjust_base(attribute, scale(*amount, self.state.stacks));
        }
    }

    /// Returns false when the effect was not active, so callers can keep
    /// deactivation exactly-once.
    pub(crate) fn deactivate(&mut self, store: &mut AttributeStore) -> bool {
        if self.phase != EffectPhase::Active {
            return false;
        }
        self.push_contribution(store, -1);
        self.phase = EffectPhase::Deactivated;
        true
    }

    /// Changes the stack count and moves the attribute delta along with it.
    pub(crate) fn restack(&mut self, stacks: u32, store: &mut AttributeStore) {
        self.push_contribution(store, -1);
        self.state.stacks = stacks;
        self.push_contribution(store, 1);
    }

    /// Re-derives the delta of a restored effect without running activation
    /// side effects a second time.
    pub(crate) fn restore(&mut self, store: &mut AttributeStore) {
        self.push_contribution(store, 1);
        self.phase = EffectPhase::Active;
    }

    fn push_contribution(&self, store: &mut AttributeStore, sign: i32) {
        if let Some((attribute, amount)) = self.contribution() {
            let applied = store.add_delta(attribute, amount.saturating_mul(sign));
            debug_assert!(applied, "effect attribute validated on add");
        }
    }
}
