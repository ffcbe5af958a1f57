//! Semantic outcome notifications.
//!
//! The core reports what happened; message wording and delivery belong to
//! the sink.

use std::sync::Mutex;

use crate::effect::AddOutcome;
use crate::skill::UserFailure;
use crate::state::{EntityId, ItemId};

/// Outcome payload delivered to a [`NotificationSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notification {
    Healed {
        source: EntityId,
        target: EntityId,
        amount: i32,
    },
    EffectApplied {
        target: EntityId,
        effect: String,
        hidden: bool,
    },
    EffectStacked {
        target: EntityId,
        effect: String,
        stacks: u32,
    },
    EffectExpired {
        target: EntityId,
        effect: String,
        hidden: bool,
    },
    EffectRemoved {
        target: EntityId,
        effect: String,
    },
    SkillFailed {
        actor: EntityId,
        skill: String,
        failure: UserFailure,
    },
    SkillLearned {
        actor: EntityId,
        skill: String,
        name: String,
    },
    /// Item payloads carry the display name so that a destroyed item can
    /// still be rendered.
    ItemFailed {
        actor: EntityId,
        item: ItemId,
        name: String,
        failure: UserFailure,
    },
    ItemDepleted {
        actor: EntityId,
        item: ItemId,
        name: String,
        destroyed: bool,
    },
}

impl Notification {
    /// Payload for a successful effect add.
    pub fn effect_added(target: EntityId, effect: &str, hidden: bool, outcome: &AddOutcome) -> Self {
        match outcome {
            AddOutcome::Stacked { stacks, .. } => Self::EffectStacked {
                target,
                effect: effect.to_string(),
                stacks: *stacks,
            },
            AddOutcome::Added(_) | AddOutcome::Replaced { .. } => Self::EffectApplied {
                target,
                effect: effect.to_string(),
                hidden,
            },
        }
    }

    /// Actor the notification is addressed to.
    pub fn recipient(&self) -> EntityId {
        match self {
            Self::Healed { target, .. }
            | Self::EffectApplied { target, .. }
            | Self::EffectStacked { target, .. }
            | Self::EffectExpired { target, .. }
            | Self::EffectRemoved { target, .. } => *target,
            Self::SkillFailed { actor, .. }
            | Self::SkillLearned { actor, .. }
            | Self::ItemFailed { actor, .. }
            | Self::ItemDepleted { actor, .. } => *actor,
        }
    }
}

/// Receiver of outcome notifications. Must not call back into the engine.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sink that keeps every notification in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    received: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything received so far.
    pub fn drain(&self) -> Vec<Notification> {
        match self.received.lock() {
            Ok(mut received) => std::mem::take(&mut *received),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, notification: Notification) {
        match self.received.lock() {
            Ok(mut received) => received.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
