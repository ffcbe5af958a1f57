//! Player-facing text for notifications, failures and effect listings.
//!
//! The core only emits semantic payloads; all wording lives here.

use myelin_core::{
    ActorState, EffectFlags, EntitiesState, EntityId, Notification, Requirement, UserFailure,
};

/// Names needed to render a notification.
#[derive(Clone, Copy)]
pub struct MessageContext<'a> {
    pub entities: &'a EntitiesState,
}

impl MessageContext<'_> {
    fn actor_name(&self, id: EntityId) -> &str {
        self.entities
            .actor(id)
            .map(|actor| actor.name.as_str())
            .unwrap_or("Someone")
    }
}

/// Text shown to the notification's recipient. Hidden effects render
/// nothing.
pub fn render(notification: &Notification, context: MessageContext<'_>) -> Option<String> {
    let text = match notification {
        Notification::Healed {
            source,
            target,
            amount,
        } => {
            if source == target {
                format!("The healing soothes your own wounds. (+{amount})")
            } else {
                format!(
                    "{} mends your wounds. (+{amount})",
                    context.actor_name(*source)
                )
            }
        }
        Notification::EffectApplied { hidden: true, .. }
        | Notification::EffectExpired { hidden: true, .. } => return None,
        Notification::EffectApplied { effect, .. } => format!("You are affected by {effect}."),
        Notification::EffectStacked { effect, stacks, .. } => {
            format!("{effect} grows stronger. ({stacks})")
        }
        Notification::EffectExpired { effect, .. } => format!("{effect} wears off."),
        Notification::EffectRemoved { effect, .. } => format!("{effect} fades."),
        Notification::SkillFailed { failure, .. } => failure_message(failure),
        Notification::SkillLearned { name, .. } => format!("You learn {name}."),
        Notification::ItemFailed { name, failure, .. } => match failure {
            UserFailure::Depleted => format!("You've used up {name}."),
            other => failure_message(other),
        },
        Notification::ItemDepleted {
            name,
            destroyed: true,
            ..
        } => format!("You used up {name}."),
        Notification::ItemDepleted { name, .. } => format!("{name} has no charges left."),
    };
    Some(text)
}

/// Message for a failed skill or item use.
pub fn failure_message(failure: &UserFailure) -> String {
    match failure {
        UserFailure::OnCooldown { skill, remaining } => {
            format!("{skill} is on cooldown. {} remaining.", humanize(*remaining))
        }
        UserFailure::PassiveSkill => "That skill is passive.".to_string(),
        UserFailure::NotEnoughResources { attribute } => {
            format!("You do not have enough {attribute}.")
        }
        UserFailure::Unqualified { requirement } => match requirement {
            Requirement::Level(level) => format!("You must be level {level}."),
            Requirement::Attribute {
                attribute,
                required,
            } => format!("You need {required} {attribute}."),
            Requirement::SkillPoints(points) => format!("You need {points} skill points."),
        },
        UserFailure::AlreadyKnown => "You already know that.".to_string(),
        UserFailure::NothingHappens => "Nothing happens.".to_string(),
        UserFailure::Depleted => "It's used up.".to_string(),
        UserFailure::CannotAct => "You can't use that.".to_string(),
    }
}

/// The `effects` listing of an actor. Hidden effects are skipped.
pub fn effects_listing(actor: &ActorState) -> Vec<String> {
    let mut lines = vec!["Current Effects:".to_string()];

    let mut any = false;
    for effect in actor.effects.visible() {
        any = true;
        let marker = if effect.flags.contains(EffectFlags::BUFF) {
            "+"
        } else if effect.flags.contains(EffectFlags::DEBUFF) {
            "-"
        } else {
            " "
        };
        let stacks = if effect.config.is_stackable() {
            format!(" ({})", effect.state.stacks)
        } else {
            String::new()
        };
        let time = match effect.time_left() {
            None => "Permanent".to_string(),
            Some(remaining) => format!("{} remaining", humanize(remaining)),
        };
        lines.push(format!(" {marker}{}{stacks}: {time}", effect.name));
        if !effect.config.description.is_empty() {
            lines.push(format!("\t{}", effect.config.description));
        }
    }

    if !any {
        lines.push("  None.".to_string());
    }
    lines
}

fn humanize(ticks: u64) -> String {
    match ticks {
        1 => "1 tick".to_string(),
        n => format!("{n} ticks"),
    }
}
