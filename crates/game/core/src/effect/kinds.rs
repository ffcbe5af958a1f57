//! Effect classification and the closed set of effect behaviors.

use bitflags::bitflags;

use super::template::OverrideValue;

bitflags! {
    /// Presentation and policy flags carried by an effect.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct EffectFlags: u8 {
        const BUFF = 1 << 0;
        const DEBUFF = 1 << 1;
        /// Installed by a passive skill.
        const PASSIVE = 1 << 2;
        /// Not listed to the player.
        const HIDDEN = 1 << 3;
    }
}

/// Category used for lookups such as "every resource buff on this actor".
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectType {
    Buff,
    Debuff,
    Curse,
    /// Marker installed by a passive skill.
    Passive,
    Cooldown,
    /// Buff granted by carrying an item.
    Resource,
}

/// Behavior of an effect.
///
/// Each variant defines what the effect does on activation, on every tick
/// and on deactivation:
///
/// | Kind           | activate             | update                    | deactivate           |
/// |----------------|----------------------|---------------------------|----------------------|
/// | `Modifier`     | delta += contribution| delta += contribution     | delta -= contribution|
/// | `Regeneration` | -                    | base += amount × stacks   | -                    |
/// | `DamageTaken`  | -                    | -                         | -                    |
/// | `Cooldown`     | -                    | -                         | -                    |
/// | `PassiveSkill` | -                    | -                         | -                    |
///
/// `DamageTaken` is read when damage is committed, see
/// [`crate::effect::EffectRegistry::incoming_damage_percent`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Flat transient change to an attribute, per stack.
    Modifier { attribute: String, amount: i32 },

    /// Permanent change to an attribute's base every tick, per stack.
    /// Negative amounts model damage over time.
    Regeneration { attribute: String, amount: i32 },

    /// Scales incoming damage to an attribute (percent, 200 = double).
    DamageTaken { attribute: String, percent: i32 },

    /// Blocks a skill until it expires.
    Cooldown { skill: String },

    /// Marks a passive skill as installed.
    PassiveSkill { skill: String },
}

impl EffectKind {
    /// Short identifier of the variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Modifier { .. } => "modifier",
            Self::Regeneration { .. } => "regeneration",
            Self::DamageTaken { .. } => "damage_taken",
            Self::Cooldown { .. } => "cooldown",
            Self::PassiveSkill { .. } => "passive_skill",
        }
    }

    /// Attribute this effect reads or writes, if any.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::Modifier { attribute, .. }
            | Self::Regeneration { attribute, .. }
            | Self::DamageTaken { attribute, .. } => Some(attribute),
            Self::Cooldown { .. } | Self::PassiveSkill { .. } => None,
        }
    }

    /// Transient delta contributed at the given stack count.
    pub fn contribution(&self, stacks: u32) -> Option<(&str, i32)> {
        match self {
            Self::Modifier { attribute, amount } => Some((attribute, scale(*amount, stacks))),
            _ => None,
        }
    }

    /// Applies one state override according to the variant's schema.
    ///
    /// Returns a human-readable reason when the key is not part of the
    /// schema or the value has the wrong type.
    pub(crate) fn apply_state(&mut self, key: &str, value: &OverrideValue) -> Result<(), String> {
        match (self, key) {
            (
                Self::Modifier { attribute, .. }
                | Self::Regeneration { attribute, .. }
                | Self::DamageTaken { attribute, .. },
                "attribute",
            ) => *attribute = value.text(key)?.to_string(),
            (
                Self::Modifier { amount, .. } | Self::Regeneration { amount, .. },
                "amount",
            ) => *amount = value.int(key)?,
            (Self::DamageTaken { percent, .. }, "percent") => {
                let value = value.int(key)?;
                if value < 0 {
                    return Err(format!("`percent` must not be negative, got {value}"));
                }
                *percent = value;
            }
            (Self::Cooldown { skill } | Self::PassiveSkill { skill }, "skill") => {
                *skill = value.text(key)?.to_string()
            }
            (kind, key) => {
                return Err(format!("`{key}` is not a {} state key", kind.tag()));
            }
        }
        Ok(())
    }
}

pub(crate) fn scale(amount: i32, stacks: u32) -> i32 {
    amount.saturating_mul(i32::try_from(stacks).unwrap_or(i32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "serde")]
    #[test]
    fn flags_deserialize_from_pipe_separated_names() {
        let flags: EffectFlags = serde_json::from_str(r#""DEBUFF | PASSIVE""#).unwrap();
        assert_eq!(flags, EffectFlags::DEBUFF | EffectFlags::PASSIVE);

        let text = serde_json::to_string(&EffectFlags::BUFF).unwrap();
        assert_eq!(text, r#""BUFF""#);
    }

    #[test]
    fn effect_type_round_trips_through_strings() {
        assert_eq!(EffectType::Resource.as_ref(), "resource");
        assert_eq!("curse".parse::<EffectType>(), Ok(EffectType::Curse));
    }

    #[test]
    fn modifier_contribution_scales_with_stacks() {
        let kind = EffectKind::Modifier {
            attribute: "might".into(),
            amount: 3,
        };
        assert_eq!(kind.contribution(1), Some(("might", 3)));
        assert_eq!(kind.contribution(3), Some(("might", 9)));
    }

    #[test]
    fn state_schema_rejects_foreign_keys() {
        let mut kind = EffectKind::Cooldown {
            skill: "cloudmend".into(),
        };
        let err = kind
            .apply_state("amount", &OverrideValue::Int(4))
            .unwrap_err();
        assert!(err.contains("cooldown"));
    }

    #[test]
    fn state_schema_rejects_wrong_types() {
        let mut kind = EffectKind::DamageTaken {
            attribute: "health".into(),
            percent: 100,
        };
        assert!(
            kind.apply_state("percent", &OverrideValue::Text("x".into()))
                .is_err()
        );
        kind.apply_state("percent", &OverrideValue::Int(200)).unwrap();
        assert_eq!(
            kind,
            EffectKind::DamageTaken {
                attribute: "health".into(),
                percent: 200
            }
        );
    }
}
