//! Named effect templates and the factory that turns them into instances.

use std::collections::BTreeMap;

use crate::state::EntityId;

use super::error::EffectError;
use super::instance::{EffectConfig, EffectDuration, EffectInstance};
use super::kinds::{EffectFlags, EffectKind, EffectType};

/// Loosely typed override value as it appears in content files.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum OverrideValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl OverrideValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "a boolean",
            Self::Int(_) => "an integer",
            Self::Text(_) => "a string",
        }
    }

    fn mismatch(&self, key: &str, expected: &str) -> String {
        format!("`{key}` expects {expected}, got {}", self.type_name())
    }

    pub fn int(&self, key: &str) -> Result<i32, String> {
        match self {
            Self::Int(value) => {
                i32::try_from(*value).map_err(|_| format!("`{key}` is out of range: {value}"))
            }
            other => Err(other.mismatch(key, "an integer")),
        }
    }

    pub fn bool(&self, key: &str) -> Result<bool, String> {
        match self {
            Self::Bool(value) => Ok(*value),
            other => Err(other.mismatch(key, "a boolean")),
        }
    }

    pub fn text(&self, key: &str) -> Result<&str, String> {
        match self {
            Self::Text(value) => Ok(value),
            other => Err(other.mismatch(key, "a string")),
        }
    }
}

impl From<i64> for OverrideValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for OverrideValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for OverrideValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for OverrideValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Override map keyed by field name.
pub type Overrides = BTreeMap<String, OverrideValue>;

/// Reference to a template plus per-use overrides, as carried by skills and
/// items.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSpec {
    /// Template id.
    pub effect: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub config: Overrides,
    #[cfg_attr(feature = "serde", serde(default))]
    pub state: Overrides,
}

impl EffectSpec {
    pub fn new(effect: impl Into<String>) -> Self {
        Self {
            effect: effect.into(),
            config: Overrides::new(),
            state: Overrides::new(),
        }
    }

    pub fn with_config(mut self, key: &str, value: impl Into<OverrideValue>) -> Self {
        self.config.insert(key.to_string(), value.into());
        self
    }

    pub fn with_state(mut self, key: &str, value: impl Into<OverrideValue>) -> Self {
        self.state.insert(key.to_string(), value.into());
        self
    }
}

/// Content definition of an effect.
///
/// Instances are produced by [`EffectTemplate::instantiate`] with optional
/// per-use overrides:
///
/// - **config** keys: `name`, `description`, `max_stacks`, `hidden`,
///   `replace`, `duration` (integer or `"infinite"`)
/// - **state** keys: `stacks`, plus whatever the kind's schema accepts
///   (`attribute`, `amount`, `percent`, `skill`)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectTemplate {
    pub id: String,
    pub name: String,
    pub effect_type: EffectType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: EffectFlags,
    pub duration: EffectDuration,
    pub kind: EffectKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub config: EffectConfig,
}

impl EffectTemplate {
    pub fn new(
        id: impl Into<String>,
        effect_type: EffectType,
        duration: EffectDuration,
        kind: EffectKind,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            effect_type,
            flags: EffectFlags::empty(),
            duration,
            kind,
            config: EffectConfig::default(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_flags(mut self, flags: EffectFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_max_stacks(mut self, max_stacks: u32) -> Self {
        self.config.max_stacks = max_stacks;
        self
    }

    /// Creates a fresh instance owned by `owner`.
    ///
    /// Fails with [`EffectError::InvalidConfiguration`] when an override key
    /// is unknown or carries the wrong value type.
    pub fn instantiate(
        &self,
        owner: EntityId,
        config: &Overrides,
        state: &Overrides,
    ) -> Result<EffectInstance, EffectError> {
        let invalid = |reason: String| EffectError::invalid(&self.id, reason);

        let mut name = self.name.clone();
        let mut duration = self.duration;
        let mut effect_config = self.config.clone();

        for (key, value) in config {
            match key.as_str() {
                "name" => name = value.text(key).map_err(invalid)?.to_string(),
                "description" => {
                    effect_config.description = value.text(key).map_err(invalid)?.to_string()
                }
                "max_stacks" => effect_config.max_stacks = positive(key, value).map_err(invalid)?,
                "hidden" => effect_config.hidden = value.bool(key).map_err(invalid)?,
                "replace" => effect_config.replace = value.bool(key).map_err(invalid)?,
                "duration" => duration = parse_duration(key, value).map_err(invalid)?,
                other => return Err(invalid(format!("`{other}` is not a config key"))),
            }
        }

        let mut kind = self.kind.clone();
        let mut stacks = 1;
        for (key, value) in state {
            match key.as_str() {
                "stacks" => stacks = positive(key, value).map_err(invalid)?,
                _ => kind.apply_state(key, value).map_err(invalid)?,
            }
        }

        if stacks > effect_config.max_stacks.max(1) {
            return Err(invalid(format!(
                "{stacks} stacks exceed max_stacks {}",
                effect_config.max_stacks
            )));
        }

        let mut instance =
            EffectInstance::new(&self.id, name, self.effect_type, kind, duration, owner)
                .with_flags(self.flags)
                .with_config(effect_config);
        instance.state.stacks = stacks;
        Ok(instance)
    }
}

fn positive(key: &str, value: &OverrideValue) -> Result<u32, String> {
    let raw = value.int(key)?;
    u32::try_from(raw)
        .ok()
        .filter(|value| *value >= 1)
        .ok_or_else(|| format!("`{key}` must be at least 1, got {raw}"))
}

fn parse_duration(key: &str, value: &OverrideValue) -> Result<EffectDuration, String> {
    match value {
        OverrideValue::Text(text) if text == "infinite" => Ok(EffectDuration::Infinite),
        _ => {
            let raw = value.int(key)?;
            u64::try_from(raw)
                .map(EffectDuration::Finite)
                .map_err(|_| format!("`{key}` must not be negative, got {raw}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn might_buff() -> EffectTemplate {
        EffectTemplate::new(
            "might_buff",
            EffectType::Buff,
            EffectDuration::Finite(10),
            EffectKind::Modifier {
                attribute: "might".into(),
                amount: 2,
            },
        )
        .with_max_stacks(3)
    }

    fn overrides<const N: usize>(entries: [(&str, OverrideValue); N]) -> Overrides {
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }

    #[test]
    fn instantiate_applies_overrides() {
        let config = overrides([
            ("name", "Alms".into()),
            ("duration", "infinite".into()),
            ("hidden", true.into()),
        ]);
        let state = overrides([("amount", 5.into()), ("stacks", 2.into())]);

        let effect = might_buff()
            .instantiate(EntityId(1), &config, &state)
            .unwrap();

        assert_eq!(effect.name, "Alms");
        assert_eq!(effect.template, "might_buff");
        assert_eq!(effect.duration, EffectDuration::Infinite);
        assert!(effect.is_hidden());
        assert_eq!(effect.state.stacks, 2);
        assert_eq!(effect.contribution(), Some(("might", 10)));
    }

    #[test]
    fn unknown_config_key_is_invalid_configuration() {
        let config = overrides([("colour", "red".into())]);
        let err = might_buff()
            .instantiate(EntityId(1), &config, &Overrides::new())
            .unwrap_err();
        assert!(matches!(err, EffectError::InvalidConfiguration { .. }));
    }

    #[test]
    fn state_type_mismatch_is_invalid_configuration() {
        let state = overrides([("amount", "lots".into())]);
        let err = might_buff()
            .instantiate(EntityId(1), &Overrides::new(), &state)
            .unwrap_err();
        assert_eq!(
            err,
            EffectError::invalid("might_buff", "`amount` expects an integer, got a string")
        );
    }

    #[test]
    fn initial_stacks_cannot_exceed_limit() {
        let state = overrides([("stacks", 4.into())]);
        assert!(
            might_buff()
                .instantiate(EntityId(1), &Overrides::new(), &state)
                .is_err()
        );
    }
}
