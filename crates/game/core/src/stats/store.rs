//! Per-actor attribute store.

use std::collections::BTreeMap;

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};

use super::attribute::{Attribute, AttributeRecord};

/// Errors raised by attribute lookups.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeError {
    #[error("unknown attribute `{name}`")]
    Unknown { name: String },
}

impl AttributeError {
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::Unknown { name: name.into() }
    }
}

impl GameError for AttributeError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Unknown { .. } => "ATTRIBUTE_UNKNOWN",
        }
    }
}

/// Mapping of attribute name to [`Attribute`].
///
/// # Invariants
///
/// - Always contains every entry of [`GameConfig::BASELINE_ATTRIBUTES`]
/// - Attributes are never removed, only overwritten
/// - `delta` values are written only by the effect registry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeStore {
    attributes: BTreeMap<String, Attribute>,
}

impl AttributeStore {
    /// Creates a store holding the baseline attributes at their defaults.
    pub fn new() -> Self {
        let mut store = Self {
            attributes: BTreeMap::new(),
        };
        store.fill_baseline();
        store
    }

    fn fill_baseline(&mut self) {
        for (name, base, max) in GameConfig::BASELINE_ATTRIBUTES {
            self.attributes
                .entry(name.to_string())
                .or_insert_with(|| match max {
                    Some(max) => Attribute::capped(name, base, max),
                    None => Attribute::new(name, base),
                });
        }
    }

    /// Current effective value of an attribute.
    pub fn get(&self, name: &str) -> Result<i32, AttributeError> {
        self.attributes
            .get(name)
            .map(Attribute::current)
            .ok_or_else(|| AttributeError::unknown(name))
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Mutable record access for progression. Deltas written here are
    /// overwritten on the next tick.
    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Creates or overwrites an attribute. An existing cap is preserved.
    pub fn set(&mut self, name: &str, base: i32, delta: i32) {
        let max = self.attributes.get(name).and_then(|attr| attr.max);
        let base = max.map_or(base, |max| base.min(max));
        self.attributes.insert(
            name.to_string(),
            Attribute {
                name: name.to_string(),
                base,
                delta,
                max,
            },
        );
    }

    /// Creates or overwrites a capped resource pool.
    pub fn set_capped(&mut self, name: &str, base: i32, max: i32) {
        let delta = self.attributes.get(name).map_or(0, |attr| attr.delta);
        self.attributes.insert(
            name.to_string(),
            Attribute::capped(name, base, max).with_delta(delta),
        );
    }

    /// Resets every delta to zero. Called once per tick before effects
    /// reapply their contributions.
    pub fn clear_deltas(&mut self) {
        for attr in self.attributes.values_mut() {
            attr.delta = 0;
        }
    }

    /// Shifts the delta of an attribute. Returns false when it is absent.
    pub(crate) fn add_delta(&mut self, name: &str, amount: i32) -> bool {
        match self.attributes.get_mut(name) {
            Some(attr) => {
                attr.delta = attr.delta.saturating_add(amount);
                true
            }
            None => false,
        }
    }

    /// Permanent base adjustment clamped to the attribute's bounds.
    ///
    /// Returns the change actually applied.
    pub fn adjust_base(&mut self, name: &str, amount: i32) -> Result<i32, AttributeError> {
        self.attributes
            .get_mut(name)
            .map(|attr| attr.adjust_base(amount))
            .ok_or_else(|| AttributeError::unknown(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn serialize(&self) -> BTreeMap<String, AttributeRecord> {
        self.attributes
            .iter()
            .map(|(name, attr)| (name.clone(), attr.record()))
            .collect()
    }

    /// Restores a store from saved records, back-filling the baseline set.
    ///
    /// Saved pools without a cap inherit the baseline cap.
    pub fn deserialize(records: BTreeMap<String, AttributeRecord>) -> Self {
        let attributes = records
            .into_iter()
            .map(|(name, record)| {
                let max = record
                    .max
                    .or_else(|| GameConfig::baseline(&name).and_then(|(_, _, max)| max));
                let attr = Attribute {
                    name: name.clone(),
                    base: max.map_or(record.base, |max| record.base.min(max)),
                    delta: record.delta,
                    max,
                };
                (name, attr)
            })
            .collect();

        let mut store = Self { attributes };
        store.fill_baseline();
        store
    }
}

impl Default for AttributeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_has_baseline() {
        let store = AttributeStore::new();
        assert_eq!(store.len(), GameConfig::BASELINE_ATTRIBUTES.len());
        assert_eq!(store.get("willpower"), Ok(10));
        assert_eq!(store.get("focus"), Ok(100));
        assert_eq!(store.get("armor"), Ok(0));
    }

    #[test]
    fn unknown_attribute_fails() {
        let store = AttributeStore::new();
        assert_eq!(
            store.get("charisma"),
            Err(AttributeError::Unknown {
                name: "charisma".into()
            })
        );
    }

    #[test]
    fn set_keeps_existing_cap() {
        let mut store = AttributeStore::new();
        store.set("health", 250, 0);
        assert_eq!(store.get("health"), Ok(100));

        store.set("luck", 3, 2);
        assert_eq!(store.get("luck"), Ok(5));
    }

    #[test]
    fn clear_deltas_only_touches_deltas() {
        let mut store = AttributeStore::new();
        store.set("might", 14, 6);
        assert!(store.add_delta("focus", -20));

        store.clear_deltas();

        assert_eq!(store.attribute("might").map(|a| (a.base, a.delta)), Some((14, 0)));
        assert_eq!(store.get("focus"), Ok(100));
    }

    #[test]
    fn deserialize_backfills_partial_data() {
        let mut saved = BTreeMap::new();
        saved.insert("might".to_string(), AttributeRecord::base(15));
        saved.insert("health".to_string(), AttributeRecord::base(60));

        let store = AttributeStore::deserialize(saved);

        assert_eq!(store.get("might"), Ok(15));
        assert_eq!(store.get("health"), Ok(60));
        assert_eq!(store.attribute("health").and_then(|a| a.max), Some(100));
        assert_eq!(store.get("energy"), Ok(100));
        assert_eq!(store.len(), GameConfig::BASELINE_ATTRIBUTES.len());
    }

    #[test]
    fn serialize_restores_identically() {
        let mut store = AttributeStore::new();
        store.set("might", 18, 0);
        store.adjust_base("focus", -45).unwrap();

        let restored = AttributeStore::deserialize(store.serialize());
        assert_eq!(restored, store);
    }
}
