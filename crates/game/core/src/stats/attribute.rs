//! A single named stat: persistent base plus transient delta.

/// Named numeric stat.
///
/// `base` is changed only by persistent adjustments (progression, resource
/// deduction, healing, damage). `delta` is owned by active effects and is
/// rebuilt from scratch every tick.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub name: String,
    pub base: i32,
    pub delta: i32,
    /// Upper bound for `base`. `None` means uncapped.
    pub max: Option<i32>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, base: i32) -> Self {
        Self {
            name: name.into(),
            base,
            delta: 0,
            max: None,
        }
    }

    /// Creates a resource pool whose base cannot exceed `max`.
    pub fn capped(name: impl Into<String>, base: i32, max: i32) -> Self {
        Self {
            name: name.into(),
            base: base.min(max),
            delta: 0,
            max: Some(max),
        }
    }

    pub fn with_delta(mut self, delta: i32) -> Self {
        self.delta = delta;
        self
    }

    /// Effective value: `base + delta`, floored at zero and capped at
    /// [`Self::effective_max`] when the attribute has a cap.
    pub fn current(&self) -> i32 {
        let raw = self.base.saturating_add(self.delta);
        let ceiling = self.effective_max().unwrap_or(i32::MAX).max(0);
        raw.clamp(0, ceiling)
    }

    /// Cap shifted by the transient delta, e.g. a +10 health buff raises both
    /// the current value and the ceiling.
    pub fn effective_max(&self) -> Option<i32> {
        self.max.map(|max| max.saturating_add(self.delta))
    }

    /// Applies a permanent change to `base`, clamped to `[0, max]`.
    ///
    /// Returns the change that was actually applied.
    pub fn adjust_base(&mut self, amount: i32) -> i32 {
        let before = self.base;
        let upper = self.max.unwrap_or(i32::MAX).max(0);
        self.base = before.saturating_add(amount).clamp(0, upper);
        self.base - before
    }

    pub fn record(&self) -> AttributeRecord {
        AttributeRecord {
            base: self.base,
            delta: self.delta,
            max: self.max,
        }
    }
}

/// Persisted form of an [`Attribute`].
///
/// Deserialization also accepts the legacy shape where an attribute was saved
/// as a bare number (`might: 12`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "SavedAttribute"))]
pub struct AttributeRecord {
    pub base: i32,
    pub delta: i32,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub max: Option<i32>,
}

impl AttributeRecord {
    pub const fn base(base: i32) -> Self {
        Self {
            base,
            delta: 0,
            max: None,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum SavedAttribute {
    Full {
        base: i32,
        #[serde(default)]
        delta: i32,
        #[serde(default)]
        max: Option<i32>,
    },
    Bare(i32),
}

#[cfg(feature = "serde")]
impl From<SavedAttribute> for AttributeRecord {
    fn from(saved: SavedAttribute) -> Self {
        match saved {
            SavedAttribute::Full { base, delta, max } => Self { base, delta, max },
            SavedAttribute::Bare(base) => Self::base(base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_is_floored_at_zero() {
        let attr = Attribute::new("might", 5).with_delta(-8);
        assert_eq!(attr.current(), 0);
    }

    #[test]
    fn delta_raises_capped_ceiling() {
        let attr = Attribute::capped("health", 100, 100).with_delta(10);
        assert_eq!(attr.current(), 110);
        assert_eq!(attr.effective_max(), Some(110));
    }

    #[test]
    fn adjust_base_reports_clamped_change() {
        let mut health = Attribute::capped("health", 90, 100);
        assert_eq!(health.adjust_base(25), 10);
        assert_eq!(health.base, 100);

        assert_eq!(health.adjust_base(-150), -100);
        assert_eq!(health.base, 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn legacy_bare_number_deserializes() {
        let record: AttributeRecord = serde_json::from_str("12").unwrap();
        assert_eq!(record, AttributeRecord::base(12));

        let record: AttributeRecord = serde_json::from_str(r#"{"base": 7, "delta": 2}"#).unwrap();
        assert_eq!(record.base, 7);
        assert_eq!(record.delta, 2);
        assert_eq!(record.max, None);
    }
}
