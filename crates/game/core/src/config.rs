/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Game-time units that elapse on every engine tick.
    /// Effect durations and cooldowns are expressed in the same unit.
    pub tick_length: u64,
}

/// Baseline attribute entry: `(name, base, max)`.
pub type BaselineAttribute = (&'static str, i32, Option<i32>);

impl GameConfig {
    // ===== compile-time constants =====
    /// Upper bound on simultaneously active effects per actor.
    pub const MAX_EFFECTS: usize = 32;

    /// Attributes every actor carries, even when restored from partial data.
    ///
    /// Four primary stats, three resource pools (capped at their starting
    /// value) and armor.
    pub const BASELINE_ATTRIBUTES: [BaselineAttribute; 8] = [
        ("might", 10, None),
        ("quickness", 10, None),
        ("intellect", 10, None),
        ("willpower", 10, None),
        ("health", 100, Some(100)),
        ("focus", 100, Some(100)),
        ("energy", 100, Some(100)),
        ("armor", 0, None),
    ];

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TICK_LENGTH: u64 = 1;

    pub fn new() -> Self {
        Self {
            tick_length: Self::DEFAULT_TICK_LENGTH,
        }
    }

    pub fn with_tick_length(tick_length: u64) -> Self {
        Self {
            tick_length: tick_length.max(1),
        }
    }

    /// Looks up the baseline entry for an attribute name.
    pub fn baseline(name: &str) -> Option<BaselineAttribute> {
        Self::BASELINE_ATTRIBUTES
            .iter()
            .copied()
            .find(|(baseline, _, _)| *baseline == name)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
