//! Heal range formulas and permanent health commits.

use crate::env::RngOracle;
use crate::state::ActorState;

use super::SkillError;

/// Inclusive heal range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealRange {
    pub min: i32,
    pub max: i32,
}

impl HealRange {
    /// Samples uniformly from the range.
    pub fn roll(&self, rng: &(impl RngOracle + ?Sized), seed: u64) -> i32 {
        let min = self.min.max(0);
        let max = self.max.max(min);
        // Both bounds are non-negative here.
        let rolled = rng.range(seed, min as u32, max as u32);
        i32::try_from(rolled).unwrap_or(max)
    }
}

/// Heal range of the minor-heal family:
///
/// ```text
/// min = min(ceil(willpower / 2 + level), min_cap)
/// max = min(willpower + floor(intellect / 2) + (level × 2, or 1 at level 0), max_cap)
/// ```
pub fn minor_heal_range(
    willpower: i32,
    intellect: i32,
    level: u32,
    min_cap: i32,
    max_cap: i32,
) -> HealRange {
    let level = i32::try_from(level).unwrap_or(i32::MAX);
    let willpower = willpower.max(0);
    let intellect = intellect.max(0);

    let min = (willpower / 2 + willpower % 2)
        .saturating_add(level)
        .min(min_cap);
    let level_bonus = if level == 0 { 1 } else { level.saturating_mul(2) };
    let max = willpower
        .saturating_add(intellect / 2)
        .saturating_add(level_bonus)
        .min(max_cap);

    HealRange {
        min,
        max: max.max(min),
    }
}

/// Raises `attribute`'s base by `amount`, clamped to its cap.
///
/// Returns the amount actually healed.
pub fn commit_heal(
    target: &mut ActorState,
    attribute: &str,
    amount: i32,
) -> Result<i32, SkillError> {
    target
        .attributes
        .adjust_base(attribute, amount.max(0))
        .map_err(SkillError::from)
}

/// Lowers `attribute`'s base by `amount` scaled with the target's incoming
/// damage multipliers.
///
/// Returns the damage actually dealt.
pub fn commit_damage(
    target: &mut ActorState,
    attribute: &str,
    amount: i32,
) -> Result<i32, SkillError> {
    let percent = i64::from(target.effects.incoming_damage_percent(attribute));
    let scaled = i64::from(amount.max(0)).saturating_mul(percent) / 100;
    let scaled = i32::try_from(scaled).unwrap_or(i32::MAX);
    let applied = target.attributes.adjust_base(attribute, -scaled)?;
    Ok(-applied)
}
