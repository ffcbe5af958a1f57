use crate::effect::EffectTemplate;
use crate::skill::Skill;

/// Read-only lookup of skill and effect definitions.
pub trait CatalogOracle: Send + Sync {
    fn skill(&self, id: &str) -> Option<Skill>;

    fn effect(&self, id: &str) -> Option<EffectTemplate>;
}
