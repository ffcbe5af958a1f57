//! Time-boxed modifiers attached to actors.
//!
//! An effect is created from an [`EffectTemplate`], handed to the owner's
//! [`EffectRegistry`] and from then on driven exclusively by the registry:
//!
//! ```text
//! Created ──add──▶ Active ──tick──▶ Active ──expire/remove/source──▶ Deactivated
//!                    ▲  │
//!                    └──┘ stacked
//! ```
//!
//! Cooldowns and passive-skill markers are effects as well, so they expire and
//! persist through the same paths.
pub mod error;
pub mod instance;
pub mod kinds;
pub mod registry;
pub mod template;

pub use error::EffectError;
pub use instance::{
    EffectConfig, EffectDuration, EffectId, EffectInstance, EffectPhase, EffectState,
};
pub use kinds::{EffectFlags, EffectKind, EffectType};
pub use registry::{Admission, AddOutcome, EffectRegistry, RegistrySnapshot, TickReport};
pub use template::{EffectSpec, EffectTemplate, OverrideValue, Overrides};
