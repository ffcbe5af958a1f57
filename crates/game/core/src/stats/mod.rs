//! Attribute system.
//!
//! Every actor owns one [`AttributeStore`]: a mapping of attribute names to
//! base/delta pairs.
//!
//! ```text
//! current = clamp(base + delta, 0, max + delta)
//! ```
//!
//! ## Principles
//!
//! 1. **Persistent base**: progression, resource costs, healing and damage
//!    adjust `base`
//! 2. **Transient delta**: owned by active effects, cleared every tick and
//!    rebuilt from the effects that are still active
//! 3. **Baseline guarantee**: the primary stats, resource pools and armor
//!    always exist, even after loading partial saves

pub mod attribute;
pub mod store;

pub use attribute::{Attribute, AttributeRecord};
pub use store::{AttributeError, AttributeStore};
