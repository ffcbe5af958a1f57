//! Common error infrastructure for myelin-core.
//!
//! Domain-specific errors (`AttributeError`, `EffectError`, `SkillError`, ...)
//! live next to the operations they guard. This module holds the shared
//! classification used by the runtime to decide how loudly to report them.
//!
//! Every error in this crate is an expected, recoverable condition surfaced to
//! the invoking layer. None of them is process-fatal.

/// Severity level of an error, used for categorization and logging.
///
/// - **Recoverable**: the same request may succeed later (cooldown elapsed,
///   resources regenerated)
/// - **Validation**: the request itself is invalid for this actor
/// - **Configuration**: content data is malformed; the operator must fix it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition, may succeed on retry.
    ///
    /// Examples: skill on cooldown, not enough focus
    Recoverable,

    /// Invalid request, should not be retried unchanged.
    ///
    /// Examples: passive skill invoked directly, unknown attribute
    Validation,

    /// Content data is inconsistent.
    ///
    /// Examples: skill references a missing effect template
    Configuration,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Configuration => "configuration",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error should reach an operator log.
    pub const fn is_operator_facing(&self) -> bool {
        matches!(self, Self::Configuration)
    }
}

/// Common trait for all myelin-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Error codes are stable strings suitable for metrics and tests
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
