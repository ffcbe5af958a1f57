//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};

/// A collaborator required by the operation was not provided.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("CatalogOracle not available")]
    CatalogNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Configuration
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CatalogNotAvailable => "ORACLE_CATALOG_NOT_AVAILABLE",
            Self::RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
        }
    }
}
