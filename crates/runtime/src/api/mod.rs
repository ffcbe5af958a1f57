//! Types downstream clients interact with.
mod errors;

pub use errors::{RepositoryError, Result, RuntimeError};
