//! Read-only collaborators of the engine.
//!
//! Oracles expose content definitions and deterministic randomness; the
//! notification sink receives outcome payloads. The [`Env`] aggregate bundles
//! them so the engine can reach everything it needs without hard coupling to
//! concrete implementations.
mod catalog;
mod error;
mod items;
mod notify;
mod rng;

pub use catalog::CatalogOracle;
pub use error::OracleError;
pub use items::{UsableBehavior, UsableItem};
pub use notify::{MemorySink, Notification, NotificationSink};
pub use rng::{PcgRng, RngOracle, compute_seed};

/// Aggregates the collaborators required by skill execution and item use.
pub struct Env<'a, C, R, N>
where
    C: CatalogOracle + ?Sized,
    R: RngOracle + ?Sized,
    N: NotificationSink + ?Sized,
{
    catalog: Option<&'a C>,
    rng: Option<&'a R>,
    sink: Option<&'a N>,
}

impl<C, R, N> Clone for Env<'_, C, R, N>
where
    C: CatalogOracle + ?Sized,
    R: RngOracle + ?Sized,
    N: NotificationSink + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, R, N> Copy for Env<'_, C, R, N>
where
    C: CatalogOracle + ?Sized,
    R: RngOracle + ?Sized,
    N: NotificationSink + ?Sized,
{
}

pub type GameEnv<'a> =
    Env<'a, dyn CatalogOracle + 'a, dyn RngOracle + 'a, dyn NotificationSink + 'a>;

impl<'a, C, R, N> Env<'a, C, R, N>
where
    C: CatalogOracle + ?Sized,
    R: RngOracle + ?Sized,
    N: NotificationSink + ?Sized,
{
    pub fn new(catalog: Option<&'a C>, rng: Option<&'a R>, sink: Option<&'a N>) -> Self {
        Self { catalog, rng, sink }
    }

    pub fn with_all(catalog: &'a C, rng: &'a R, sink: &'a N) -> Self {
        Self::new(Some(catalog), Some(rng), Some(sink))
    }

    pub fn empty() -> Self {
        Self {
            catalog: None,
            rng: None,
            sink: None,
        }
    }

    /// Returns the CatalogOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::CatalogNotAvailable` if no catalog was provided.
    pub fn catalog(&self) -> Result<&'a C, OracleError> {
        self.catalog.ok_or(OracleError::CatalogNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::RngNotAvailable` if no rng oracle was provided.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// Delivers a notification. Dropped silently without a sink.
    pub fn notify(&self, notification: Notification) {
        if let Some(sink) = self.sink {
            sink.notify(notification);
        }
    }
}

impl<'a, C, R, N> Env<'a, C, R, N>
where
    C: CatalogOracle + 'a,
    R: RngOracle + 'a,
    N: NotificationSink + 'a,
{
    /// Converts this environment into a trait-object based `GameEnv`.
    pub fn as_game_env(&self) -> GameEnv<'a> {
        let catalog: Option<&'a dyn CatalogOracle> = self.catalog.map(|catalog| catalog as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        let sink: Option<&'a dyn NotificationSink> = self.sink.map(|sink| sink as _);
        Env::new(catalog, rng, sink)
    }
}
