//! Runtime configuration.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use myelin_core::GameConfig;

/// Runtime configuration shared across the orchestrator and clients.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Directory holding `effects.ron`, `skills.ron`, ...
    pub data_dir: PathBuf,
    /// Save directory; `None` uses the platform default.
    pub save_dir: Option<PathBuf>,
    /// Wall-clock time between ticks in [`crate::Runtime::run`].
    pub tick_interval: Duration,
    pub game_seed: u64,
    /// Stop [`crate::Runtime::run`] after this many ticks.
    pub max_ticks: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            data_dir: PathBuf::from("data"),
            save_dir: None,
            tick_interval: Duration::from_millis(1000),
            game_seed: 0,
            max_ticks: None,
        }
    }
}

impl RuntimeConfig {
    /// Construct runtime configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MYELIN_DATA_DIR` - content directory (default: `data`)
    /// - `MYELIN_SAVE_DIR` - save directory (default: platform data dir)
    /// - `MYELIN_TICK_MILLIS` - milliseconds between ticks (default: 1000)
    /// - `MYELIN_GAME_SEED` - RNG seed (default: 0)
    /// - `MYELIN_TICKS` - stop after this many ticks (default: run forever)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("MYELIN_DATA_DIR") {
            config.data_dir = dir;
        }
        config.save_dir = read_env::<PathBuf>("MYELIN_SAVE_DIR");
        if let Some(millis) = read_env::<u64>("MYELIN_TICK_MILLIS") {
            config.tick_interval = Duration::from_millis(millis.max(1));
        }
        if let Some(seed) = read_env::<u64>("MYELIN_GAME_SEED") {
            config.game_seed = seed;
        }
        config.max_ticks = read_env::<u64>("MYELIN_TICKS");

        config
    }

    pub fn with_game_config(mut self, game_config: GameConfig) -> Self {
        self.game_config = game_config;
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
