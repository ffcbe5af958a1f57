//! Client builder: loads content and wires the runtime.

use anyhow::{Context, Result};
use tracing::info;

use myelin_content::ContentFactory;
use myelin_runtime::{FileActorRepository, Runtime, RuntimeConfig};

use crate::Client;

/// Builder for constructing a [`Client`].
pub struct ClientBuilder {
    config: Option<RuntimeConfig>,
    persist: bool,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            persist: true,
        }
    }

    /// Runtime configuration; defaults to [`RuntimeConfig::from_env`].
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Disables actor saves.
    pub fn ephemeral(mut self) -> Self {
        self.persist = false;
        self
    }

    /// Loads the content under `data_dir` and builds the client.
    ///
    /// # Errors
    ///
    /// Fails when content files are missing or invalid, or when the save
    /// directory cannot be created.
    pub fn build(self) -> Result<Client> {
        let config = self.config.unwrap_or_else(RuntimeConfig::from_env);
        let factory = ContentFactory::new(&config.data_dir);

        let game_config = factory.load_config()?;
        let catalog = factory.load_catalog()?;
        let crafting = factory.load_crafting()?;

        let mut builder = Runtime::builder()
            .config(config.clone().with_game_config(game_config))
            .catalog(catalog)
            .crafting(crafting);

        if self.persist {
            let save_dir = config
                .save_dir
                .clone()
                .unwrap_or_else(FileActorRepository::default_dir);
            let repository = FileActorRepository::new(&save_dir)
                .with_context(|| format!("failed to open save directory {}", save_dir.display()))?;
            info!(path = %save_dir.display(), "actor saves enabled");
            builder = builder.repository(repository);
        }

        let (runtime, notifications) = builder.build()?;
        Ok(Client::new(runtime, notifications))
    }
}
