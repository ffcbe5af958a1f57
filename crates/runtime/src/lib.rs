//! Runtime orchestration for the attribute/effect simulation.
//!
//! This crate wires together the engine, the content catalogs, the
//! notification channel and actor persistence into a cohesive runtime API.
//! Consumers embed [`Runtime`] to drive ticks, invoke skills and items, and
//! receive notifications.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the error types downstream clients interact with
//! - [`events`] forwards engine notifications onto a tokio channel
//! - [`messages`] turns notifications into player-facing text
//! - [`repository`] persists actor records
pub mod api;
pub mod config;
pub mod events;
pub mod messages;
pub mod repository;
pub mod runtime;

pub use api::{RepositoryError, Result, RuntimeError};
pub use config::RuntimeConfig;
pub use events::{ChannelSink, NotificationReceiver};
pub use messages::MessageContext;
pub use repository::{
    ActorRepository, FileActorRepository, InMemoryActorRepository,
};
pub use runtime::{ItemInstance, Runtime, RuntimeBuilder};
