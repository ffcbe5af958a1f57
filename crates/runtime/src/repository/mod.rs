//! Persistence adapters for actor records.
mod error;
mod file;
mod memory;
mod traits;

pub use error::RepositoryError;
pub use file::FileActorRepository;
pub use memory::InMemoryActorRepository;
pub use traits::ActorRepository;
