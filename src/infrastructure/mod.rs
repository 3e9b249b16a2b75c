//! Infrastructure layer - external concerns

pub mod database;
pub mod jobs;
pub mod storage;

pub use database::{init_database, DatabaseConfig};
pub use jobs::InMemoryJobStore;
pub use storage::{InMemoryHouseRepository, InMemoryRepositoryProvider, InMemoryTariffRepository};
