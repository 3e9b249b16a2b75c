//! In-memory storage implementations

mod memory;

pub use memory::{InMemoryHouseRepository, InMemoryRepositoryProvider, InMemoryTariffRepository};
