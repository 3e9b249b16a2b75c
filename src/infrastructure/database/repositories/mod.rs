//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod house_repository;
pub mod repository_provider;
pub mod tariff_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
