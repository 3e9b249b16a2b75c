//! Tariff aggregate
//!
//! Contains the Tariff entity, its kind tag, and the repository interface.

pub mod model;
pub mod repository;

pub use model::{Tariff, TariffKind};
pub use repository::TariffRepository;
