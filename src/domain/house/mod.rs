//! House aggregate
//!
//! Contains the House entity with its apartments, meters and readings,
//! plus the repository interface.

pub mod model;
pub mod repository;

pub use model::{Apartment, House, WaterMeter, WaterReading};
pub use repository::HouseRepository;
