pub mod billing;
pub mod error;
pub mod house;
pub mod repositories;
pub mod tariff;

// Re-export commonly used types
pub use billing::{ApartmentCharge, BillingJob, JobState, JobStore};
pub use error::{DomainError, DomainResult};
pub use house::{Apartment, House, HouseRepository, WaterMeter, WaterReading};
pub use repositories::RepositoryProvider;
pub use tariff::{Tariff, TariffKind, TariffRepository};
