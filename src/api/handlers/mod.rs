//! API Handlers

pub mod billing;
pub mod health;
pub mod houses;
pub mod metrics;
pub mod tariffs;

pub use houses::ApiState;
