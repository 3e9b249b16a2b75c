//! # Kommunalka Billing Service
//!
//! Utility-billing computation service for apartment houses: water by
//! meter deltas, maintenance by area, run as asynchronous jobs with
//! polled progress.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and traits
//! - **application**: Billing engine and job orchestration
//! - **infrastructure**: External concerns (database, repositories, job store)
//! - **api**: REST API with Swagger documentation
//! - **config**: TOML configuration
//! - **shared**: Cross-cutting helpers (shutdown, cancellation, retry)

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use api::create_api_router;
