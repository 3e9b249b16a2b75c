//! REST API module
//!
//! Provides HTTP endpoints for reading houses, managing tariffs and
//! running asynchronous billing jobs, plus Swagger UI, health and
//! Prometheus endpoints.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod validated_json;

pub use handlers::ApiState;
pub use router::create_api_router;
