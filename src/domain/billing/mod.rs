//! Billing job aggregate
//!
//! Job records, their lifecycle states and the store interface the
//! polling API reads from.

pub mod job;
pub mod store;

pub use job::{ApartmentCharge, BillingJob, JobState};
pub use store::JobStore;
