//! Billing job orchestration
//!
//! ## Architecture
//!
//! ```text
//! HTTP Handler ──► BillingDispatcher ──► tokio::spawn ──► BillingEngine
//!                        │                                     │
//!                  validate request                   read house + tariffs
//!                  insert pending job              write progress per apartment
//!                        │                                     │
//!                        └──────────── JobStore ◄──────────────┘
//!                                  (polled via GET)
//! ```
//!
//! - [`BillingDispatcher`] — validates requests, creates job records,
//!   spawns engine runs and owns per-job cancellation tokens.
//! - [`BillingEngine`] — the computation itself: consumption deltas,
//!   tariff application, per-apartment progress writes.

pub mod dispatcher;
pub mod engine;

pub use dispatcher::{create_billing_dispatcher, BillingDispatcher, SharedBillingDispatcher};
pub use engine::{BillingEngine, BillingRequest};
