pub mod billing;

// Re-export key types for convenience
pub use billing::{
    create_billing_dispatcher, BillingDispatcher, BillingEngine, BillingRequest,
    SharedBillingDispatcher,
};
