//! Job store implementations

mod memory;

pub use memory::InMemoryJobStore;
