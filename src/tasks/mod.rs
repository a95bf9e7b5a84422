//! Background Tasks Module
//!
//! Periodic maintenance that runs outside direct caller invocations.
//!
//! # Tasks
//! - Expiry sweep: evicts cache entries idle longer than the TTL

mod expiry;

pub use expiry::spawn_expiry_task;
