//! Services module for business logic
//!
//! This module contains the driver that coordinates the adapters.

pub mod digest;

pub use digest::{DigestRunner, RunSummary};
