//! Persistence collaborator contract for the fee tracker.
//!
//! This crate provides:
//! - `FeeStore` trait — the read/update surface the reminder engine needs
//! - `MemoryStore` — an in-memory implementation for tests and local runs
//!
//! Real storage backends live behind the same trait; their schema and query
//! mechanics are not this crate's concern.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use traits::FeeStore;
