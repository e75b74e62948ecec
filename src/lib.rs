//! tumbuh-core: client-side engine for the Tumbuh child-growth tracker.
//!
//! Wraps the Tumbuh backend API behind typed entity stores (children,
//! growth measurements, milestone screening, immunizations, stimulation
//! recommendations), persists session and UI state through a pluggable
//! key-value storage layer, and carries the corrected-age engine used to
//! interpret growth data for premature infants.

pub mod age;
pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod storage;
pub mod store;

#[cfg(test)]
mod testutil;

pub use age::{calculate_corrected_age, format_age, AgeResult};
pub use api::{ApiClient, ApiError};
pub use auth::{Session, TokenProvider};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{ChildStore, MilestoneStore, StoreError};
