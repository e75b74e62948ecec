//! REST API client module for the Tumbuh backend.
//!
//! This module provides the `ApiClient` used by every entity store for
//! authenticated JSON requests, and the `ApiError` taxonomy that all
//! remote-call failures are normalized through.
//!
//! The API uses JWT bearer token authentication; the token comes from
//! the injected `TokenProvider`, never from ambient state.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::{ApiError, ErrorBody};
