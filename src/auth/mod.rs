//! Authentication collaborator surface.
//!
//! This module provides:
//! - `TokenProvider`: the seam the `ApiClient` pulls bearer tokens through
//! - `Session`: persisted session state with expiry, cleared on logout
//!
//! Login flows themselves (password, OTP, Google) live server-side and in
//! the UI layer; this core only consumes the resulting token.

pub mod session;

pub use session::{Session, SessionData, StaticToken, TokenProvider, UserProfile};
