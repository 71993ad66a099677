//! Session Management Module
//!
//! Admin sessions are opaque random tokens whose records live in the key-value
//! store under `session_<token>`. Nothing is cached in process memory, so a
//! revoked or expired token is rejected on the very next request.

pub mod manager;
pub mod types;

pub use manager::SessionManager;
pub use types::*;
