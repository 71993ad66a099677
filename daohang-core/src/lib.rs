//! Dao-Hang Core - Core data structures and trait definitions
//!
//! This module defines the navigation document model, the key-value store
//! abstraction and the shared error, logging and configuration infrastructure.

pub mod config;
pub mod error;
pub mod kv;
pub mod logging;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::*;
pub use kv::MemoryKvStore;
pub use logging::*;
pub use traits::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tokio;
pub use tracing;
