//! HTTP request handlers for the Dao-Hang web server
//!
//! This module contains all the HTTP request handlers organized by functionality.

pub mod api;
pub mod pages;
pub mod types;

pub use api::*;
pub use pages::*;
pub use types::*;
