//! Navigation Document Module

pub mod store;

pub use store::{DocumentStore, SaveReceipt};
