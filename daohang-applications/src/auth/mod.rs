//! Authentication Module

pub mod credentials;

pub use credentials::AdminCredentials;
