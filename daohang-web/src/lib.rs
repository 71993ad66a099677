//! Dao-Hang Web Server
//!
//! Serves the public navigation homepage, the admin login flow and the small JSON
//! API the admin panel saves through.

pub mod auth;
#[cfg(feature = "sqlite")]
pub mod database;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod templates;

// Re-export main types
pub use server::DaohangServer;
pub use state::AppState;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use daohang_core::DaohangError;
use tower_http::trace::TraceLayer;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Public pages
        .route("/", get(handlers::home))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/logout", get(handlers::logout).post(handlers::logout))
        // Admin panel
        .route("/admin", get(handlers::admin_panel))
        // JSON API
        .nest("/api", routes::api_routes(state.clone()))
        .fallback(handlers::page_not_found)
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .with_state(state)
}

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup("DAOHANG_HOST").unwrap_or(defaults.host),
            port: lookup("DAOHANG_PORT")
                .and_then(|port| port.parse().ok())
                .unwrap_or(defaults.port),
        }
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] DaohangError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_web_config_from_env() {
        let vars: HashMap<&str, &str> = [("DAOHANG_HOST", "0.0.0.0"), ("DAOHANG_PORT", "9000")]
            .into_iter()
            .collect();

        let config = WebConfig::from_env_with(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_web_config_ignores_bad_values() {
        let config = WebConfig::from_env_with(|key| match key {
            "DAOHANG_PORT" => Some("eighty".to_string()),
            _ => None,
        });

        assert_eq!(config.port, 8787);
        assert_eq!(config.host, "127.0.0.1");
    }
}
