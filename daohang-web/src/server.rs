//! Dao-Hang Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebConfig, WebError, WebResult};
use axum::serve;
use daohang_core::DaohangConfig;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Main Dao-Hang web server
pub struct DaohangServer {
    config: WebConfig,
    state: AppState,
}

impl DaohangServer {
    /// Create a new server
    pub async fn new(config: WebConfig, settings: DaohangConfig) -> WebResult<Self> {
        let state = AppState::new(config.clone(), settings).await?;

        Ok(Self { config, state })
    }

    /// Start the web server and run until Ctrl-C
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("Starting Dao-Hang web server");

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("Server listening on http://{}", address);

        if let Err(e) = serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        info!("Server shut down");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Builder for DaohangServer
pub struct DaohangServerBuilder {
    config: WebConfig,
    settings: DaohangConfig,
}

impl DaohangServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: WebConfig::default(),
            settings: DaohangConfig::default(),
        }
    }

    /// Start from an existing web configuration
    pub fn config(mut self, config: WebConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Site, security and storage settings
    pub fn settings(mut self, settings: DaohangConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Build the server
    pub async fn build(self) -> WebResult<DaohangServer> {
        DaohangServer::new(self.config, self.settings).await
    }
}

impl Default for DaohangServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_creation() {
        let server = DaohangServerBuilder::new().build().await;
        assert!(server.is_ok());
    }

    #[test]
    fn test_server_builder() {
        let builder = DaohangServerBuilder::new().host("localhost").port(3000);

        assert_eq!(builder.config.host, "localhost");
        assert_eq!(builder.config.port, 3000);
    }
}
