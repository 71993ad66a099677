//! Dao-Hang Applications Layer
//!
//! This crate holds the two stateful pieces of the site on top of the key-value
//! store: admin sessions and the persisted navigation document.
//!
//! ## Features
//!
//! - **Opaque sessions**: random bearer tokens with absolute expiry, checked on every request
//! - **Document persistence**: whole-document load/save with a default fallback
//! - **Admin login**: a single configured identity compared by digest

use daohang_core::{DaohangConfig, DaohangError, KeyValueStore, NavigationDocument};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub mod auth;
pub mod navigation;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::AdminCredentials;
pub use navigation::{DocumentStore, SaveReceipt};
pub use session::{Session, SessionManager, SessionPolicy, SessionRecord};

/// Application layer errors
#[derive(Error, Debug)]
pub enum ApplicationError {
    /// The key-value store failed; nothing here retries
    #[error(transparent)]
    Storage(#[from] DaohangError),

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;

impl ApplicationError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

/// Facade wiring credentials, sessions and the document store to one backing store
pub struct DaohangApplication {
    credentials: AdminCredentials,
    sessions: SessionManager,
    documents: DocumentStore,
}

impl DaohangApplication {
    pub fn new(config: &DaohangConfig, store: Arc<dyn KeyValueStore>) -> Self {
        info!(
            site_name = config.site.site_name(),
            session_timeout_secs = config.security.session_timeout_secs,
            "Initializing Dao-Hang application"
        );

        Self {
            credentials: AdminCredentials::from_config(&config.security),
            sessions: SessionManager::new(store.clone(), SessionPolicy::from(&config.security)),
            documents: DocumentStore::new(store, &config.site),
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Check the submitted credentials and open a session for the admin.
    ///
    /// Returns `Ok(None)` for a wrong username or password.
    pub async fn login(&self, username: &str, password: &str) -> ApplicationResult<Option<String>> {
        if !self.credentials.verify(username, password) {
            warn!(username, "Rejected admin login");
            return Ok(None);
        }

        let token = self.sessions.create_session(username).await?;
        info!(username, "Admin logged in");
        Ok(Some(token))
    }

    pub async fn logout(&self, token: &str) -> ApplicationResult<()> {
        self.sessions.revoke_session(token).await
    }

    /// Current document, or the built-in default
    pub async fn navigation(&self) -> NavigationDocument {
        self.documents.load().await
    }
}
