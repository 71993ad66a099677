//! Configuration management
//!
//! Configuration is read once at startup (TOML file, then environment overlay) and
//! handed to the session manager and document store as immutable values.

use crate::error::{DaohangError, DaohangResult, ErrorContext};
use crate::types::{DEFAULT_DOCUMENT_VERSION, DEFAULT_SITE_DESCRIPTION, DEFAULT_SITE_NAME};
use crate::{config_error, validation_error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default session lifetime: 24 hours
pub const DEFAULT_SESSION_TIMEOUT_SECS: u64 = 86_400;

/// Longest accepted session lifetime: 365 days
pub const MAX_SESSION_TIMEOUT_SECS: u64 = 365 * 86_400;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DaohangConfig {
    pub site: SiteConfig,
    pub security: SecurityConfig,
    pub storage: StorageConfig,
}

/// Deployment-level overrides for the built-in document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Build version stamped on every saved document
    pub version: Option<String>,
}

impl SiteConfig {
    pub fn site_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_SITE_NAME)
    }

    pub fn site_description(&self) -> &str {
        self.description
            .as_deref()
            .unwrap_or(DEFAULT_SITE_DESCRIPTION)
    }

    pub fn build_version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_DOCUMENT_VERSION)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// The single admin identity
    pub admin_username: String,
    pub admin_password: String,
    pub session_timeout_secs: u64,
    /// Add the `Secure` attribute to session cookies
    pub secure_cookies: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            admin_username: String::new(),
            admin_password: String::new(),
            session_timeout_secs: DEFAULT_SESSION_TIMEOUT_SECS,
            secure_cookies: false,
        }
    }
}

impl SecurityConfig {
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: Option<String>,
}

impl DaohangConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> DaohangResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DaohangError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: DaohangConfig = toml::from_str(&content).map_err(|e| DaohangError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> DaohangResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| DaohangError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| DaohangError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Overlay values from process environment variables
    pub fn apply_env(self) -> DaohangResult<Self> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary variable lookup.
    ///
    /// Recognised variables: `ADMIN_USERNAME`, `ADMIN_PASSWORD`, `SITE_NAME`,
    /// `SITE_DESCRIPTION`, `VERSION`, `SESSION_TIMEOUT`, `ENVIRONMENT` and
    /// `DATABASE_URL`.
    pub fn apply_env_with<F>(mut self, lookup: F) -> DaohangResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(username) = lookup("ADMIN_USERNAME") {
            self.security.admin_username = username;
        }
        if let Some(password) = lookup("ADMIN_PASSWORD") {
            self.security.admin_password = password;
        }
        if let Some(name) = lookup("SITE_NAME").filter(|v| !v.is_empty()) {
            self.site.name = Some(name);
        }
        if let Some(description) = lookup("SITE_DESCRIPTION").filter(|v| !v.is_empty()) {
            self.site.description = Some(description);
        }
        if let Some(version) = lookup("VERSION").filter(|v| !v.is_empty()) {
            self.site.version = Some(version);
        }
        if let Some(timeout) = lookup("SESSION_TIMEOUT") {
            self.security.session_timeout_secs = timeout.trim().parse().map_err(|_| {
                config_error!(
                    format!("SESSION_TIMEOUT must be a number of seconds, got '{}'", timeout),
                    "config"
                )
            })?;
        }
        if let Some(environment) = lookup("ENVIRONMENT") {
            self.security.secure_cookies = environment.eq_ignore_ascii_case("production");
        }
        if let Some(database_url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.storage.backend = StorageBackend::Sqlite;
            self.storage.database_url = Some(database_url);
        }

        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> DaohangResult<()> {
        if self.security.admin_username.is_empty() {
            return Err(validation_error!(
                "Admin username must be set",
                "security.admin_username",
                "config"
            ));
        }

        if self.security.admin_password.is_empty() {
            return Err(validation_error!(
                "Admin password must be set",
                "security.admin_password",
                "config"
            ));
        }

        if self.security.session_timeout_secs == 0 {
            return Err(validation_error!(
                "Session timeout must be greater than 0",
                "security.session_timeout_secs",
                "config"
            ));
        }

        if self.security.session_timeout_secs > MAX_SESSION_TIMEOUT_SECS {
            return Err(validation_error!(
                format!(
                    "Session timeout must be at most {} seconds",
                    MAX_SESSION_TIMEOUT_SECS
                ),
                "security.session_timeout_secs",
                "config"
            ));
        }

        if self.storage.backend == StorageBackend::Sqlite && self.storage.database_url.is_none() {
            return Err(validation_error!(
                "The sqlite backend needs a database URL",
                "storage.database_url",
                "config"
            ));
        }

        Ok(())
    }
}
