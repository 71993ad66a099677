//! Navigation document persistence
//!
//! The whole document lives under a single key and every save replaces it.

use crate::{ApplicationError, ApplicationResult};
use chrono::{DateTime, Utc};
use daohang_core::performance::measure_async;
use daohang_core::{
    log_operation_error, log_operation_start, log_operation_success, KeyValueStore,
    NavigationDocument, PutOptions, SiteConfig, NAV_DATA_KEY,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of a successful save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReceipt {
    pub updated_at: DateTime<Utc>,
}

/// Values seeded into fresh documents and stamped on saves
#[derive(Debug, Clone)]
struct DocumentDefaults {
    site_name: String,
    description: String,
    version: String,
}

/// Whole-document store on top of the key-value store
pub struct DocumentStore {
    store: Arc<dyn KeyValueStore>,
    defaults: DocumentDefaults,
}

impl DocumentStore {
    pub fn new(store: Arc<dyn KeyValueStore>, site: &SiteConfig) -> Self {
        Self {
            store,
            defaults: DocumentDefaults {
                site_name: site.site_name().to_string(),
                description: site.site_description().to_string(),
                version: site.build_version().to_string(),
            },
        }
    }

    /// A fresh built-in document carrying the configured name and description
    pub fn default_document(&self) -> NavigationDocument {
        NavigationDocument::builtin(&self.defaults.site_name, &self.defaults.description)
    }

    /// Current document. Falls back to the default when nothing usable is stored.
    pub async fn load(&self) -> NavigationDocument {
        match self.store.get(NAV_DATA_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(document) => document,
                Err(e) => {
                    warn!(error = %e, "Stored navigation document is corrupt, serving defaults");
                    self.default_document()
                }
            },
            Ok(None) => {
                debug!("No navigation document stored yet, serving defaults");
                self.default_document()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read navigation document, serving defaults");
                self.default_document()
            }
        }
    }

    /// Replace the stored document.
    ///
    /// Stamps `updatedAt` and `version` before writing. Concurrent saves are
    /// last-write-wins.
    ///
    /// `updatedAt` is this host's clock, so it only moves forward across
    /// instances whose clocks agree.
    pub async fn save(&self, document: NavigationDocument) -> ApplicationResult<SaveReceipt> {
        measure_async("navigation.save", self.write(document)).await
    }

    /// Replace the stored document only if its `updatedAt` still equals `expected`.
    ///
    /// Nothing stored (or nothing readable) counts as unchanged. The check and the
    /// write are separate store calls, so a save landing in between still wins.
    pub async fn save_if_unchanged(
        &self,
        document: NavigationDocument,
        expected: DateTime<Utc>,
    ) -> ApplicationResult<SaveReceipt> {
        if let Some(raw) = self.store.get(NAV_DATA_KEY).await? {
            if let Ok(current) = serde_json::from_str::<NavigationDocument>(&raw) {
                if current.updated_at != expected {
                    warn!(
                        expected = %expected,
                        stored = %current.updated_at,
                        "Refusing to overwrite a newer navigation document"
                    );
                    return Err(ApplicationError::conflict(format!(
                        "Document was modified at {}, expected {}",
                        current.updated_at.to_rfc3339(),
                        expected.to_rfc3339()
                    )));
                }
            }
        }

        self.save(document).await
    }

    async fn write(&self, mut document: NavigationDocument) -> ApplicationResult<SaveReceipt> {
        log_operation_start!("navigation.save", site_name = %document.site_name);

        let updated_at = Utc::now();
        document.updated_at = updated_at;
        document.version = self.defaults.version.clone();

        let serialized = serde_json::to_string(&document)?;
        if let Err(e) = self
            .store
            .put(NAV_DATA_KEY, &serialized, PutOptions::default())
            .await
        {
            log_operation_error!("navigation.save", e);
            return Err(e.into());
        }

        log_operation_success!(
            "navigation.save",
            categories = document.categories.len(),
            bytes = serialized.len()
        );
        Ok(SaveReceipt { updated_at })
    }
}
