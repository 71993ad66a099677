//! Session Manager - issue, verify and revoke admin sessions
//!
//! Verification fails closed: a store error, an unreadable record or an expired
//! record all read as "not authenticated".

use super::{is_well_formed_token, session_key, Session, SessionPolicy, SessionRecord};
use crate::{ApplicationError, ApplicationResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use daohang_core::{KeyValueStore, PutOptions};
use rand::{rngs::OsRng, RngCore};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Random bytes per token (256 bits)
const TOKEN_BYTES: usize = 32;

/// Store-backed session manager
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    policy: SessionPolicy,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>, policy: SessionPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    /// Open a session for `identity` and return its token.
    ///
    /// The record carries an absolute expiry and the store is asked to evict it
    /// after the same timeout.
    pub async fn create_session(&self, identity: &str) -> ApplicationResult<String> {
        let expires_at = chrono::Duration::from_std(self.policy.timeout)
            .ok()
            .and_then(|timeout| Utc::now().checked_add_signed(timeout))
            .ok_or_else(|| {
                ApplicationError::config(format!(
                    "Session timeout out of range: {}s",
                    self.policy.timeout.as_secs()
                ))
            })?;

        let token = generate_token();
        let record = SessionRecord {
            owner: identity.to_string(),
            expires_at,
        };

        self.store
            .put(
                &session_key(&token),
                &serde_json::to_string(&record)?,
                PutOptions::with_ttl(self.policy.timeout),
            )
            .await?;

        info!(
            owner = identity,
            expires_at = %record.expires_at,
            "Created admin session"
        );
        Ok(token)
    }

    /// Whether `token` names a live session
    pub async fn verify_session(&self, token: &str) -> bool {
        self.lookup_session(token).await.is_some()
    }

    /// Resolve `token` to its session, or `None` when it is not authenticated.
    ///
    /// Expired records are deleted on the way out; a failed delete is only logged.
    pub async fn lookup_session(&self, token: &str) -> Option<Session> {
        if !is_well_formed_token(token) {
            debug!("Rejected malformed session token");
            return None;
        }

        let key = session_key(token);
        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Unknown session token");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Session lookup failed, treating as unauthenticated");
                return None;
            }
        };

        let record: SessionRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Unreadable session record");
                return None;
            }
        };

        if record.is_expired_at(Utc::now()) {
            debug!(owner = %record.owner, "Session expired");
            if let Err(e) = self.store.delete(&key).await {
                warn!(error = %e, "Failed to delete expired session");
            }
            return None;
        }

        Some(Session {
            token: token.to_string(),
            owner: record.owner,
            expires_at: record.expires_at,
        })
    }

    /// End a session. Revoking an unknown token succeeds.
    pub async fn revoke_session(&self, token: &str) -> ApplicationResult<()> {
        if !is_well_formed_token(token) {
            return Ok(());
        }

        self.store.delete(&session_key(token)).await?;
        info!("Revoked admin session");
        Ok(())
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{DeleteFailsStore, FailingStore, RecordingStore};
    use daohang_core::MemoryKvStore;
    use std::collections::HashSet;
    use std::time::Duration;

    fn manager_with(store: Arc<dyn KeyValueStore>) -> SessionManager {
        SessionManager::new(store, SessionPolicy::default())
    }

    async fn insert_record(store: &MemoryKvStore, token: &str, record: &SessionRecord) {
        store
            .put(
                &session_key(token),
                &serde_json::to_string(record).unwrap(),
                PutOptions::default(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_then_verify() {
        let store = MemoryKvStore::new();
        let manager = manager_with(Arc::new(store.clone()));

        let token = manager.create_session("admin").await.unwrap();
        assert!(manager.verify_session(&token).await);

        let session = manager.lookup_session(&token).await.unwrap();
        assert_eq!(session.owner, "admin");
        assert!(session.expires_at > Utc::now());
        assert_eq!(store.keys_with_prefix("session_").await, vec![session_key(&token)]);
    }

    #[tokio::test]
    async fn test_tokens_are_unique_and_url_safe() {
        let manager = manager_with(Arc::new(MemoryKvStore::new()));

        let mut seen = HashSet::new();
        for _ in 0..64 {
            let token = manager.create_session("admin").await.unwrap();
            assert_eq!(token.len(), 43);
            assert!(is_well_formed_token(&token));
            assert!(seen.insert(token));
        }
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_tokens() {
        let manager = manager_with(Arc::new(MemoryKvStore::new()));

        assert!(!manager.verify_session("").await);
        assert!(!manager.verify_session("never-issued").await);
        assert!(!manager.verify_session("a b").await);
        assert!(!manager.verify_session(&"x".repeat(500)).await);
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected_and_removed() {
        let store = MemoryKvStore::new();
        let manager = manager_with(Arc::new(store.clone()));
        let record = SessionRecord {
            owner: "admin".to_string(),
            expires_at: Utc::now() - chrono::Duration::seconds(5),
        };
        insert_record(&store, "stale-token", &record).await;

        assert!(!manager.verify_session("stale-token").await);
        assert!(store.get(&session_key("stale-token")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_short_timeout_expires() {
        let manager = SessionManager::new(
            Arc::new(MemoryKvStore::new()),
            SessionPolicy {
                timeout: Duration::from_millis(1100),
            },
        );

        let token = manager.create_session("admin").await.unwrap();
        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert!(!manager.verify_session(&token).await);
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let manager = manager_with(Arc::new(MemoryKvStore::new()));
        let token = manager.create_session("admin").await.unwrap();

        manager.revoke_session(&token).await.unwrap();
        assert!(!manager.verify_session(&token).await);

        manager.revoke_session(&token).await.unwrap();
        manager.revoke_session("never-issued").await.unwrap();
        manager.revoke_session("").await.unwrap();
    }

    #[tokio::test]
    async fn test_unreadable_record_is_not_authenticated() {
        let store = MemoryKvStore::new();
        store
            .put(&session_key("garbled"), "{not json", PutOptions::default())
            .await
            .unwrap();

        let manager = manager_with(Arc::new(store));
        assert!(!manager.verify_session("garbled").await);
    }

    #[tokio::test]
    async fn test_store_failure_fails_closed() {
        let manager = manager_with(Arc::new(FailingStore));

        assert!(!manager.verify_session("some-token").await);
        assert!(matches!(
            manager.create_session("admin").await,
            Err(ApplicationError::Storage(_))
        ));
        assert!(manager.revoke_session("some-token").await.is_err());
    }

    #[tokio::test]
    async fn test_failed_cleanup_still_rejects() {
        let inner = MemoryKvStore::new();
        let record = SessionRecord {
            owner: "admin".to_string(),
            expires_at: Utc::now() - chrono::Duration::seconds(1),
        };
        insert_record(&inner, "stale", &record).await;

        let manager = manager_with(Arc::new(DeleteFailsStore::new(inner.clone())));
        assert!(!manager.verify_session("stale").await);
        assert!(inner.get(&session_key("stale")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_out_of_range_timeout_is_a_config_error() {
        let store = MemoryKvStore::new();
        let manager = SessionManager::new(
            Arc::new(store.clone()),
            SessionPolicy {
                timeout: Duration::from_secs(100_000_000_000_000),
            },
        );

        assert!(matches!(
            manager.create_session("admin").await,
            Err(ApplicationError::Config { .. })
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_passes_timeout_as_store_ttl() {
        let store = RecordingStore::default();
        let policy = SessionPolicy {
            timeout: Duration::from_secs(600),
        };
        let manager = SessionManager::new(Arc::new(store.clone()), policy);

        let token = manager.create_session("admin").await.unwrap();

        let puts = store.puts().await;
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].0, session_key(&token));
        assert_eq!(puts[0].1, PutOptions::with_ttl(policy.timeout));
        assert_eq!(puts[0].1.expiration_ttl, Some(Duration::from_secs(600)));
    }
}
