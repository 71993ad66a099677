//! Session Types and Structures

use chrono::{DateTime, Utc};
use daohang_core::SecurityConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Prefix of every session key in the key-value store
pub const SESSION_KEY_PREFIX: &str = "session_";

/// Upper bound on the length of a presented token
pub const MAX_TOKEN_LENGTH: usize = 128;

/// Store key holding the record for `token`
pub fn session_key(token: &str) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, token)
}

/// Whether `token` could have been issued by this system.
///
/// Anything else is rejected before the store is consulted.
pub fn is_well_formed_token(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= MAX_TOKEN_LENGTH
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Persisted part of a session, stored under `session_<token>`.
///
/// Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub owner: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// A session is valid only while `expires_at` is strictly in the future
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// A validated session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub owner: String,
    pub expires_at: DateTime<Utc>,
}

/// Session lifetime policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    pub timeout: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(daohang_core::DEFAULT_SESSION_TIMEOUT_SECS),
        }
    }
}

impl From<&SecurityConfig> for SessionPolicy {
    fn from(config: &SecurityConfig) -> Self {
        Self {
            timeout: config.session_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape_checks() {
        assert!(is_well_formed_token("abcDEF123-_"));
        assert!(is_well_formed_token("0b0d1c3e-4e7a-4a55-9a47-1f0e7c0e9a10"));
        assert!(!is_well_formed_token(""));
        assert!(!is_well_formed_token("has space"));
        assert!(!is_well_formed_token("semi;colon"));
        assert!(!is_well_formed_token("../nav_data"));
        assert!(!is_well_formed_token(&"a".repeat(MAX_TOKEN_LENGTH + 1)));
    }

    #[test]
    fn test_record_wire_format() {
        let record = SessionRecord {
            owner: "admin".to_string(),
            expires_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["owner"], "admin");
        assert_eq!(json["expiresAt"], 1_700_000_000);
    }

    #[test]
    fn test_expiry_is_strict() {
        let now = Utc::now();
        let record = SessionRecord {
            owner: "admin".to_string(),
            expires_at: now,
        };

        assert!(record.is_expired_at(now));
        assert!(!record.is_expired_at(now - chrono::Duration::seconds(1)));
    }
}
