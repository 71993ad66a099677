//! Admin credential check
//!
//! The configured pair is kept only as SHA-256 digests. Submitted values are
//! hashed and compared digest-to-digest, so comparison time does not depend on
//! where the plaintexts first differ.

use daohang_core::SecurityConfig;
use sha2::{Digest, Sha256};
use std::fmt;

type Fingerprint = [u8; 32];

/// The single admin identity
#[derive(Clone)]
pub struct AdminCredentials {
    username: Fingerprint,
    password: Fingerprint,
    configured: bool,
}

impl AdminCredentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: fingerprint(username),
            password: fingerprint(password),
            configured: !username.is_empty() && !password.is_empty(),
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(&config.admin_username, &config.admin_password)
    }

    /// Whether the submitted pair matches. An unconfigured identity matches nothing.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        if !self.configured {
            return false;
        }

        let username_ok = same(&fingerprint(username), &self.username);
        let password_ok = same(&fingerprint(password), &self.password);
        username_ok & password_ok
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("configured", &self.configured)
            .finish_non_exhaustive()
    }
}

fn fingerprint(value: &str) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hasher.finalize().into()
}

fn same(a: &Fingerprint, b: &Fingerprint) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
