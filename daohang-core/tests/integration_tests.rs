//! Integration tests for daohang-core infrastructure

use daohang_core::{
    config_error, storage_error, validation_error, DaohangConfig, DaohangError, KeyValueStore,
    LoggingConfig, MemoryKvStore, NavigationDocument, PutOptions, StorageBackend,
    DEFAULT_SESSION_TIMEOUT_SECS, DEFAULT_SITE_NAME, MAX_SESSION_TIMEOUT_SECS, NAV_DATA_KEY,
};
use std::collections::HashMap;
use std::time::Duration;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_error_handling() {
    let error = storage_error!("store unreachable", "test_component");

    match &error {
        DaohangError::Storage {
            message, context, ..
        } => {
            assert_eq!(message, "store unreachable");
            assert_eq!(context.component, "test_component");
            assert!(!context.error_id.is_empty());
        }
        _ => panic!("Expected Storage error"),
    }

    // Logging must not panic without a subscriber
    error.log();
    assert!(error.is_recoverable());

    let config_error = config_error!("bad value", "test");
    assert!(!config_error.is_recoverable());
    assert!(config_error.context().is_some());

    let validation = validation_error!("empty", "security.admin_username", "test");
    match validation {
        DaohangError::Validation { field, .. } => {
            assert_eq!(field.as_deref(), Some("security.admin_username"))
        }
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_default_config() {
    let config = DaohangConfig::default();

    assert_eq!(config.site.site_name(), DEFAULT_SITE_NAME);
    assert_eq!(config.site.build_version(), "1.0.0");
    assert_eq!(
        config.security.session_timeout(),
        Duration::from_secs(DEFAULT_SESSION_TIMEOUT_SECS)
    );
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert!(!config.security.secure_cookies);

    // No admin identity configured yet
    assert!(config.validate().is_err());
}

#[test]
fn test_env_overlay() {
    let config = DaohangConfig::default()
        .apply_env_with(env_from(&[
            ("ADMIN_USERNAME", "root"),
            ("ADMIN_PASSWORD", "hunter2"),
            ("SITE_NAME", "Team Links"),
            ("SITE_DESCRIPTION", ""),
            ("VERSION", "2.3.0"),
            ("SESSION_TIMEOUT", "3600"),
            ("ENVIRONMENT", "production"),
            ("DATABASE_URL", "sqlite:data/daohang.db"),
        ]))
        .unwrap();

    assert_eq!(config.security.admin_username, "root");
    assert_eq!(config.security.admin_password, "hunter2");
    assert_eq!(config.site.site_name(), "Team Links");
    // Empty overrides fall back to the built-in description
    assert_eq!(config.site.description, None);
    assert_eq!(config.site.build_version(), "2.3.0");
    assert_eq!(config.security.session_timeout_secs, 3600);
    assert!(config.security.secure_cookies);
    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    assert!(config.validate().is_ok());
}

#[test]
fn test_env_overlay_rejects_bad_timeout() {
    let result =
        DaohangConfig::default().apply_env_with(env_from(&[("SESSION_TIMEOUT", "a day")]));

    assert!(matches!(result, Err(DaohangError::Config { .. })));
}

#[test]
fn test_validate_rejects_zero_timeout_and_missing_database() {
    let mut config = DaohangConfig::default();
    config.security.admin_username = "admin".to_string();
    config.security.admin_password = "secret".to_string();
    assert!(config.validate().is_ok());

    config.security.session_timeout_secs = 0;
    assert!(config.validate().is_err());

    config.security.session_timeout_secs = 60;
    config.storage.backend = StorageBackend::Sqlite;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_oversized_timeout() {
    let config = DaohangConfig::default()
        .apply_env_with(env_from(&[
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_PASSWORD", "pw"),
            ("SESSION_TIMEOUT", "100000000000000"),
        ]))
        .unwrap();

    assert!(matches!(
        config.validate(),
        Err(DaohangError::Validation { .. })
    ));

    let mut config = config;
    config.security.session_timeout_secs = MAX_SESSION_TIMEOUT_SECS;
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daohang.toml");

    let mut config = DaohangConfig::default();
    config.site.name = Some("Bookmarks".to_string());
    config.security.admin_username = "admin".to_string();
    config.security.admin_password = "secret".to_string();
    config.save_to_file(&path).unwrap();

    let loaded = DaohangConfig::from_file(&path).unwrap();
    assert_eq!(loaded.site.site_name(), "Bookmarks");
    assert_eq!(loaded.security.admin_username, "admin");
    assert_eq!(loaded.security.session_timeout_secs, DEFAULT_SESSION_TIMEOUT_SECS);
}

#[test]
fn test_partial_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daohang.toml");
    std::fs::write(&path, "[security]\nadmin_username = \"ops\"\n").unwrap();

    let loaded = DaohangConfig::from_file(&path).unwrap();
    assert_eq!(loaded.security.admin_username, "ops");
    assert_eq!(loaded.security.session_timeout_secs, DEFAULT_SESSION_TIMEOUT_SECS);
    assert_eq!(loaded.site.site_name(), DEFAULT_SITE_NAME);
}

#[test]
fn test_missing_config_file() {
    let result = DaohangConfig::from_file("/definitely/not/here.toml");
    assert!(matches!(result, Err(DaohangError::Config { .. })));
}

#[test]
fn test_logging_filter_directives() {
    let config = LoggingConfig::default();
    assert!(config.env_filter().is_ok());

    let broken = LoggingConfig {
        filter_directives: vec!["daohang_core=loud".to_string()],
        ..LoggingConfig::default()
    };
    assert!(broken.env_filter().is_err());
}

#[tokio::test]
async fn test_memory_store_holds_serialized_document() {
    let store = MemoryKvStore::new();
    let doc = NavigationDocument::builtin("Home", "Links");

    store
        .put(
            NAV_DATA_KEY,
            &serde_json::to_string(&doc).unwrap(),
            PutOptions::default(),
        )
        .await
        .unwrap();

    let raw = store.get(NAV_DATA_KEY).await.unwrap().unwrap();
    let decoded: NavigationDocument = serde_json::from_str(&raw).unwrap();
    assert_eq!(decoded, doc);
}
