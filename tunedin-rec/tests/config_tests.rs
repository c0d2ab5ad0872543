//! Catalog credential resolution tests
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate TUNEDIN_CLIENT_ID / TUNEDIN_CLIENT_SECRET are marked
//! with #[serial].

use serial_test::serial;
use tunedin_common::config::TomlConfig;
use tunedin_rec::config::{
    build_pipeline, is_valid_credential, resolve_client_credentials, CLIENT_ID_ENV,
    CLIENT_SECRET_ENV,
};

fn clear_env() {
    std::env::remove_var(CLIENT_ID_ENV);
    std::env::remove_var(CLIENT_SECRET_ENV);
}

fn toml_with_credentials(id: &str, secret: &str) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.catalog.client_id = Some(id.to_string());
    config.catalog.client_secret = Some(secret.to_string());
    config
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    std::env::set_var(CLIENT_ID_ENV, "env-id");
    std::env::set_var(CLIENT_SECRET_ENV, "env-secret");

    let creds = resolve_client_credentials(&toml_with_credentials("toml-id", "toml-secret"))
        .unwrap()
        .unwrap();
    assert_eq!(creds.client_id, "env-id");
    assert_eq!(creds.client_secret, "env-secret");

    clear_env();
}

#[test]
#[serial]
fn test_toml_used_without_env() {
    clear_env();

    let creds = resolve_client_credentials(&toml_with_credentials("toml-id", "toml-secret"))
        .unwrap()
        .unwrap();
    assert_eq!(creds.client_id, "toml-id");
}

#[test]
#[serial]
fn test_no_credentials_means_proxy_mode() {
    clear_env();
    assert!(resolve_client_credentials(&TomlConfig::default()).unwrap().is_none());
}

#[test]
#[serial]
fn test_half_configured_env_is_error() {
    clear_env();
    std::env::set_var(CLIENT_ID_ENV, "env-id");

    let result = resolve_client_credentials(&TomlConfig::default());
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("environment"));

    clear_env();
}

#[test]
#[serial]
fn test_whitespace_env_is_ignored() {
    clear_env();
    std::env::set_var(CLIENT_ID_ENV, "   ");
    std::env::set_var(CLIENT_SECRET_ENV, "");

    let creds = resolve_client_credentials(&toml_with_credentials("toml-id", "toml-secret"))
        .unwrap()
        .unwrap();
    assert_eq!(creds.client_id, "toml-id");

    clear_env();
}

#[test]
#[serial]
fn test_build_pipeline_from_defaults() {
    clear_env();
    let config = TomlConfig::default();
    let pipeline = build_pipeline(&config).unwrap();
    assert_eq!(pipeline.config(), &config.search);
}

#[test]
fn test_is_valid_credential() {
    assert!(is_valid_credential("abc"));
    assert!(!is_valid_credential(""));
    assert!(!is_valid_credential("  \t"));
}
