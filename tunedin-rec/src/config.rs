//! Configuration resolution for tunedin-rec
//!
//! Catalog client credentials resolve with ENV → TOML priority. Without any
//! credentials the token endpoint is treated as a token-vending proxy.

use crate::catalog::auth::ClientCredentials;
use crate::catalog::{HttpTokenProvider, SessionContext, SpotifyCatalog};
use crate::pipeline::RecommendationPipeline;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tunedin_common::config::{env_value, TomlConfig};
use tunedin_common::{Error, Result};

pub const CLIENT_ID_ENV: &str = "TUNEDIN_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "TUNEDIN_CLIENT_SECRET";

/// Validate credential value (non-empty, non-whitespace)
pub fn is_valid_credential(value: &str) -> bool {
    !value.trim().is_empty()
}

fn pair(
    id: Option<String>,
    secret: Option<String>,
    source: &str,
) -> Result<Option<ClientCredentials>> {
    let id = id.filter(|v| is_valid_credential(v));
    let secret = secret.filter(|v| is_valid_credential(v));
    match (id, secret) {
        (Some(client_id), Some(client_secret)) => Ok(Some(ClientCredentials {
            client_id,
            client_secret,
        })),
        (None, None) => Ok(None),
        _ => Err(Error::Config(format!(
            "Incomplete catalog credentials in {}: client id and secret must both be set",
            source
        ))),
    }
}

/// Resolve catalog client credentials
///
/// **Priority:** ENV → TOML. `Ok(None)` means proxy mode.
pub fn resolve_client_credentials(toml_config: &TomlConfig) -> Result<Option<ClientCredentials>> {
    let from_env = pair(env_value(CLIENT_ID_ENV), env_value(CLIENT_SECRET_ENV), "environment")?;
    let from_toml = pair(
        toml_config.catalog.client_id.clone(),
        toml_config.catalog.client_secret.clone(),
        "TOML config",
    )?;

    if from_env.is_some() && from_toml.is_some() {
        warn!(
            "Catalog credentials found in environment and TOML config. \
             Using environment (highest priority)."
        );
    }

    if let Some(creds) = from_env {
        info!("Catalog credentials loaded from environment");
        return Ok(Some(creds));
    }
    if let Some(creds) = from_toml {
        info!("Catalog credentials loaded from TOML config");
        return Ok(Some(creds));
    }

    info!(
        endpoint = %toml_config.catalog.token_endpoint,
        "No catalog credentials configured, using token proxy"
    );
    Ok(None)
}

/// Wire the catalog client, token cache and pipeline from configuration
pub fn build_pipeline(toml_config: &TomlConfig) -> Result<RecommendationPipeline> {
    let catalog_cfg = &toml_config.catalog;
    let timeout = Duration::from_secs(catalog_cfg.http_timeout_secs.max(1));

    let credentials = resolve_client_credentials(toml_config)?;
    let provider = HttpTokenProvider::new(catalog_cfg.token_endpoint.clone(), credentials, timeout)
        .map_err(|e| Error::Config(format!("Token client setup failed: {}", e)))?;
    let session = SessionContext::new(Arc::new(provider));

    let catalog = SpotifyCatalog::new(
        catalog_cfg.api_base_url.clone(),
        session,
        catalog_cfg.requests_per_second,
        timeout,
    )
    .map_err(|e| Error::Config(format!("Catalog client setup failed: {}", e)))?;

    Ok(RecommendationPipeline::new(
        Arc::new(catalog),
        toml_config.search.clone(),
    ))
}
