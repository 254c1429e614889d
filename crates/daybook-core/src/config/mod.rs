//! Bootstrap configuration for client apps.
//!
//! Provides a unified `BootstrapConfig` struct used by the CLI to discover the
//! hosted backend (Supabase project URL, anon key and the photo bucket).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::{compact_text, is_http_url, normalize_text_option};

const BOOTSTRAP_SCHEMA_VERSION: u32 = 1;
const BOOTSTRAP_HTTP_TIMEOUT_SECS: u64 = 4;

/// Bucket holding entry photos when no override is configured.
pub const DEFAULT_PHOTO_BUCKET: &str = "diary-photos";

/// Timeout applied to every backend request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build- or profile-provisioned client configuration.
///
/// These values are safe-to-ship public endpoints/keys. Secret credentials
/// must never be stored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub bootstrap_manifest_url: Option<String>,
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_anon_key: Option<String>,
    #[serde(default)]
    pub photo_bucket: Option<String>,
}

impl BootstrapConfig {
    /// Read `SUPABASE_URL`, `SUPABASE_ANON_KEY`, `DAYBOOK_PHOTO_BUCKET` and
    /// `DAYBOOK_BOOTSTRAP_URL` from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bootstrap_manifest_url: normalize_text_option(lookup("DAYBOOK_BOOTSTRAP_URL")),
            supabase_url: normalize_text_option(lookup("SUPABASE_URL")),
            supabase_anon_key: normalize_text_option(lookup("SUPABASE_ANON_KEY")),
            photo_bucket: normalize_text_option(lookup("DAYBOOK_PHOTO_BUCKET")),
        }
    }

    /// Photo bucket name, falling back to [`DEFAULT_PHOTO_BUCKET`].
    pub fn photo_bucket(&self) -> String {
        normalize_text_option(self.photo_bucket.clone())
            .unwrap_or_else(|| DEFAULT_PHOTO_BUCKET.to_string())
    }

    /// Project URL and anon key when both are present.
    pub fn supabase_endpoint(&self) -> Option<(String, String)> {
        let url = normalize_text_option(self.supabase_url.clone())?;
        let anon_key = normalize_text_option(self.supabase_anon_key.clone())?;
        Some((url.trim_end_matches('/').to_string(), anon_key))
    }
}

/// Resolve runtime bootstrap config by fetching the manifest URL.
///
/// If `bootstrap_manifest_url` is set, fetch/parse/validation failures are
/// returned as errors instead of falling back to embedded values.
pub async fn resolve_bootstrap_config(
    fallback: BootstrapConfig,
) -> Result<BootstrapConfig, String> {
    let Some(manifest_url) = normalize_text_option(fallback.bootstrap_manifest_url.clone()) else {
        return Ok(fallback);
    };

    fetch_bootstrap_manifest(&manifest_url).await
}

/// Parse a bootstrap manifest from a raw JSON payload.
pub fn parse_bootstrap_manifest(
    payload: &str,
    manifest_url: &str,
) -> Result<BootstrapConfig, String> {
    let manifest: ManagedBootstrapManifest = serde_json::from_str(payload)
        .map_err(|error| format!("invalid bootstrap manifest JSON: {error}"))?;
    manifest.into_runtime_config(manifest_url)
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ManagedBootstrapManifest {
    schema_version: u32,
    manifest_version: String,
    supabase_url: String,
    supabase_anon_key: String,
    #[serde(default)]
    photo_bucket: Option<String>,
}

impl ManagedBootstrapManifest {
    fn into_runtime_config(self, manifest_url: &str) -> Result<BootstrapConfig, String> {
        if self.schema_version != BOOTSTRAP_SCHEMA_VERSION {
            return Err(format!(
                "unsupported bootstrap schema_version {} (expected {})",
                self.schema_version, BOOTSTRAP_SCHEMA_VERSION
            ));
        }
        if self.manifest_version.trim().is_empty() {
            return Err("bootstrap manifest_version must not be empty".to_string());
        }

        let supabase_url = normalize_required_http_url(self.supabase_url, "supabase_url")?;
        let supabase_anon_key =
            normalize_required_value(self.supabase_anon_key, "supabase_anon_key")?;

        Ok(BootstrapConfig {
            bootstrap_manifest_url: Some(manifest_url.to_string()),
            supabase_url: Some(supabase_url),
            supabase_anon_key: Some(supabase_anon_key),
            photo_bucket: normalize_text_option(self.photo_bucket),
        })
    }
}

async fn fetch_bootstrap_manifest(url: &str) -> Result<BootstrapConfig, String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(BOOTSTRAP_HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|error| format!("failed to build bootstrap HTTP client: {error}"))?;

    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|error| format!("bootstrap request failed: {error}"))?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|error| format!("failed to read bootstrap error response body: {error}"))?;
        return Err(format!(
            "bootstrap endpoint returned HTTP {status}: {}",
            compact_text(&body)
        ));
    }

    let body = response
        .text()
        .await
        .map_err(|error| format!("failed to read bootstrap response body: {error}"))?;
    parse_bootstrap_manifest(&body, url)
}

fn normalize_required_value(raw: String, field: &str) -> Result<String, String> {
    normalize_text_option(Some(raw)).ok_or_else(|| format!("bootstrap field '{field}' is required"))
}

fn normalize_required_http_url(raw: String, field: &str) -> Result<String, String> {
    let value = normalize_required_value(raw, field)?;
    if is_http_url(&value) {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(format!(
            "bootstrap field '{field}' must include http:// or https://"
        ))
    }
}
