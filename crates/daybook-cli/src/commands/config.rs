use daybook_core::config::BootstrapConfig;

use crate::cli::ConfigCommands;
use crate::commands::common::resolve_profile_config;
use crate::config_profiles::{is_http_url, normalize_text_option, CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub async fn run_config(command: ConfigCommands, profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            supabase_url,
            supabase_anon_key,
            photo_bucket,
            bootstrap_url,
            no_activate,
        } => {
            run_config_init(
                profile,
                CliProfile {
                    supabase_url,
                    supabase_anon_key,
                    photo_bucket,
                    bootstrap_url,
                },
                no_activate,
            )
            .await
        }
        ConfigCommands::Show => run_config_show(profile).await,
    }
}

pub async fn run_config_init(
    profile_name: Option<&str>,
    explicit: CliProfile,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let existing_profile = config.profile(&profile_name).cloned().unwrap_or_default();

    let explicit_bootstrap_url = normalize_text_option(explicit.bootstrap_url.clone())
        .map(normalize_bootstrap_url)
        .transpose()?;
    let bootstrap_url = explicit_bootstrap_url
        .clone()
        .or_else(|| BootstrapConfig::from_env().bootstrap_manifest_url)
        .or_else(|| normalize_text_option(existing_profile.bootstrap_url.clone()));

    let should_fetch_bootstrap = explicit_bootstrap_url.is_some()
        || explicit.supabase_url().is_none()
        || explicit.supabase_anon_key().is_none();
    let manifest = match bootstrap_url.as_deref() {
        Some(url) if should_fetch_bootstrap => {
            let manifest = fetch_bootstrap_manifest(url).await.map_err(|error| {
                CliError::Config(format!(
                    "Failed to load bootstrap manifest from {url}: {error}"
                ))
            })?;
            println!("Loaded bootstrap manifest from {url}");
            Some(manifest)
        }
        _ => None,
    };

    let merged = merge_profile(
        explicit,
        manifest,
        BootstrapConfig::from_env(),
        existing_profile,
        bootstrap_url,
    );
    validate_profile_urls(&merged)?;
    *config.profile_mut_or_default(&profile_name) = merged;

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );

    let profile = config
        .profiles
        .get(&profile_name)
        .ok_or_else(|| CliError::Config("Failed to persist profile".to_string()))?;
    let mut missing_fields = Vec::new();
    if profile.supabase_url().is_none() {
        missing_fields.push("supabase_url");
    }
    if profile.supabase_anon_key().is_none() {
        missing_fields.push("supabase_anon_key");
    }
    if missing_fields.is_empty() {
        println!(
            "Profile '{profile_name}' is ready. Run `daybook auth login --email <email> --password <password>`."
        );
    } else {
        println!(
            "Profile '{}' is missing: {}",
            profile_name,
            missing_fields.join(", ")
        );
    }

    Ok(())
}

pub async fn run_config_show(profile_name: Option<&str>) -> Result<(), CliError> {
    let (profile_name, resolved) = resolve_profile_config(profile_name).await?;
    println!("profile: {profile_name}");
    println!(
        "supabase_url: {}",
        resolved.supabase_url.as_deref().unwrap_or("(unset)")
    );
    println!(
        "supabase_anon_key: {}",
        if resolved.supabase_anon_key.is_some() {
            "(set)"
        } else {
            "(unset)"
        }
    );
    println!("photo_bucket: {}", resolved.photo_bucket());
    if let Some(url) = resolved.bootstrap_manifest_url.as_deref() {
        println!("bootstrap_url: {url}");
    }
    Ok(())
}

/// Explicit flags, then the manifest, then the environment, then the values
/// already stored on the profile.
pub fn merge_profile(
    explicit: CliProfile,
    manifest: Option<BootstrapConfig>,
    env: BootstrapConfig,
    existing: CliProfile,
    bootstrap_url: Option<String>,
) -> CliProfile {
    let manifest = manifest.unwrap_or_default();
    CliProfile {
        supabase_url: explicit
            .supabase_url()
            .or(manifest.supabase_url)
            .or(env.supabase_url)
            .or_else(|| existing.supabase_url()),
        supabase_anon_key: explicit
            .supabase_anon_key()
            .or(manifest.supabase_anon_key)
            .or(env.supabase_anon_key)
            .or_else(|| existing.supabase_anon_key()),
        photo_bucket: normalize_text_option(explicit.photo_bucket)
            .or(manifest.photo_bucket)
            .or(env.photo_bucket)
            .or_else(|| normalize_text_option(existing.photo_bucket)),
        bootstrap_url,
    }
}

async fn fetch_bootstrap_manifest(url: &str) -> Result<BootstrapConfig, String> {
    daybook_core::config::resolve_bootstrap_config(BootstrapConfig {
        bootstrap_manifest_url: Some(url.to_string()),
        ..BootstrapConfig::default()
    })
    .await
}

pub fn normalize_bootstrap_url(url: String) -> Result<String, CliError> {
    let normalized = normalize_text_option(Some(url))
        .ok_or_else(|| CliError::Config("bootstrap_url must not be empty".to_string()))?;
    if !is_http_url(&normalized) {
        return Err(CliError::Config(
            "bootstrap_url must include http:// or https://".to_string(),
        ));
    }
    Ok(normalized.trim_end_matches('/').to_string())
}

fn validate_profile_urls(profile: &CliProfile) -> Result<(), CliError> {
    if let Some(url) = profile.supabase_url() {
        if !is_http_url(&url) {
            return Err(CliError::Config(
                "supabase_url must include http:// or https://".to_string(),
            ));
        }
    }
    Ok(())
}
