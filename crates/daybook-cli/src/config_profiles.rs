//! Persistent CLI profile configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use daybook_core::config::BootstrapConfig;
use serde::{Deserialize, Serialize};

pub use daybook_core::util::{is_http_url, normalize_text_option};

const CONFIG_FILE_NAME: &str = "cli-config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfilesConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub active_profile: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, CliProfile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfile {
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_anon_key: Option<String>,
    #[serde(default)]
    pub photo_bucket: Option<String>,
    #[serde(default)]
    pub bootstrap_url: Option<String>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join("daybook").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

pub fn normalize_profile_name(value: Option<&str>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl CliProfilesConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Explicit name, then `DAYBOOK_PROFILE`, then the active profile, then
    /// `default`.
    pub fn resolve_profile_name(&self, explicit: Option<&str>) -> String {
        if let Some(profile) = normalize_profile_name(explicit) {
            return profile;
        }
        if let Some(profile) =
            normalize_profile_name(std::env::var("DAYBOOK_PROFILE").ok().as_deref())
        {
            return profile;
        }
        if let Some(profile) = normalize_profile_name(self.active_profile.as_deref()) {
            return profile;
        }
        "default".to_string()
    }

    pub fn profile(&self, name: &str) -> Option<&CliProfile> {
        self.profiles.get(name)
    }

    pub fn profile_mut_or_default(&mut self, name: &str) -> &mut CliProfile {
        self.profiles.entry(name.to_string()).or_default()
    }

    fn normalize(&mut self) {
        self.active_profile = normalize_profile_name(self.active_profile.as_deref());
        for profile in self.profiles.values_mut() {
            profile.normalize();
        }
    }
}

impl CliProfile {
    pub fn supabase_url(&self) -> Option<String> {
        normalize_text_option(self.supabase_url.clone())
    }

    pub fn supabase_anon_key(&self) -> Option<String> {
        normalize_text_option(self.supabase_anon_key.clone())
    }

    /// Profile values layered over `env`; profile fields win.
    pub fn bootstrap_config(&self, env: BootstrapConfig) -> BootstrapConfig {
        BootstrapConfig {
            bootstrap_manifest_url: normalize_text_option(self.bootstrap_url.clone())
                .or(env.bootstrap_manifest_url),
            supabase_url: self.supabase_url().or(env.supabase_url),
            supabase_anon_key: self.supabase_anon_key().or(env.supabase_anon_key),
            photo_bucket: normalize_text_option(self.photo_bucket.clone()).or(env.photo_bucket),
        }
    }

    fn normalize(&mut self) {
        self.supabase_url = normalize_text_option(self.supabase_url.clone());
        self.supabase_anon_key = normalize_text_option(self.supabase_anon_key.clone());
        self.photo_bucket = normalize_text_option(self.photo_bucket.clone());
        self.bootstrap_url = normalize_text_option(self.bootstrap_url.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_profile_name_rejects_empty() {
        assert_eq!(normalize_profile_name(None), None);
        assert_eq!(normalize_profile_name(Some(" ")), None);
    }

    #[test]
    fn config_roundtrip_preserves_profiles() {
        let path = std::env::temp_dir().join(format!(
            "daybook-cli-config-test-{}.json",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |duration| duration.as_nanos())
        ));

        let mut config = CliProfilesConfig {
            version: 1,
            active_profile: Some("default".to_string()),
            profiles: BTreeMap::new(),
        };
        config.profiles.insert(
            "default".to_string(),
            CliProfile {
                supabase_url: Some(" https://project.supabase.co ".to_string()),
                supabase_anon_key: Some(" anon-key ".to_string()),
                photo_bucket: Some(" journal-photos ".to_string()),
                bootstrap_url: None,
            },
        );

        config.save_to_path(&path).unwrap();
        let loaded = CliProfilesConfig::load_from_path(&path).unwrap();
        let profile = loaded.profiles.get("default").unwrap();
        assert_eq!(
            profile.supabase_url.as_deref(),
            Some("https://project.supabase.co")
        );
        assert_eq!(profile.supabase_anon_key.as_deref(), Some("anon-key"));
        assert_eq!(profile.photo_bucket.as_deref(), Some("journal-photos"));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn resolve_profile_name_prefers_explicit_then_active() {
        let config = CliProfilesConfig {
            version: 1,
            active_profile: Some("work".to_string()),
            profiles: BTreeMap::new(),
        };
        assert_eq!(config.resolve_profile_name(Some("travel")), "travel");
        if std::env::var_os("DAYBOOK_PROFILE").is_none() {
            assert_eq!(config.resolve_profile_name(None), "work");
        }
    }

    #[test]
    fn profile_values_override_environment() {
        let profile = CliProfile {
            supabase_url: Some("https://profile.supabase.co".to_string()),
            ..CliProfile::default()
        };
        let env = BootstrapConfig {
            supabase_url: Some("https://env.supabase.co".to_string()),
            supabase_anon_key: Some("env-key".to_string()),
            ..BootstrapConfig::default()
        };

        let merged = profile.bootstrap_config(env);
        assert_eq!(
            merged.supabase_endpoint(),
            Some((
                "https://profile.supabase.co".to_string(),
                "env-key".to_string()
            ))
        );
        assert_eq!(merged.photo_bucket(), "diary-photos");
    }
}
