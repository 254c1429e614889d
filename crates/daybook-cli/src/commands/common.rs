use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Datelike, Local, NaiveDate};
use daybook_core::auth::AuthUser;
use daybook_core::calendar::{parse_entry_date, sort_timeline, timeline_card, today_local};
use daybook_core::config::{resolve_bootstrap_config, BootstrapConfig};
use daybook_core::storage::{StagedPhoto, SupabasePhotoStorage};
use daybook_core::store::{EntryStore, SupabaseRestClient};
use daybook_core::{DiaryEntry, Mood, SaveOutcome};
use serde::Serialize;

use crate::auth::{session_provider, CliSessionProvider};
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

/// Signed-in access to one profile's backend.
pub struct Backend {
    pub profile_name: String,
    pub user: AuthUser,
    pub entries: SupabaseRestClient,
    pub photos: SupabasePhotoStorage,
}

impl Backend {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// Every entry of the signed-in user, newest day first.
    pub async fn timeline(&self) -> Result<Vec<DiaryEntry>, CliError> {
        tracing::debug!("Loading entries for profile '{}'", self.profile_name);
        let mut entries = self.entries.list_entries(self.user_id()).await?;
        sort_timeline(&mut entries);
        Ok(entries)
    }
}

/// Resolved backend settings for a profile: profile file, then environment.
/// The bootstrap manifest is only fetched when those leave the endpoint unset.
pub async fn resolve_profile_config(
    global_profile: Option<&str>,
) -> Result<(String, BootstrapConfig), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();
    let merged = profile.bootstrap_config(BootstrapConfig::from_env());
    if merged.supabase_endpoint().is_some() {
        return Ok((profile_name, merged));
    }
    let resolved = resolve_bootstrap_config(merged)
        .await
        .map_err(CliError::Config)?;
    Ok((profile_name, resolved))
}

pub async fn open_session_provider(
    global_profile: Option<&str>,
) -> Result<(String, BootstrapConfig, CliSessionProvider), CliError> {
    let (profile_name, config) = resolve_profile_config(global_profile).await?;
    let Some((url, anon_key)) = config.supabase_endpoint() else {
        return Err(CliError::NotConfigured(profile_name));
    };
    let provider = session_provider(&profile_name, url, anon_key)?;
    Ok((profile_name, config, provider))
}

pub async fn connect(global_profile: Option<&str>) -> Result<Backend, CliError> {
    let (profile_name, config, mut provider) = open_session_provider(global_profile).await?;
    let Some((url, anon_key)) = config.supabase_endpoint() else {
        return Err(CliError::NotConfigured(profile_name));
    };

    let session = match provider.active_session().await {
        Ok(session) => session,
        Err(daybook_core::auth::AuthError::NotSignedIn) => return Err(CliError::NotSignedIn),
        Err(error) => return Err(error.into()),
    };
    tracing::debug!("Using profile '{}' as user {}", profile_name, session.user.id);

    Ok(Backend {
        entries: SupabaseRestClient::new(&url, anon_key.clone(), session.access_token.clone())?,
        photos: SupabasePhotoStorage::new(
            &url,
            anon_key,
            session.access_token,
            config.photo_bucket(),
        )?,
        user: session.user,
        profile_name,
    })
}

#[derive(Debug, Serialize)]
pub struct EntryListItem {
    pub id: String,
    pub entry_date: String,
    pub heading: String,
    pub mood: Option<Mood>,
    pub photo_url: Option<String>,
    pub preview: String,
    pub content: String,
    pub created_time: String,
}

pub fn entry_to_list_item(entry: &DiaryEntry) -> EntryListItem {
    let card = timeline_card(entry, &Local);
    EntryListItem {
        id: entry.id.to_string(),
        entry_date: entry.entry_date.to_string(),
        heading: card.heading,
        mood: entry.mood,
        photo_url: card.photo_url,
        preview: entry.content_preview(80),
        content: card.content,
        created_time: card.created_time,
    }
}

pub fn format_entry_lines(entries: &[DiaryEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let card = timeline_card(entry, &Local);
            let mood = card.mood_emoji.unwrap_or(" ");
            let photo = if card.photo_url.is_some() { "📷" } else { "  " };
            format!(
                "{}  {mood} {photo}  {:<32}  {:>8}  {}",
                entry.entry_date,
                truncate_chars(&card.heading, 32),
                card.created_time,
                entry.content_preview(48)
            )
        })
        .collect()
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let mut truncated = value
            .chars()
            .take(max_chars.saturating_sub(3))
            .collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn print_saved(outcome: &SaveOutcome) {
    println!("{} {}", outcome.message(), outcome.entry().id);
}

pub fn resolve_entry_date(raw: Option<&str>) -> Result<NaiveDate, CliError> {
    Ok(raw
        .map(parse_entry_date)
        .transpose()?
        .unwrap_or_else(today_local))
}

/// Parse `yyyy-MM` into (year, month).
pub fn parse_month(raw: &str) -> Result<(i32, u32), CliError> {
    let invalid = || CliError::Config(format!("Expected a yyyy-MM month, got '{raw}'"));
    let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

pub fn current_month() -> (i32, u32) {
    let today = today_local();
    (today.year(), today.month())
}

pub fn stage_photo(path: Option<&Path>) -> Result<Option<StagedPhoto>, CliError> {
    path.map(StagedPhoto::from_path)
        .transpose()
        .map_err(CliError::from)
}

pub fn resolve_entry_content(content_parts: &[String]) -> Result<String, CliError> {
    if let Some(content) = normalize_content(&content_parts.join(" ")) {
        return Ok(content);
    }

    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }

    if let Some(content) = capture_editor_input()? {
        return Ok(content);
    }

    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn capture_editor_input() -> Result<Option<String>, CliError> {
    capture_editor_input_with_initial("")
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_entry_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let entry_content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&entry_content))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

pub fn create_temp_entry_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("daybook-entry-{}-{now}.md", std::process::id()))
}
