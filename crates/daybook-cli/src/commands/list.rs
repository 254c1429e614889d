use daybook_core::calendar::EMPTY_TIMELINE_MESSAGE;
use daybook_core::store::ProfileStore;
use daybook_core::Profile;

use crate::commands::common::{connect, entry_to_list_item, format_entry_lines, EntryListItem};
use crate::error::CliError;

pub async fn run_list(
    limit: usize,
    as_json: bool,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let backend = connect(global_profile).await?;
    let mut entries = backend.timeline().await?;
    entries.truncate(limit);

    if as_json {
        let json_items = entries
            .iter()
            .map(entry_to_list_item)
            .collect::<Vec<EntryListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    let profile = backend
        .entries
        .get_profile(backend.user_id())
        .await
        .unwrap_or_else(|error| {
            tracing::warn!("Failed to load profile: {}", error);
            None
        });
    println!("{}\n", welcome_line(profile.as_ref()));

    if entries.is_empty() {
        println!("{EMPTY_TIMELINE_MESSAGE}");
        return Ok(());
    }
    for line in format_entry_lines(&entries) {
        println!("{line}");
    }

    Ok(())
}

/// Dashboard greeting; accounts without a profile row are greeted as a friend.
pub fn welcome_line(profile: Option<&Profile>) -> String {
    let name = profile
        .map(|profile| profile.name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or("Friend");
    format!("Welcome back, {name}!")
}
