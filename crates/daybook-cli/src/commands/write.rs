use std::path::Path;

use daybook_core::calendar::today_local;
use daybook_core::{DraftStore, EntryId, EntrySetup, Mood, Route, WritingSession};

use crate::commands::common::{capture_editor_input_with_initial, connect, print_saved, stage_photo};
use crate::error::CliError;

/// Two-step flow: setup (mood, title, photo) hands a draft to the writing
/// screen, which collects the content and saves.
pub async fn run_write(
    mood: Option<&str>,
    title: Option<String>,
    photo: Option<&Path>,
    entry_id: Option<&str>,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let mut drafts = DraftStore::new();
    let route = match entry_id {
        Some(raw) => edit_route(mood, raw)?,
        None => {
            let mut setup = EntrySetup::new();
            if let Some(mood) = mood {
                setup.select_mood(mood)?;
            }
            if let Some(title) = title {
                setup.set_title(title);
            }
            if let Some(photo) = stage_photo(photo)? {
                setup.stage_photo(photo);
            }
            setup.start_writing(&mut drafts)?
        }
    };
    tracing::debug!("Writing route {}", route);

    let backend = connect(global_profile).await?;
    let mut session = WritingSession::from_route(
        &route,
        &mut drafts,
        today_local(),
        backend.user_id(),
        &backend.entries,
    )
    .await?;

    println!("{} {}", session.mood().emoji(), session.heading());
    println!("{}", session.subheading());
    if !session.title().is_empty() {
        println!("Title: {}", session.title());
    }
    match session.photo_preview() {
        Some(preview) if preview.starts_with("data:") => println!("Photo: uploads on save"),
        Some(url) => println!("Photo: {url}"),
        None => {}
    }

    let Some(content) = capture_editor_input_with_initial(session.content())? else {
        return Err(CliError::EmptyContent);
    };
    session.set_content(content);

    let outcome = session
        .save(backend.user_id(), &backend.entries, &backend.photos)
        .await?;
    print_saved(&outcome);
    Ok(())
}

/// Writing route for an existing entry. The mood segment only themes the
/// screen when the entry itself has no mood.
pub fn edit_route(mood: Option<&str>, raw_id: &str) -> Result<Route, CliError> {
    let entry_id = raw_id
        .parse::<EntryId>()
        .map_err(|_| CliError::InvalidEntryId(raw_id.trim().to_string()))?;
    let mood = mood.map(str::parse::<Mood>).transpose()?.unwrap_or(Mood::Calm);
    Ok(Route::edit(mood, entry_id))
}
