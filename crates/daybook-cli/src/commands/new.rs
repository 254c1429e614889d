use std::path::Path;

use daybook_core::{EntryForm, Mood};

use crate::commands::common::{
    connect, print_saved, resolve_entry_content, resolve_entry_date, stage_photo,
};
use crate::error::CliError;

pub async fn run_new(
    date: Option<&str>,
    title: Option<String>,
    mood: Option<&str>,
    photo: Option<&Path>,
    content_parts: &[String],
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let mut form = EntryForm::new_entry(resolve_entry_date(date)?);
    if let Some(mood) = mood {
        form.set_mood(Some(mood.parse::<Mood>()?))?;
    }
    if let Some(title) = title {
        form.set_title(title);
    }
    if let Some(photo) = stage_photo(photo)? {
        form.stage_photo(photo)?;
    }
    form.set_content(resolve_entry_content(content_parts)?);

    let backend = connect(global_profile).await?;
    let outcome = form
        .save(backend.user_id(), &backend.entries, &backend.photos)
        .await?;
    print_saved(&outcome);
    Ok(())
}
