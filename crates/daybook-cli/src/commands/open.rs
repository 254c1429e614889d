use daybook_core::calendar::{long_date_label, parse_entry_date, CalendarIndex, DateSelection};
use daybook_core::EntryForm;

use crate::commands::common::{capture_editor_input_with_initial, connect, print_saved};
use crate::error::CliError;

/// Select a day on the calendar: its entry opens for editing, an empty day
/// opens a blank entry for that date.
pub async fn run_open(date: &str, global_profile: Option<&str>) -> Result<(), CliError> {
    let date = parse_entry_date(date)?;
    let backend = connect(global_profile).await?;
    let entries = backend.timeline().await?;
    let index = CalendarIndex::build(&entries);

    let mut form = match index.select(date) {
        DateSelection::Edit(entry) => {
            println!("Editing entry for {}", long_date_label(date));
            EntryForm::edit(entry.clone())
        }
        DateSelection::Create(date) => {
            println!("New entry for {}", long_date_label(date));
            EntryForm::new_entry(date)
        }
    };

    let Some(content) = capture_editor_input_with_initial(form.content())? else {
        return Err(CliError::EmptyContent);
    };
    if form.is_editing() && content == form.content() {
        println!("No changes");
        return Ok(());
    }
    form.set_content(content);

    let outcome = form
        .save(backend.user_id(), &backend.entries, &backend.photos)
        .await?;
    print_saved(&outcome);
    Ok(())
}
