use chrono::Datelike;
use daybook_core::calendar::{today_local, CalendarIndex};

use crate::commands::common::{connect, current_month, format_entry_lines, parse_month};
use crate::error::CliError;

pub async fn run_calendar(
    month: Option<&str>,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let (year, month) = month.map_or_else(|| Ok(current_month()), parse_month)?;
    let backend = connect(global_profile).await?;
    let entries = backend.timeline().await?;

    let index = CalendarIndex::build(&entries);
    let grid = index.month(year, month, Some(today_local()))?;
    print!("{}", grid.render());

    let in_month = entries
        .iter()
        .filter(|entry| entry.entry_date.year() == year && entry.entry_date.month() == month)
        .cloned()
        .collect::<Vec<_>>();
    if !in_month.is_empty() {
        println!();
        for line in format_entry_lines(&in_month) {
            println!("{line}");
        }
    }

    Ok(())
}
