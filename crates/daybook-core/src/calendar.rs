//! Calendar markers, date selection and the timeline.
//!
//! Entries are keyed by their local calendar day. Any instant that becomes a
//! date (today, a clicked day) goes through [`local_date_of`] so that a late
//! evening entry never lands on the next UTC day.

use std::collections::BTreeMap;
use std::fmt::{Display, Write as _};

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};

use crate::models::{DiaryEntry, EntryId};
use crate::{Error, Result};

/// Wire and lookup format of `entry_date`.
pub const ENTRY_DATE_FORMAT: &str = "%Y-%m-%d";

pub const EMPTY_TIMELINE_MESSAGE: &str =
    "Start your journaling journey by writing your first entry!";

pub fn format_entry_date(date: NaiveDate) -> String {
    date.format(ENTRY_DATE_FORMAT).to_string()
}

/// Parse a strict `yyyy-MM-dd` date.
pub fn parse_entry_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), ENTRY_DATE_FORMAT)
        .map_err(|_| Error::InvalidInput(format!("Expected a yyyy-MM-dd date, got '{raw}'")))
}

/// Calendar day of `instant` as seen in `tz`.
pub fn local_date_of<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

pub fn today_local() -> NaiveDate {
    local_date_of(Utc::now(), &Local)
}

/// Newest day first; entries sharing a day keep newest-created first.
pub fn sort_timeline(entries: &mut [DiaryEntry]) {
    entries.sort_by(|a, b| {
        b.entry_date
            .cmp(&a.entry_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Outcome of picking a day on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSelection<'a> {
    /// The day already has an entry: open it for editing
    Edit(&'a DiaryEntry),
    /// Empty day: open a blank form for it
    Create(NaiveDate),
}

/// Date → entry lookup over a loaded entry list.
#[derive(Debug, Clone, Default)]
pub struct CalendarIndex<'a> {
    by_date: BTreeMap<NaiveDate, &'a DiaryEntry>,
}

impl<'a> CalendarIndex<'a> {
    /// Index `entries` by day. When a day has several entries the first one in
    /// list order wins.
    pub fn build(entries: &'a [DiaryEntry]) -> Self {
        let mut by_date = BTreeMap::new();
        for entry in entries {
            by_date.entry(entry.entry_date).or_insert(entry);
        }
        Self { by_date }
    }

    pub fn has_entry(&self, date: NaiveDate) -> bool {
        self.by_date.contains_key(&date)
    }

    pub fn entry_on(&self, date: NaiveDate) -> Option<&'a DiaryEntry> {
        self.by_date.get(&date).copied()
    }

    /// Days carrying a presence marker, ascending.
    pub fn marked_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.by_date.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    pub fn select(&self, date: NaiveDate) -> DateSelection<'a> {
        self.entry_on(date)
            .map_or(DateSelection::Create(date), DateSelection::Edit)
    }

    pub fn month(&self, year: i32, month: u32, selected: Option<NaiveDate>) -> Result<MonthGrid> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| Error::InvalidInput(format!("Invalid month {year}-{month:02}")))?;
        let leading = first.weekday().num_days_from_sunday() as usize;

        let mut cells: Vec<Option<DayCell>> = vec![None; leading];
        let mut day = first;
        while day.month() == month {
            cells.push(Some(DayCell {
                date: day,
                has_entry: self.has_entry(day),
                is_selected: selected == Some(day),
            }));
            let Some(next) = day.succ_opt() else {
                break;
            };
            day = next;
        }
        while !cells.len().is_multiple_of(7) {
            cells.push(None);
        }

        let weeks = cells
            .chunks(7)
            .map(|week| {
                let mut row = [None; 7];
                row.copy_from_slice(week);
                row
            })
            .collect();

        Ok(MonthGrid { first, weeks })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub has_entry: bool,
    pub is_selected: bool,
}

/// One month laid out in Sunday-first weeks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    first: NaiveDate,
    pub weeks: Vec<[Option<DayCell>; 7]>,
}

impl MonthGrid {
    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks.iter().flatten().flatten()
    }

    /// Plain-text grid. `*` marks days with an entry, `<` the selected day
    /// and `#` a selected day that has an entry.
    pub fn render(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "{:^27}", self.title());
        let _ = writeln!(output, "Su  Mo  Tu  We  Th  Fr  Sa");
        for week in &self.weeks {
            let mut line = String::new();
            for cell in week {
                let Some(cell) = cell else {
                    line.push_str("    ");
                    continue;
                };
                let mark = match (cell.has_entry, cell.is_selected) {
                    (true, true) => '#',
                    (false, true) => '<',
                    (true, false) => '*',
                    (false, false) => ' ',
                };
                let _ = write!(line, "{:>2}{mark} ", cell.date.day());
            }
            let _ = writeln!(output, "{}", line.trim_end());
        }
        output
    }
}

/// Display fields for one timeline card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineCard {
    pub entry_id: EntryId,
    /// Title, or the weekday/month/day label when the entry has none
    pub heading: String,
    pub year: i32,
    pub mood_emoji: Option<&'static str>,
    pub photo_url: Option<String>,
    pub content: String,
    /// Creation time as `h:mm AM`
    pub created_time: String,
}

pub fn timeline_card<Tz>(entry: &DiaryEntry, tz: &Tz) -> TimelineCard
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    TimelineCard {
        entry_id: entry.id,
        heading: entry
            .title
            .clone()
            .unwrap_or_else(|| day_heading(entry.entry_date)),
        year: entry.entry_date.year(),
        mood_emoji: entry.mood.map(crate::models::Mood::emoji),
        photo_url: entry.photo_url.clone(),
        content: entry.content.clone(),
        created_time: format_created_time(entry.created_at, tz),
    }
}

/// `Friday, March 1st`
pub fn day_heading(date: NaiveDate) -> String {
    format!(
        "{}{}",
        date.format("%A, %B %-d"),
        ordinal_suffix(date.day())
    )
}

/// `Friday, March 1st, 2024`
pub fn long_date_label(date: NaiveDate) -> String {
    format!("{}, {}", day_heading(date), date.year())
}

pub fn format_created_time<Tz>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.with_timezone(tz).format("%-I:%M %p").to_string()
}

const fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
