//! Journal export as JSON or Markdown.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::format_entry_date;
use crate::models::{DiaryEntry, Mood};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Serializable entry representation used in JSON and Markdown exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub id: String,
    pub entry_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[must_use]
pub fn entry_to_export_item(entry: &DiaryEntry) -> ExportEntry {
    ExportEntry {
        id: entry.id.to_string(),
        entry_date: entry.entry_date,
        title: entry.title.clone(),
        mood: entry.mood,
        photo_url: entry.photo_url.clone(),
        content: entry.content.clone(),
        created_at: entry.created_at,
        updated_at: entry.updated_at,
    }
}

/// Render entries as pretty-printed JSON.
pub fn render_json_export(entries: &[DiaryEntry]) -> serde_json::Result<String> {
    let items = entries
        .iter()
        .map(entry_to_export_item)
        .collect::<Vec<ExportEntry>>();
    serde_json::to_string_pretty(&items)
}

/// Render entries in Markdown, one frontmatter block per entry.
#[must_use]
pub fn render_markdown_export(entries: &[DiaryEntry]) -> String {
    let mut output = String::new();

    for (index, entry) in entries.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }

        let _ = writeln!(output, "---");
        let _ = writeln!(output, "id: {}", entry.id);
        let _ = writeln!(output, "date: {}", format_entry_date(entry.entry_date));
        if let Some(title) = &entry.title {
            let _ = writeln!(output, "title: {title:?}");
        }
        if let Some(mood) = entry.mood {
            let _ = writeln!(output, "mood: {mood}");
        }
        if let Some(photo_url) = &entry.photo_url {
            let _ = writeln!(output, "photo: {photo_url}");
        }
        let _ = writeln!(output, "created_at: {}", entry.created_at.to_rfc3339());
        let _ = writeln!(output, "updated_at: {}", entry.updated_at.to_rfc3339());
        let _ = writeln!(output, "---");
        let _ = writeln!(output);
        output.push_str(&entry.content);
        output.push('\n');
    }

    output
}

pub fn render_entries_export(
    entries: &[DiaryEntry],
    format: ExportFormat,
) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(entries),
        ExportFormat::Markdown => Ok(render_markdown_export(entries)),
    }
}

#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("daybook-export-{timestamp_ms}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::entry;

    #[test]
    fn markdown_export_includes_frontmatter_and_content() {
        let mut item = entry("user-1", "2024-03-01", "Hello export");
        item.title = Some("Day one".to_string());

        let rendered = render_markdown_export(&[item.clone()]);
        assert!(rendered.contains(&format!("id: {}", item.id)));
        assert!(rendered.contains("date: 2024-03-01"));
        assert!(rendered.contains("title: \"Day one\""));
        assert!(rendered.contains("mood: calm"));
        assert!(rendered.contains("created_at: 2024-01-01T12:00:00+00:00"));
        assert!(rendered.ends_with("---\n\nHello export\n"));
        assert!(!rendered.contains("photo:"));
    }

    #[test]
    fn json_export_skips_absent_fields() {
        let rendered = render_json_export(&[entry("user-1", "2024-03-01", "body")]).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed[0]["entry_date"], "2024-03-01");
        assert_eq!(parsed[0]["mood"], "calm");
        assert!(parsed[0].get("title").is_none());
    }

    #[test]
    fn suggested_export_file_name_uses_format_extension() {
        assert_eq!(
            suggested_export_file_name(ExportFormat::Json, 123),
            "daybook-export-123.json"
        );
        assert_eq!(
            suggested_export_file_name(ExportFormat::Markdown, 456),
            "daybook-export-456.md"
        );
    }
}
