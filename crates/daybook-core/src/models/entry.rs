//! Diary entry model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Mood;

/// Backend-assigned entry identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }

    #[cfg(test)]
    pub(crate) fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// One journal record, as stored in the `diary_entries` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: EntryId,
    /// Owner identity (auth user id)
    pub user_id: String,
    pub title: Option<String>,
    /// Never empty once persisted
    pub content: String,
    /// Local calendar day the entry belongs to (`yyyy-MM-dd` on the wire)
    pub entry_date: NaiveDate,
    pub mood: Option<Mood>,
    /// Public URL produced by the photo upload step
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DiaryEntry {
    /// First line of the content, truncated to `max_len` characters.
    #[must_use]
    pub fn content_preview(&self, max_len: usize) -> String {
        self.content
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(max_len)
            .collect()
    }

    #[must_use]
    pub const fn has_photo(&self) -> bool {
        self.photo_url.is_some()
    }
}

/// Row body sent on insert and update.
///
/// `updated_at` is only sent on update; on insert the backend default applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryPayload {
    pub user_id: String,
    pub title: Option<String>,
    pub content: String,
    pub entry_date: NaiveDate,
    pub mood: Option<Mood>,
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_id_parse_roundtrip() {
        let id = EntryId::generate();
        let parsed: EntryId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn entry_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<EntryId>().is_err());
    }

    #[test]
    fn deserializes_backend_row() {
        let row = r#"{
            "id": "0190f3c2-7a1e-7c1d-8e2f-123456789abc",
            "user_id": "user-1",
            "title": null,
            "content": "Dear diary",
            "entry_date": "2024-03-01",
            "mood": "calm",
            "photo_url": null,
            "created_at": "2024-03-01T21:15:00.123456+00:00",
            "updated_at": "2024-03-01T21:15:00.123456+00:00"
        }"#;
        let entry: DiaryEntry = serde_json::from_str(row).unwrap();
        assert_eq!(entry.entry_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(entry.mood, Some(Mood::Calm));
        assert_eq!(entry.title, None);
        assert!(!entry.has_photo());
    }

    #[test]
    fn payload_serializes_date_as_plain_day() {
        let payload = EntryPayload {
            user_id: "user-1".to_string(),
            title: None,
            content: "Hello".to_string(),
            entry_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            mood: Some(Mood::Happy),
            photo_url: None,
            updated_at: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["entry_date"], "2024-12-31");
        assert_eq!(value["mood"], "happy");
        assert!(value["title"].is_null());
        assert!(value.get("updated_at").is_none());
    }
}
