//! In-memory backend doubles for flow tests.

use std::cmp::Reverse;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{NaiveDate, TimeZone, Utc};

use crate::models::{DiaryEntry, EntryId, EntryPayload, Mood};
use crate::storage::{PhotoUploader, StagedPhoto, UploadedPhoto};
use crate::store::EntryStore;
use crate::{Error, Result};

pub const PUBLIC_BASE: &str = "https://demo.supabase.co/storage/v1/object/public/diary-photos";

pub fn entry(user_id: &str, date: &str, content: &str) -> DiaryEntry {
    let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    DiaryEntry {
        id: EntryId::generate(),
        user_id: user_id.to_string(),
        title: None,
        content: content.to_string(),
        entry_date: date.parse::<NaiveDate>().unwrap(),
        mood: Some(Mood::Calm),
        photo_url: None,
        created_at,
        updated_at: created_at,
    }
}

#[derive(Default)]
pub struct MemoryEntryStore {
    rows: Mutex<Vec<DiaryEntry>>,
    calls: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryEntryStore {
    pub fn with_rows(rows: Vec<DiaryEntry>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<DiaryEntry> {
        self.rows.lock().unwrap().clone()
    }

    fn check_write(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Backend("row write rejected (500)".to_string()));
        }
        Ok(())
    }
}

impl EntryStore for MemoryEntryStore {
    async fn list_entries(&self, user_id: &str) -> Result<Vec<DiaryEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut rows: Vec<DiaryEntry> = self
            .rows()
            .into_iter()
            .filter(|row| row.user_id == user_id)
            .collect();
        rows.sort_by_key(|row| Reverse(row.entry_date));
        Ok(rows)
    }

    async fn get_entry(&self, user_id: &str, id: &EntryId) -> Result<Option<DiaryEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows()
            .into_iter()
            .find(|row| row.id == *id && row.user_id == user_id))
    }

    async fn insert_entry(&self, payload: &EntryPayload) -> Result<DiaryEntry> {
        self.check_write()?;
        let now = Utc::now();
        let row = DiaryEntry {
            id: EntryId::generate(),
            user_id: payload.user_id.clone(),
            title: payload.title.clone(),
            content: payload.content.clone(),
            entry_date: payload.entry_date,
            mood: payload.mood,
            photo_url: payload.photo_url.clone(),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update_entry(&self, id: &EntryId, payload: &EntryPayload) -> Result<DiaryEntry> {
        self.check_write()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == *id && row.user_id == payload.user_id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        row.title.clone_from(&payload.title);
        row.content.clone_from(&payload.content);
        row.entry_date = payload.entry_date;
        row.mood = payload.mood;
        row.photo_url.clone_from(&payload.photo_url);
        row.updated_at = payload.updated_at.unwrap_or_else(Utc::now);
        Ok(row.clone())
    }
}

#[derive(Default)]
pub struct MemoryPhotoStorage {
    uploaded: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    calls: AtomicUsize,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryPhotoStorage {
    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn uploaded(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

impl PhotoUploader for MemoryPhotoStorage {
    async fn upload_photo(&self, user_id: &str, photo: &StagedPhoto) -> Result<UploadedPhoto> {
        let sequence = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(Error::Storage("bucket unavailable".to_string()));
        }
        let object_key = format!("{user_id}/{sequence}.{}", photo.extension());
        self.uploaded.lock().unwrap().push(object_key.clone());
        Ok(UploadedPhoto {
            public_url: format!("{PUBLIC_BASE}/{object_key}"),
            object_key,
        })
    }

    async fn delete_photo(&self, object_key: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Error::Storage("delete rejected".to_string()));
        }
        self.deleted.lock().unwrap().push(object_key.to_string());
        Ok(())
    }
}
