//! Entry form: create or edit one entry, uploading a staged photo on save.

use chrono::{NaiveDate, Utc};

use crate::models::{DiaryEntry, EntryId, EntryPayload, Mood};
use crate::storage::{PhotoUploader, StagedPhoto};
use crate::store::EntryStore;
use crate::util::normalize_text_option;
use crate::Error;

/// Successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(DiaryEntry),
    Updated(DiaryEntry),
}

impl SaveOutcome {
    pub const fn entry(&self) -> &DiaryEntry {
        match self {
            Self::Created(entry) | Self::Updated(entry) => entry,
        }
    }

    pub fn into_entry(self) -> DiaryEntry {
        match self {
            Self::Created(entry) | Self::Updated(entry) => entry,
        }
    }

    /// Confirmation shown to the user.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Created(_) => "Entry created!",
            Self::Updated(_) => "Entry updated!",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Content required")]
    ContentRequired,

    #[error("{0}")]
    Validation(String),

    #[error("Photo upload failed: {0}")]
    Upload(#[source] Error),

    #[error("Failed to save entry: {0}")]
    Persist(#[source] Error),

    /// The row write failed and the uploaded photo could not be removed.
    #[error("Failed to save entry: {source}; uploaded photo '{object_key}' was left in storage ({cleanup})")]
    Orphaned {
        object_key: String,
        source: Error,
        cleanup: Error,
    },
}

/// Where a save lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SaveTarget<'a> {
    Insert,
    Update(&'a EntryId),
}

/// Upload the staged photo (if any), then write the row. A failed row write
/// removes the photo it just uploaded.
pub(crate) async fn save_entry<S, U>(
    store: &S,
    uploader: &U,
    target: SaveTarget<'_>,
    mut payload: EntryPayload,
    photo: Option<&StagedPhoto>,
) -> Result<SaveOutcome, SaveError>
where
    S: EntryStore,
    U: PhotoUploader,
{
    if payload.content.trim().is_empty() {
        return Err(SaveError::ContentRequired);
    }

    let uploaded = match photo {
        Some(photo) => {
            let uploaded = uploader
                .upload_photo(&payload.user_id, photo)
                .await
                .map_err(|error| {
                    tracing::warn!("Photo upload failed: {error}");
                    SaveError::Upload(error)
                })?;
            payload.photo_url = Some(uploaded.public_url.clone());
            Some(uploaded)
        }
        None => None,
    };

    let written = match target {
        SaveTarget::Insert => store.insert_entry(&payload).await.map(SaveOutcome::Created),
        SaveTarget::Update(id) => store
            .update_entry(id, &payload)
            .await
            .map(SaveOutcome::Updated),
    };

    match written {
        Ok(outcome) => {
            tracing::info!("Saved entry {} for {}", outcome.entry().id, outcome.entry().entry_date);
            Ok(outcome)
        }
        Err(source) => {
            tracing::warn!("Entry write failed: {source}");
            let Some(uploaded) = uploaded else {
                return Err(SaveError::Persist(source));
            };
            match uploader.delete_photo(&uploaded.object_key).await {
                Ok(()) => {
                    tracing::info!("Removed orphaned photo {}", uploaded.object_key);
                    Err(SaveError::Persist(source))
                }
                Err(cleanup) => {
                    tracing::error!(
                        "Uploaded photo {} left in storage: {cleanup}",
                        uploaded.object_key
                    );
                    Err(SaveError::Orphaned {
                        object_key: uploaded.object_key,
                        source,
                        cleanup,
                    })
                }
            }
        }
    }
}

/// Editable state of the entry form.
///
/// When editing, mood, photo and entry date are fixed to the existing entry;
/// only title and content change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    existing: Option<DiaryEntry>,
    entry_date: NaiveDate,
    title: String,
    content: String,
    mood: Option<Mood>,
    photo: Option<StagedPhoto>,
}

impl EntryForm {
    /// Blank form for `entry_date`.
    pub const fn new_entry(entry_date: NaiveDate) -> Self {
        Self {
            existing: None,
            entry_date,
            title: String::new(),
            content: String::new(),
            mood: None,
            photo: None,
        }
    }

    /// Form prefilled from an existing entry.
    pub fn edit(entry: DiaryEntry) -> Self {
        Self {
            entry_date: entry.entry_date,
            title: entry.title.clone().unwrap_or_default(),
            content: entry.content.clone(),
            mood: entry.mood,
            photo: None,
            existing: Some(entry),
        }
    }

    /// Seed the mood chosen on the writing route. Ignored when editing.
    #[must_use]
    pub fn with_preselected_mood(mut self, mood: Mood) -> Self {
        if self.existing.is_none() {
            self.mood = Some(mood);
        }
        self
    }

    pub const fn is_editing(&self) -> bool {
        self.existing.is_some()
    }

    /// Mood and photo controls are only offered for new entries.
    pub const fn shows_mood_and_photo(&self) -> bool {
        !self.is_editing()
    }

    pub const fn entry_date(&self) -> NaiveDate {
        self.entry_date
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn mood(&self) -> Option<Mood> {
        self.mood
    }

    pub const fn staged_photo(&self) -> Option<&StagedPhoto> {
        self.photo.as_ref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn set_mood(&mut self, mood: Option<Mood>) -> Result<(), SaveError> {
        if self.is_editing() {
            return Err(SaveError::Validation(
                "Mood cannot be changed while editing".to_string(),
            ));
        }
        self.mood = mood;
        Ok(())
    }

    pub fn stage_photo(&mut self, photo: StagedPhoto) -> Result<(), SaveError> {
        if self.is_editing() {
            return Err(SaveError::Validation(
                "Photo cannot be changed while editing".to_string(),
            ));
        }
        self.photo = Some(photo);
        Ok(())
    }

    pub fn remove_photo(&mut self) {
        self.photo = None;
    }

    /// Preview for the photo slot: the staged photo as a data URL, otherwise
    /// the stored URL of the entry being edited.
    pub fn photo_preview(&self) -> Option<String> {
        match (&self.photo, &self.existing) {
            (Some(photo), _) => Some(photo.preview_data_url()),
            (None, Some(existing)) => existing.photo_url.clone(),
            (None, None) => None,
        }
    }

    fn payload(&self, user_id: &str) -> EntryPayload {
        let title = normalize_text_option(Some(self.title.clone()));
        let content = self.content.trim().to_string();
        match &self.existing {
            Some(existing) => EntryPayload {
                user_id: user_id.to_string(),
                title,
                content,
                entry_date: existing.entry_date,
                mood: existing.mood,
                photo_url: existing.photo_url.clone(),
                updated_at: Some(Utc::now()),
            },
            None => EntryPayload {
                user_id: user_id.to_string(),
                title,
                content,
                entry_date: self.entry_date,
                mood: self.mood,
                photo_url: None,
                updated_at: None,
            },
        }
    }

    /// Validate, upload the staged photo and write the row for `user_id`.
    /// On error the form is left untouched so the user can retry.
    pub async fn save<S, U>(
        &self,
        user_id: &str,
        store: &S,
        uploader: &U,
    ) -> Result<SaveOutcome, SaveError>
    where
        S: EntryStore,
        U: PhotoUploader,
    {
        let target = self.existing.as_ref().map_or(SaveTarget::Insert, |existing| {
            SaveTarget::Update(&existing.id)
        });
        let photo = self.photo.as_ref().filter(|_| self.existing.is_none());
        save_entry(store, uploader, target, self.payload(user_id), photo).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::calendar::parse_entry_date;
    use crate::testing::{entry, MemoryEntryStore, MemoryPhotoStorage, PUBLIC_BASE};

    fn date(raw: &str) -> NaiveDate {
        parse_entry_date(raw).unwrap()
    }

    fn photo() -> StagedPhoto {
        StagedPhoto::new("beach.PNG", vec![1, 2, 3]).unwrap()
    }

    #[tokio::test]
    async fn whitespace_content_makes_no_backend_calls() {
        let store = MemoryEntryStore::default();
        let uploader = MemoryPhotoStorage::default();
        let mut form = EntryForm::new_entry(date("2024-03-01"));
        form.set_content("  \n\t ");
        form.stage_photo(photo()).unwrap();

        let error = form.save("user-1", &store, &uploader).await.unwrap_err();

        assert!(matches!(error, SaveError::ContentRequired));
        assert_eq!(error.to_string(), "Content required");
        assert_eq!(store.calls(), 0);
        assert_eq!(uploader.calls(), 0);
    }

    #[tokio::test]
    async fn saved_entry_reloads_with_same_fields() {
        let store = MemoryEntryStore::default();
        let uploader = MemoryPhotoStorage::default();
        let mut form = EntryForm::new_entry(date("2024-03-01")).with_preselected_mood(Mood::Grateful);
        form.set_title("  Beach day ");
        form.set_content(" Sand everywhere. ");
        form.stage_photo(photo()).unwrap();

        let outcome = form.save("user-1", &store, &uploader).await.unwrap();
        assert_eq!(outcome.message(), "Entry created!");

        let reloaded = store
            .get_entry("user-1", &outcome.entry().id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.title.as_deref(), Some("Beach day"));
        assert_eq!(reloaded.mood, Some(Mood::Grateful));
        assert_eq!(reloaded.content, "Sand everywhere.");
        assert_eq!(reloaded.entry_date, date("2024-03-01"));
        assert_eq!(
            reloaded.photo_url,
            Some(format!("{PUBLIC_BASE}/user-1/0.png"))
        );
    }

    #[tokio::test]
    async fn blank_title_persists_as_none() {
        let store = MemoryEntryStore::default();
        let uploader = MemoryPhotoStorage::default();
        let mut form = EntryForm::new_entry(date("2024-03-01"));
        form.set_title("   ");
        form.set_content("body");

        let saved = form.save("user-1", &store, &uploader).await.unwrap().into_entry();
        assert_eq!(saved.title, None);
        assert_eq!(uploader.calls(), 0);
    }

    #[tokio::test]
    async fn failed_row_write_removes_uploaded_photo() {
        let store = MemoryEntryStore::default();
        store.fail_writes();
        let uploader = MemoryPhotoStorage::default();
        let mut form = EntryForm::new_entry(date("2024-03-01"));
        form.set_content("body");
        form.stage_photo(photo()).unwrap();

        let error = form.save("user-1", &store, &uploader).await.unwrap_err();

        assert!(matches!(error, SaveError::Persist(_)));
        assert_eq!(uploader.deleted(), uploader.uploaded());
        assert_eq!(uploader.deleted(), vec!["user-1/0.png".to_string()]);
        assert!(store.rows().is_empty());
        // Form keeps its state for a retry
        assert!(form.staged_photo().is_some());
        assert_eq!(form.content(), "body");
    }

    #[tokio::test]
    async fn failed_cleanup_reports_orphan() {
        let store = MemoryEntryStore::default();
        store.fail_writes();
        let uploader = MemoryPhotoStorage::default();
        uploader.fail_deletes();
        let mut form = EntryForm::new_entry(date("2024-03-01"));
        form.set_content("body");
        form.stage_photo(photo()).unwrap();

        let error = form.save("user-1", &store, &uploader).await.unwrap_err();

        match error {
            SaveError::Orphaned { object_key, .. } => assert_eq!(object_key, "user-1/0.png"),
            other => panic!("expected orphan, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn upload_failure_skips_row_write() {
        let store = MemoryEntryStore::default();
        let uploader = MemoryPhotoStorage::default();
        uploader.fail_uploads();
        let mut form = EntryForm::new_entry(date("2024-03-01"));
        form.set_content("body");
        form.stage_photo(photo()).unwrap();

        let error = form.save("user-1", &store, &uploader).await.unwrap_err();
        assert!(matches!(error, SaveError::Upload(_)));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn editing_keeps_mood_photo_and_date() {
        let mut existing = entry("user-1", "2024-02-10", "before");
        existing.mood = Some(Mood::Sad);
        existing.photo_url = Some(format!("{PUBLIC_BASE}/user-1/old.jpg"));
        let store = MemoryEntryStore::with_rows(vec![existing.clone()]);
        let uploader = MemoryPhotoStorage::default();

        let mut form = EntryForm::edit(existing.clone()).with_preselected_mood(Mood::Happy);
        assert!(!form.shows_mood_and_photo());
        assert!(form.set_mood(Some(Mood::Happy)).is_err());
        assert!(form.stage_photo(photo()).is_err());
        assert_eq!(form.photo_preview(), existing.photo_url);
        form.set_content("after");

        let outcome = form.save("user-1", &store, &uploader).await.unwrap();
        assert_eq!(outcome.message(), "Entry updated!");
        let updated = outcome.into_entry();
        assert_eq!(updated.id, existing.id);
        assert_eq!(updated.content, "after");
        assert_eq!(updated.mood, Some(Mood::Sad));
        assert_eq!(updated.photo_url, existing.photo_url);
        assert_eq!(updated.entry_date, date("2024-02-10"));
        assert!(updated.updated_at > existing.updated_at);
        assert_eq!(store.rows().len(), 1);
    }

    #[test]
    fn removing_photo_clears_preview() {
        let mut form = EntryForm::new_entry(date("2024-03-01"));
        form.stage_photo(photo()).unwrap();
        assert!(form
            .photo_preview()
            .unwrap()
            .starts_with("data:image/png;base64,"));

        form.remove_photo();
        assert_eq!(form.photo_preview(), None);
        assert!(form.staged_photo().is_none());
    }
}
