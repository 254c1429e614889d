//! Two-step writing flow: pick a mood (setup), then write (session).
//!
//! The setup step hands its choices to the writing step through a
//! [`DraftStore`]. The writing step takes the draft exactly once when it
//! begins, so a stale draft can never leak into a later entry.

use chrono::{NaiveDate, Utc};

use crate::form::{save_entry, SaveError, SaveOutcome, SaveTarget};
use crate::models::{DiaryEntry, EntryId, EntryPayload, Mood};
use crate::routes::Route;
use crate::storage::{PhotoUploader, StagedPhoto};
use crate::store::EntryStore;
use crate::theme::MoodTheme;
use crate::util::normalize_text_option;
use crate::{Error, Result};

pub const WRITING_HEADING: &str = "Express Your Feelings";

const MOOD_REQUIRED: &str = "Please select your mood to continue";

/// Choices carried from setup to the writing screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: Option<String>,
    pub mood: Mood,
    pub photo: Option<StagedPhoto>,
}

impl EntryDraft {
    pub fn photo_preview(&self) -> Option<String> {
        self.photo.as_ref().map(StagedPhoto::preview_data_url)
    }
}

/// Holds at most one pending draft.
#[derive(Debug, Default)]
pub struct DraftStore {
    slot: Option<EntryDraft>,
}

impl DraftStore {
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Replace any pending draft.
    pub fn put(&mut self, draft: EntryDraft) {
        self.slot = Some(draft);
    }

    pub const fn take(&mut self) -> Option<EntryDraft> {
        self.slot.take()
    }

    pub const fn peek(&self) -> Option<&EntryDraft> {
        self.slot.as_ref()
    }

    pub const fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

/// First step: mood (required), title and photo (optional).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntrySetup {
    title: String,
    mood: Option<Mood>,
    photo: Option<StagedPhoto>,
}

impl EntrySetup {
    pub const fn new() -> Self {
        Self {
            title: String::new(),
            mood: None,
            photo: None,
        }
    }

    /// Select a mood by name. An unknown name leaves the selection unchanged.
    pub fn select_mood(&mut self, raw: &str) -> Result<Mood> {
        let mood = raw.parse::<Mood>()?;
        self.mood = Some(mood);
        Ok(mood)
    }

    pub const fn set_mood(&mut self, mood: Mood) {
        self.mood = Some(mood);
    }

    pub const fn mood(&self) -> Option<Mood> {
        self.mood
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn stage_photo(&mut self, photo: StagedPhoto) {
        self.photo = Some(photo);
    }

    pub fn remove_photo(&mut self) {
        self.photo = None;
    }

    pub fn photo_preview(&self) -> Option<String> {
        self.photo.as_ref().map(StagedPhoto::preview_data_url)
    }

    pub const fn can_start_writing(&self) -> bool {
        self.mood.is_some()
    }

    /// Move the setup into `drafts` and return the writing route. Without a
    /// mood nothing is stored and the setup is kept as is.
    pub fn start_writing(&mut self, drafts: &mut DraftStore) -> Result<Route> {
        let Some(mood) = self.mood else {
            return Err(Error::InvalidInput(MOOD_REQUIRED.to_string()));
        };
        drafts.put(EntryDraft {
            title: normalize_text_option(Some(std::mem::take(&mut self.title))),
            mood,
            photo: self.photo.take(),
        });
        self.mood = None;
        Ok(Route::write(mood))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritingState {
    Writing,
    Saved,
}

/// Second step: the mood-themed writing screen.
#[derive(Debug, Clone)]
pub struct WritingSession {
    mood: Mood,
    entry_date: NaiveDate,
    title: String,
    content: String,
    photo: Option<StagedPhoto>,
    existing: Option<DiaryEntry>,
    state: WritingState,
}

impl WritingSession {
    /// Start a new entry dated `today`, consuming the pending draft if any.
    pub fn begin(mood: Mood, drafts: &mut DraftStore, today: NaiveDate) -> Self {
        let draft = drafts.take();
        if let Some(draft) = &draft {
            if draft.mood != mood {
                tracing::debug!("Draft mood {} overridden by route mood {mood}", draft.mood);
            }
        }
        let (title, photo) = draft.map_or((None, None), |draft| (draft.title, draft.photo));
        Self {
            mood,
            entry_date: today,
            title: title.unwrap_or_default(),
            content: String::new(),
            photo,
            existing: None,
            state: WritingState::Writing,
        }
    }

    /// Open an existing entry for editing. The entry's own mood themes the
    /// screen; `route_mood` is used only when the entry has none.
    pub async fn begin_edit<S: EntryStore>(
        route_mood: Mood,
        entry_id: &EntryId,
        user_id: &str,
        store: &S,
    ) -> Result<Self> {
        let entry = store
            .get_entry(user_id, entry_id)
            .await?
            .ok_or_else(|| Error::NotFound(entry_id.to_string()))?;
        Ok(Self {
            mood: entry.mood.unwrap_or(route_mood),
            entry_date: entry.entry_date,
            title: entry.title.clone().unwrap_or_default(),
            content: entry.content.clone(),
            photo: None,
            existing: Some(entry),
            state: WritingState::Writing,
        })
    }

    /// Begin from a writing route, loading the entry when the route names one.
    pub async fn from_route<S: EntryStore>(
        route: &Route,
        drafts: &mut DraftStore,
        today: NaiveDate,
        user_id: &str,
        store: &S,
    ) -> Result<Self> {
        match route {
            Route::Write {
                mood,
                entry_id: Some(id),
            } => Self::begin_edit(*mood, id, user_id, store).await,
            Route::Write {
                mood,
                entry_id: None,
            } => Ok(Self::begin(*mood, drafts, today)),
            other => Err(Error::InvalidInput(format!(
                "Not a writing route: {other}"
            ))),
        }
    }

    pub const fn mood(&self) -> Mood {
        self.mood
    }

    pub const fn theme(&self) -> MoodTheme {
        self.mood.theme()
    }

    pub const fn heading(&self) -> &'static str {
        WRITING_HEADING
    }

    pub fn subheading(&self) -> String {
        format!(
            "Write about your {} mood and capture this moment",
            self.mood
        )
    }

    pub const fn state(&self) -> WritingState {
        self.state
    }

    pub const fn is_editing(&self) -> bool {
        self.existing.is_some()
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

    pub fn photo_preview(&self) -> Option<String> {
        match (&self.photo, &self.existing) {
            (Some(photo), _) => Some(photo.preview_data_url()),
            (None, Some(existing)) => existing.photo_url.clone(),
            (None, None) => None,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Upload the draft photo, write the row and move to `Saved`. A failed
    /// save keeps the session in `Writing` with its draft intact.
    pub async fn save<S, U>(
        &mut self,
        user_id: &str,
        store: &S,
        uploader: &U,
    ) -> std::result::Result<SaveOutcome, SaveError>
    where
        S: EntryStore,
        U: PhotoUploader,
    {
        if self.state == WritingState::Saved {
            return Err(SaveError::Validation("Entry already saved".to_string()));
        }
        let title = normalize_text_option(Some(self.title.clone()));
        let content = self.content.trim().to_string();
        let existing = self.existing.as_ref();
        // Editing keeps the stored day, mood and photo.
        let payload = EntryPayload {
            user_id: user_id.to_string(),
            title,
            content,
            entry_date: existing.map_or(self.entry_date, |entry| entry.entry_date),
            mood: existing.map_or(Some(self.mood), |entry| entry.mood),
            photo_url: existing.and_then(|entry| entry.photo_url.clone()),
            updated_at: existing.map(|_| Utc::now()),
        };
        let target = existing.map_or(SaveTarget::Insert, |entry| SaveTarget::Update(&entry.id));
        let photo = self.photo.as_ref().filter(|_| existing.is_none());
        let outcome = save_entry(store, uploader, target, payload, photo).await?;

        self.photo = None;
        self.state = WritingState::Saved;
        Ok(outcome)
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

    #[test]
    fn unknown_mood_cannot_start_writing() {
        let mut setup = EntrySetup::new();
        let mut drafts = DraftStore::new();

        assert!(setup.select_mood("neutral").is_err());
        assert!(!setup.can_start_writing());
        let error = setup.start_writing(&mut drafts).unwrap_err();
        assert!(error.to_string().contains("Please select your mood"));
        assert!(drafts.is_empty());
    }

    #[test]
    fn setup_hands_draft_to_store() {
        let mut setup = EntrySetup::new();
        let mut drafts = DraftStore::new();
        setup.select_mood("Excited").unwrap();
        setup.set_title("  Concert ");
        setup.stage_photo(StagedPhoto::new("stage.jpg", vec![9]).unwrap());

        let route = setup.start_writing(&mut drafts).unwrap();

        assert_eq!(route.path(), "/write/excited");
        let draft = drafts.peek().unwrap();
        assert_eq!(draft.title.as_deref(), Some("Concert"));
        assert_eq!(draft.mood, Mood::Excited);
        assert!(draft.photo_preview().is_some());
    }

    #[test]
    fn draft_is_taken_once() {
        let mut drafts = DraftStore::new();
        drafts.put(EntryDraft {
            title: Some("Once".to_string()),
            mood: Mood::Happy,
            photo: None,
        });

        let first = WritingSession::begin(Mood::Happy, &mut drafts, date("2024-03-01"));
        let second = WritingSession::begin(Mood::Happy, &mut drafts, date("2024-03-01"));

        assert_eq!(first.title(), "Once");
        assert_eq!(second.title(), "");
        assert!(drafts.is_empty());
    }

    #[test]
    fn session_is_themed_by_mood() {
        let mut drafts = DraftStore::new();
        let session = WritingSession::begin(Mood::Peaceful, &mut drafts, date("2024-03-01"));
        assert_eq!(session.theme(), Mood::Peaceful.theme());
        assert_eq!(session.heading(), "Express Your Feelings");
        assert_eq!(
            session.subheading(),
            "Write about your peaceful mood and capture this moment"
        );
    }

    #[tokio::test]
    async fn new_entry_flow_saves_draft_fields() {
        let store = MemoryEntryStore::default();
        let uploader = MemoryPhotoStorage::default();
        let mut drafts = DraftStore::new();
        let mut setup = EntrySetup::new();
        setup.set_mood(Mood::Happy);
        setup.set_title("Picnic");
        setup.stage_photo(StagedPhoto::new("park.webp", vec![1, 2]).unwrap());
        let route = setup.start_writing(&mut drafts).unwrap();

        let mut session =
            WritingSession::from_route(&route, &mut drafts, date("2024-05-04"), "user-1", &store)
                .await
                .unwrap();
        session.set_content("Sunny afternoon.");
        let saved = session
            .save("user-1", &store, &uploader)
            .await
            .unwrap()
            .into_entry();

        assert_eq!(session.state(), WritingState::Saved);
        assert_eq!(saved.title.as_deref(), Some("Picnic"));
        assert_eq!(saved.mood, Some(Mood::Happy));
        assert_eq!(saved.entry_date, date("2024-05-04"));
        assert_eq!(saved.photo_url, Some(format!("{PUBLIC_BASE}/user-1/0.webp")));
        assert!(session.photo_preview().is_none());
        assert!(session.save("user-1", &store, &uploader).await.is_err());
    }

    #[tokio::test]
    async fn edit_variant_changes_content_not_date_or_mood() {
        let mut existing = entry("user-1", "2024-01-15", "original");
        existing.mood = Some(Mood::Anxious);
        let store = MemoryEntryStore::with_rows(vec![existing.clone()]);
        let uploader = MemoryPhotoStorage::default();
        let mut drafts = DraftStore::new();
        let route = Route::parse(&format!("/write/happy?entryId={}", existing.id));

        let mut session =
            WritingSession::from_route(&route, &mut drafts, date("2024-06-01"), "user-1", &store)
                .await
                .unwrap();
        assert!(session.is_editing());
        assert_eq!(session.mood(), Mood::Anxious);
        assert_eq!(session.content(), "original");

        session.set_content("revised");
        let updated = session
            .save("user-1", &store, &uploader)
            .await
            .unwrap()
            .into_entry();

        assert_eq!(updated.id, existing.id);
        assert_eq!(updated.content, "revised");
        assert_eq!(updated.entry_date, date("2024-01-15"));
        assert_eq!(updated.mood, Some(Mood::Anxious));
        assert!(updated.updated_at > existing.updated_at);
        assert_eq!(uploader.calls(), 0);
    }

    #[tokio::test]
    async fn edit_of_missing_entry_is_not_found() {
        let store = MemoryEntryStore::default();
        let missing = EntryId::generate();
        let error = WritingSession::begin_edit(Mood::Calm, &missing, "user-1", &store)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn failed_save_stays_in_writing() {
        let store = MemoryEntryStore::default();
        store.fail_writes();
        let uploader = MemoryPhotoStorage::default();
        let mut drafts = DraftStore::new();
        let mut session = WritingSession::begin(Mood::Sad, &mut drafts, date("2024-03-01"));
        session.set_content("rainy");

        assert!(session.save("user-1", &store, &uploader).await.is_err());
        assert_eq!(session.state(), WritingState::Writing);
    }
}
