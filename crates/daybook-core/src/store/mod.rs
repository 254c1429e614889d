//! Entry and profile table access.
//!
//! Every call is a single request against the hosted backend, scoped to the
//! signed-in user's id. The traits are the seam the form, calendar and writing
//! flows depend on; [`SupabaseRestClient`] is the production implementation.

mod postgrest;

pub use postgrest::SupabaseRestClient;

use crate::error::Result;
use crate::models::{DiaryEntry, EntryId, EntryPayload, Profile};

/// Create/read/update operations on the `diary_entries` table.
#[allow(async_fn_in_trait)]
pub trait EntryStore {
    /// All entries owned by `user_id`, `entry_date` descending
    async fn list_entries(&self, user_id: &str) -> Result<Vec<DiaryEntry>>;

    /// A single entry owned by `user_id`
    async fn get_entry(&self, user_id: &str, id: &EntryId) -> Result<Option<DiaryEntry>>;

    /// Insert a new row and return it as stored
    async fn insert_entry(&self, payload: &EntryPayload) -> Result<DiaryEntry>;

    /// Overwrite the row matching `id` (and `payload.user_id`)
    async fn update_entry(&self, id: &EntryId, payload: &EntryPayload) -> Result<DiaryEntry>;
}

/// Read-only access to the `profiles` table.
#[allow(async_fn_in_trait)]
pub trait ProfileStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>>;
}
