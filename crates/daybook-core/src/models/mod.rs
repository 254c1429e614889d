//! Data models for Daybook

mod entry;
mod mood;
mod profile;

pub use entry::{DiaryEntry, EntryId, EntryPayload};
pub use mood::Mood;
pub use profile::Profile;
