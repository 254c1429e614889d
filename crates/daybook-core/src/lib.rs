//! daybook-core - Core library for Daybook
//!
//! Typed access to the hosted journal backend (auth, entry table, photo
//! storage) and the client-side flows built on it: the entry form, the
//! calendar/timeline and the two-step mood writing flow.

pub mod auth;
pub mod calendar;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod models;
pub mod routes;
pub mod storage;
pub mod store;
pub mod theme;
pub mod util;
pub mod writing;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use form::{EntryForm, SaveError, SaveOutcome};
pub use models::{DiaryEntry, EntryId, Mood, Profile};
pub use routes::Route;
pub use writing::{DraftStore, EntryDraft, EntrySetup, WritingSession};
