use std::io;

use daybook_core::auth::AuthError;
use daybook_core::SaveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] daybook_core::Error),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No entry content provided")]
    EmptyContent,
    #[error("Entry ID is not valid: {0}")]
    InvalidEntryId(String),
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "Profile '{0}' has no backend configured. Run `daybook config init` or set SUPABASE_URL and SUPABASE_ANON_KEY."
    )]
    NotConfigured(String),
    #[error("Not signed in. Run `daybook auth login --email <email> --password <password>`.")]
    NotSignedIn,
}
