//! Locally staged photos awaiting upload.

use std::fmt;
use std::path::Path;

use base64::Engine as _;

use crate::{Error, Result};

/// Largest photo accepted for an entry.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

const FALLBACK_EXTENSION: &str = "jpg";

/// Image bytes selected by the user; uploaded only when the entry is saved.
#[derive(Clone, PartialEq, Eq)]
pub struct StagedPhoto {
    file_name: String,
    bytes: Vec<u8>,
}

impl StagedPhoto {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into().trim().to_string();
        if bytes.is_empty() {
            return Err(Error::InvalidInput("Photo file is empty".to_string()));
        }
        if bytes.len() > MAX_PHOTO_BYTES {
            return Err(Error::InvalidInput(
                "File too large. Please select a photo smaller than 5MB.".to_string(),
            ));
        }
        Ok(Self { file_name, bytes })
    }

    /// Read and stage a photo from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if metadata.len() > MAX_PHOTO_BYTES as u64 {
            return Err(Error::InvalidInput(
                "File too large. Please select a photo smaller than 5MB.".to_string(),
            ));
        }
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(file_name, std::fs::read(path)?)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercase extension taken from the file name.
    pub fn extension(&self) -> String {
        self.file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension.trim().to_ascii_lowercase())
            .filter(|extension| {
                !extension.is_empty() && extension.chars().all(|c| c.is_ascii_alphanumeric())
            })
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
    }

    pub fn content_type(&self) -> String {
        mime_guess::from_ext(&self.extension())
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string()
    }

    /// Inline `data:` URL used as the preview before upload.
    pub fn preview_data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{encoded}", self.content_type())
    }
}

impl fmt::Debug for StagedPhoto {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("StagedPhoto")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Object key for a photo: `{user_id}/{timestamp_ms}.{ext}`.
pub fn photo_object_key(user_id: &str, timestamp_ms: i64, extension: &str) -> Result<String> {
    let user_id = user_id.trim().trim_matches('/');
    if user_id.is_empty() {
        return Err(Error::InvalidInput(
            "Photo owner id cannot be empty".to_string(),
        ));
    }
    Ok(format!("{user_id}/{timestamp_ms}.{extension}"))
}
