//! Photo staging and object storage.

mod photo;
mod supabase;

pub use photo::{photo_object_key, StagedPhoto, MAX_PHOTO_BYTES};
pub use supabase::SupabasePhotoStorage;

use crate::Result;

/// A photo that reached object storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPhoto {
    /// Key inside the bucket, needed to delete the object again
    pub object_key: String,
    /// URL stored on the entry row
    pub public_url: String,
}

/// Object storage operations used by the save flows.
#[allow(async_fn_in_trait)]
pub trait PhotoUploader {
    /// Upload under `{user_id}/{timestamp}.{ext}` and resolve the public URL.
    async fn upload_photo(&self, user_id: &str, photo: &StagedPhoto) -> Result<UploadedPhoto>;

    /// Remove an uploaded object (orphan cleanup after a failed row write).
    async fn delete_photo(&self, object_key: &str) -> Result<()>;
}
