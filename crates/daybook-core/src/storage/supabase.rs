//! Supabase Storage implementation of [`PhotoUploader`].

use reqwest::Client;

use super::{photo_object_key, PhotoUploader, StagedPhoto, UploadedPhoto};
use crate::config::DEFAULT_REQUEST_TIMEOUT;
use crate::util::{is_http_url, parse_api_error, unix_timestamp_millis};
use crate::{Error, Result};

/// Uploads entry photos into one public bucket, authorized as one user.
#[derive(Debug, Clone)]
pub struct SupabasePhotoStorage {
    storage_url: String,
    bucket: String,
    anon_key: String,
    access_token: String,
    client: Client,
}

impl SupabasePhotoStorage {
    pub fn new(
        project_url: impl AsRef<str>,
        anon_key: impl Into<String>,
        access_token: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Result<Self> {
        let storage_url = normalize_storage_url(project_url.as_ref())?;
        let bucket = bucket.into().trim().trim_matches('/').to_string();
        if bucket.is_empty() {
            return Err(Error::InvalidInput(
                "Photo bucket name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            storage_url,
            bucket,
            anon_key: anon_key.into(),
            access_token: access_token.into(),
            client: Client::builder().timeout(DEFAULT_REQUEST_TIMEOUT).build()?,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Public URL for an object in the bucket.
    pub fn public_url(&self, object_key: &str) -> String {
        format!(
            "{}/object/public/{}/{}",
            self.storage_url,
            self.bucket,
            encode_object_key(object_key)
        )
    }

    fn object_url(&self, object_key: &str) -> String {
        format!(
            "{}/object/{}/{}",
            self.storage_url,
            self.bucket,
            encode_object_key(object_key)
        )
    }
}

impl PhotoUploader for SupabasePhotoStorage {
    async fn upload_photo(&self, user_id: &str, photo: &StagedPhoto) -> Result<UploadedPhoto> {
        let object_key = photo_object_key(user_id, unix_timestamp_millis(), &photo.extension())?;
        tracing::debug!("Uploading {} bytes to {}", photo.len(), object_key);

        let response = self
            .client
            .post(self.object_url(&object_key))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, photo.content_type())
            .header("x-upsert", "false")
            .body(photo.bytes().to_vec())
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(upload_error(status, &body));
        }

        Ok(UploadedPhoto {
            public_url: self.public_url(&object_key),
            object_key,
        })
    }

    async fn delete_photo(&self, object_key: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/object/{}", self.storage_url, self.bucket))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "prefixes": [object_key] }))
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Storage(format!(
                "Photo delete failed: {}",
                parse_api_error(status, &body)
            )));
        }
        Ok(())
    }
}

fn upload_error(status: reqwest::StatusCode, body: &str) -> Error {
    Error::Storage(parse_api_error(status, body))
}

fn encode_object_key(object_key: &str) -> String {
    object_key
        .trim_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn normalize_storage_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !is_http_url(trimmed) {
        return Err(Error::InvalidInput(
            "Supabase URL must include http:// or https://".to_string(),
        ));
    }
    if trimmed.ends_with("/storage/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/storage/v1"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SupabasePhotoStorage {
        SupabasePhotoStorage::new("https://demo.supabase.co/", "anon", "token", "diary-photos")
            .unwrap()
    }

    #[test]
    fn public_url_points_at_public_bucket_path() {
        assert_eq!(
            storage().public_url("user-1/1700000000000.png"),
            "https://demo.supabase.co/storage/v1/object/public/diary-photos/user-1/1700000000000.png"
        );
    }

    #[test]
    fn upload_error_reads_once_through_save_error() {
        let error = upload_error(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"message":"bucket is full"}"#,
        );
        let rendered = crate::SaveError::Upload(error).to_string();
        assert_eq!(rendered, "Photo upload failed: Storage error: bucket is full (500)");
        assert_eq!(rendered.matches("Photo upload failed").count(), 1);
    }

    #[test]
    fn object_key_segments_are_encoded() {
        assert_eq!(encode_object_key("/a b/c.png"), "a%20b/c.png");
    }

    #[test]
    fn rejects_blank_bucket() {
        assert!(SupabasePhotoStorage::new("https://demo.supabase.co", "anon", "t", " / ").is_err());
    }

    #[test]
    fn normalize_storage_url_requires_scheme() {
        assert!(normalize_storage_url("demo.supabase.co").is_err());
        assert_eq!(
            normalize_storage_url("https://demo.supabase.co/storage/v1/").unwrap(),
            "https://demo.supabase.co/storage/v1"
        );
    }
}
