//! PostgREST-backed implementation of the entry and profile stores.

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::{EntryStore, ProfileStore};
use crate::config::DEFAULT_REQUEST_TIMEOUT;
use crate::error::{Error, Result};
use crate::models::{DiaryEntry, EntryId, EntryPayload, Profile};
use crate::util::{is_http_url, parse_api_error};

const ENTRIES_TABLE: &str = "diary_entries";
const PROFILES_TABLE: &str = "profiles";

/// HTTP client for the project's `/rest/v1` tables, authorized as one user.
#[derive(Debug, Clone)]
pub struct SupabaseRestClient {
    rest_url: String,
    anon_key: String,
    access_token: String,
    client: Client,
}

impl SupabaseRestClient {
    pub fn new(
        project_url: impl AsRef<str>,
        anon_key: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        let rest_url = normalize_rest_url(project_url.as_ref())?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(Error::InvalidInput(
                "Supabase anon key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            rest_url,
            anon_key,
            access_token: access_token.into(),
            client: Client::builder().timeout(DEFAULT_REQUEST_TIMEOUT).build()?,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.rest_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json")
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Vec<T>> {
        let response = self.authorized(request).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    async fn write_row(&self, request: RequestBuilder) -> Result<Option<DiaryEntry>> {
        let rows: Vec<DiaryEntry> = self
            .fetch_rows(request.header("Prefer", "return=representation"))
            .await?;
        Ok(rows.into_iter().next())
    }
}

impl EntryStore for SupabaseRestClient {
    async fn list_entries(&self, user_id: &str) -> Result<Vec<DiaryEntry>> {
        tracing::debug!("Listing entries for user {}", user_id);
        let request = self
            .client
            .get(self.table_url(ENTRIES_TABLE))
            .query(&list_entries_query(user_id));
        self.fetch_rows(request).await
    }

    async fn get_entry(&self, user_id: &str, id: &EntryId) -> Result<Option<DiaryEntry>> {
        let request = self
            .client
            .get(self.table_url(ENTRIES_TABLE))
            .query(&entry_filter(user_id, id))
            .query(&[("select", "*")]);
        let rows: Vec<DiaryEntry> = self.fetch_rows(request).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_entry(&self, payload: &EntryPayload) -> Result<DiaryEntry> {
        tracing::debug!("Inserting entry dated {}", payload.entry_date);
        let request = self
            .client
            .post(self.table_url(ENTRIES_TABLE))
            .json(payload);
        self.write_row(request)
            .await?
            .ok_or_else(|| Error::Backend("Insert returned no rows".to_string()))
    }

    async fn update_entry(&self, id: &EntryId, payload: &EntryPayload) -> Result<DiaryEntry> {
        tracing::debug!("Updating entry {}", id);
        let request = self
            .client
            .patch(self.table_url(ENTRIES_TABLE))
            .query(&entry_filter(&payload.user_id, id))
            .json(payload);
        self.write_row(request)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }
}

impl ProfileStore for SupabaseRestClient {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let request = self
            .client
            .get(self.table_url(PROFILES_TABLE))
            .query(&[
                ("select", "user_id,name".to_string()),
                ("user_id", format!("eq.{user_id}")),
                ("limit", "1".to_string()),
            ]);
        let rows: Vec<Profile> = self.fetch_rows(request).await?;
        Ok(rows.into_iter().next())
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Backend(parse_api_error(status, &body)))
}

fn list_entries_query(user_id: &str) -> [(&'static str, String); 3] {
    [
        ("select", "*".to_string()),
        ("user_id", format!("eq.{user_id}")),
        ("order", "entry_date.desc,created_at.desc".to_string()),
    ]
}

fn entry_filter(user_id: &str, id: &EntryId) -> [(&'static str, String); 2] {
    [
        ("id", format!("eq.{id}")),
        ("user_id", format!("eq.{user_id}")),
    ]
}

fn normalize_rest_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(
            "Supabase URL must not be empty".to_string(),
        ));
    }
    if !is_http_url(trimmed) {
        return Err(Error::InvalidInput(
            "Supabase URL must include http:// or https://".to_string(),
        ));
    }
    if trimmed.ends_with("/rest/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/rest/v1"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_rest_url_appends_rest_path() {
        assert_eq!(
            normalize_rest_url("https://demo.supabase.co/").unwrap(),
            "https://demo.supabase.co/rest/v1"
        );
        assert_eq!(
            normalize_rest_url("https://demo.supabase.co/rest/v1").unwrap(),
            "https://demo.supabase.co/rest/v1"
        );
    }

    #[test]
    fn normalize_rest_url_rejects_missing_scheme() {
        assert!(normalize_rest_url("demo.supabase.co").is_err());
        assert!(normalize_rest_url(" ").is_err());
    }

    #[test]
    fn list_query_scopes_by_user_and_orders_by_date() {
        let query = list_entries_query("user-1");
        assert!(query.contains(&("user_id", "eq.user-1".to_string())));
        assert!(query
            .iter()
            .any(|(key, value)| *key == "order" && value.starts_with("entry_date.desc")));
    }

    #[test]
    fn entry_filter_matches_id_and_owner() {
        let id: EntryId = "0190f3c2-7a1e-7c1d-8e2f-123456789abc".parse().unwrap();
        let filter = entry_filter("user-1", &id);
        assert_eq!(
            filter,
            [
                ("id", "eq.0190f3c2-7a1e-7c1d-8e2f-123456789abc".to_string()),
                ("user_id", "eq.user-1".to_string()),
            ]
        );
    }

    #[test]
    fn new_rejects_blank_anon_key() {
        assert!(SupabaseRestClient::new("https://demo.supabase.co", " ", "token").is_err());
    }
}
