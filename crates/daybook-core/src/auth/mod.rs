//! Supabase auth client and the session provider built on it.

use std::fmt;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DEFAULT_REQUEST_TIMEOUT;
use crate::util::{normalize_text_option, parse_api_error, unix_timestamp_now};

const EXPIRY_SKEW_SECONDS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub user: AuthUser,
}

impl AuthSession {
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= unix_timestamp_now() + EXPIRY_SKEW_SECONDS
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    SignedIn(AuthSession),
    ConfirmationRequired,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Supabase auth is not configured. Set SUPABASE_URL and SUPABASE_ANON_KEY.")]
    NotConfigured,
    #[error("Invalid auth configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("{0}")]
    Validation(&'static str),
    #[error("Not signed in")]
    NotSignedIn,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Auth API error: {0}")]
    Api(String),
    #[error("Secure storage error: {0}")]
    SecureStorage(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

pub trait SessionPersistence: Clone + Send + Sync + 'static {
    fn load_session(&self) -> AuthResult<Option<AuthSession>>;
    fn save_session(&self, session: &AuthSession) -> AuthResult<()>;
    fn clear_session(&self) -> AuthResult<()>;
}

#[derive(Clone)]
pub struct SupabaseAuthClient<S: SessionPersistence> {
    auth_url: String,
    anon_key: String,
    client: Client,
    store: S,
}

impl<S: SessionPersistence> SupabaseAuthClient<S> {
    pub fn new(url: impl AsRef<str>, anon_key: impl Into<String>, store: S) -> AuthResult<Self> {
        let auth_url = normalize_auth_url(url.as_ref())?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "Supabase anon key must not be empty",
            ));
        }

        Ok(Self {
            auth_url,
            anon_key,
            client: Client::builder().timeout(DEFAULT_REQUEST_TIMEOUT).build()?,
            store,
        })
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub async fn restore_session(&self) -> AuthResult<Option<AuthSession>> {
        let Some(stored_session) = self.store.load_session()? else {
            return Ok(None);
        };

        if !stored_session.is_expired() {
            return Ok(Some(stored_session));
        }

        match self.refresh_session(&stored_session.refresh_token).await {
            Ok(refreshed) => Ok(Some(refreshed)),
            Err(error) => {
                tracing::warn!("Failed to refresh persisted session: {}", error);
                self.store.clear_session()?;
                Ok(None)
            }
        }
    }

    /// Create an account; `name` is stored as user metadata and seeds the
    /// backend profile row.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> AuthResult<SignUpOutcome> {
        validate_credentials(email, password)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::Validation("Please enter your name to continue."));
        }

        let payload = serde_json::json!({
            "email": email.trim(),
            "password": password,
            "data": { "name": name },
        });
        let request = self.public_request(
            self.client
                .post(format!("{}/signup", self.auth_url))
                .json(&payload),
        );
        let response = self.send_auth_request(request).await?;
        match response.into_session()? {
            Some(session) => {
                self.store.save_session(&session)?;
                Ok(SignUpOutcome::SignedIn(session))
            }
            None => Ok(SignUpOutcome::ConfirmationRequired),
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        validate_credentials(email, password)?;

        let payload = serde_json::json!({
            "email": email.trim(),
            "password": password,
        });
        let request = self.public_request(
            self.client
                .post(format!("{}/token", self.auth_url))
                .query(&[("grant_type", "password")])
                .json(&payload),
        );

        let response = self.send_auth_request(request).await?;
        let session = response.into_session()?.ok_or_else(|| {
            AuthError::Api("Sign-in response did not include an active session".to_string())
        })?;

        self.store.save_session(&session)?;
        Ok(session)
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> AuthResult<AuthSession> {
        if refresh_token.trim().is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "Refresh token must not be empty",
            ));
        }

        let payload = serde_json::json!({
            "refresh_token": refresh_token,
        });
        let request = self.public_request(
            self.client
                .post(format!("{}/token", self.auth_url))
                .query(&[("grant_type", "refresh_token")])
                .json(&payload),
        );
        let response = self.send_auth_request(request).await?;
        let session = response.into_session()?.ok_or_else(|| {
            AuthError::Api("Refresh response did not include an active session".to_string())
        })?;

        self.store.save_session(&session)?;
        Ok(session)
    }

    pub async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        let request = self
            .client
            .post(format!("{}/logout", self.auth_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token);

        let response = request.send().await?;
        if !(response.status().is_success() || response.status() == StatusCode::UNAUTHORIZED) {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Api(parse_api_error(status, &body)));
        }

        self.store.clear_session()?;
        Ok(())
    }

    fn public_request(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
    }

    async fn send_auth_request(&self, request: RequestBuilder) -> AuthResult<SupabaseAuthResponse> {
        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Api(parse_api_error(status, &body)));
        }
        Ok(response.json::<SupabaseAuthResponse>().await?)
    }
}

/// Where the session provider currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Persisted session not yet restored
    Loading,
    SignedOut,
    SignedIn(AuthSession),
}

/// Current-user view over the auth client.
///
/// Every operation leaves the state untouched when it fails.
pub struct SessionProvider<S: SessionPersistence> {
    client: SupabaseAuthClient<S>,
    state: AuthState,
}

impl<S: SessionPersistence> SessionProvider<S> {
    pub const fn new(client: SupabaseAuthClient<S>) -> Self {
        Self {
            client,
            state: AuthState::Loading,
        }
    }

    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.state, AuthState::Loading)
    }

    pub const fn session(&self) -> Option<&AuthSession> {
        match &self.state {
            AuthState::SignedIn(session) => Some(session),
            AuthState::Loading | AuthState::SignedOut => None,
        }
    }

    pub fn current_user(&self) -> Option<&AuthUser> {
        self.session().map(|session| &session.user)
    }

    /// Restore (and refresh if needed) the persisted session.
    pub async fn initialize(&mut self) -> AuthResult<Option<&AuthUser>> {
        match self.client.restore_session().await {
            Ok(Some(session)) => self.state = AuthState::SignedIn(session),
            Ok(None) => self.state = AuthState::SignedOut,
            Err(error) => {
                self.state = AuthState::SignedOut;
                return Err(error);
            }
        }
        Ok(self.current_user())
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> AuthResult<&AuthUser> {
        let session = self.client.sign_in(email, password).await?;
        tracing::info!("Signed in as user {}", session.user.id);
        self.state = AuthState::SignedIn(session);
        self.current_user().ok_or(AuthError::NotSignedIn)
    }

    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> AuthResult<SignUpOutcome> {
        let outcome = self.client.sign_up(email, password, name).await?;
        if let SignUpOutcome::SignedIn(session) = &outcome {
            self.state = AuthState::SignedIn(session.clone());
        }
        Ok(outcome)
    }

    pub async fn sign_out(&mut self) -> AuthResult<()> {
        match &self.state {
            AuthState::SignedIn(session) => {
                self.client.sign_out(&session.access_token).await?;
            }
            AuthState::Loading | AuthState::SignedOut => self.client.store().clear_session()?,
        }
        self.state = AuthState::SignedOut;
        Ok(())
    }

    /// Return a session whose access token is usable right now.
    pub async fn active_session(&mut self) -> AuthResult<AuthSession> {
        if self.is_loading() {
            self.initialize().await?;
        }
        let Some(session) = self.session() else {
            return Err(AuthError::NotSignedIn);
        };
        if !session.is_expired() {
            return Ok(session.clone());
        }

        let refreshed = self.client.refresh_session(&session.refresh_token).await?;
        self.state = AuthState::SignedIn(refreshed.clone());
        Ok(refreshed)
    }
}

pub fn normalize_auth_url(url: &str) -> AuthResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AuthError::InvalidConfiguration(
            "Supabase URL must not be empty",
        ));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(AuthError::InvalidConfiguration(
            "Supabase URL must include http:// or https://",
        ));
    }
    if trimmed.ends_with("/auth/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/auth/v1"))
    }
}

pub fn resolve_optional_supabase_config(
    url: Option<String>,
    anon_key: Option<String>,
) -> AuthResult<Option<(String, String)>> {
    let url = normalize_text_option(url);
    let anon_key = normalize_text_option(anon_key);

    match (url, anon_key) {
        (None, None) => Ok(None),
        (Some(url), Some(anon_key)) => Ok(Some((url, anon_key))),
        _ => Err(AuthError::NotConfigured),
    }
}

fn validate_credentials(email: &str, password: &str) -> AuthResult<()> {
    if email.trim().is_empty() {
        return Err(AuthError::Validation("Email is required"));
    }
    if password.trim().is_empty() {
        return Err(AuthError::Validation("Password is required"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SupabaseAuthResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: Option<SupabaseUser>,
    session: Option<SupabaseAuthResponseSession>,
}

impl SupabaseAuthResponse {
    fn into_session(self) -> AuthResult<Option<AuthSession>> {
        let nested_session = self.session;
        let access_token = self.access_token.or_else(|| {
            nested_session
                .as_ref()
                .and_then(|session| session.access_token.clone())
        });
        let refresh_token = self.refresh_token.or_else(|| {
            nested_session
                .as_ref()
                .and_then(|session| session.refresh_token.clone())
        });
        let expires_at = self
            .expires_at
            .or_else(|| {
                nested_session
                    .as_ref()
                    .and_then(|session| session.expires_at)
            })
            .or_else(|| {
                self.expires_in
                    .or_else(|| {
                        nested_session
                            .as_ref()
                            .and_then(|session| session.expires_in)
                    })
                    .map(|expires_in| unix_timestamp_now().saturating_add(expires_in))
            });
        let user = self
            .user
            .or_else(|| nested_session.and_then(|session| session.user))
            .map(Into::into);

        match (access_token, refresh_token, expires_at, user) {
            (Some(access_token), Some(refresh_token), Some(expires_at), Some(user)) => {
                Ok(Some(AuthSession {
                    access_token,
                    refresh_token,
                    expires_at,
                    user,
                }))
            }
            (None, None, None, Some(_)) => Ok(None),
            _ => Err(AuthError::Api(
                "Auth response did not include enough session fields".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SupabaseAuthResponseSession {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: Option<SupabaseUser>,
}

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: String,
    email: Option<String>,
}

impl From<SupabaseUser> for AuthUser {
    fn from(value: SupabaseUser) -> Self {
        Self {
            id: value.id,
            email: value.email,
        }
    }
}
