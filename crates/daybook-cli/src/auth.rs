//! CLI session handling with secure keychain persistence.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use daybook_core::auth::{AuthResult, SessionPersistence, SessionProvider, SupabaseAuthClient};
pub use daybook_core::auth::{AuthError, AuthSession};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "daybook-cli";

#[derive(Clone)]
pub struct SessionStore {
    username: String,
}

impl SessionStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            username: format!("supabase_session:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> AuthResult<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }
}

impl SessionPersistence for SessionStore {
    #[cfg(not(test))]
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let store = Self::test_store();
        let guard = store
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        if let Some(raw) = guard.get(&self.username) {
            Ok(Some(serde_json::from_str(raw)?))
        } else {
            Ok(None)
        }
    }

    #[cfg(not(test))]
    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        self.entry()?
            .set_password(&raw)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        Ok(())
    }

    #[cfg(test)]
    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.insert(self.username.clone(), raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear_session(&self) -> AuthResult<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear_session(&self) -> AuthResult<()> {
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

pub type CliSessionProvider = SessionProvider<SessionStore>;

/// Session provider for a profile, backed by the keychain entry of that
/// profile.
pub fn session_provider(
    profile_name: &str,
    url: impl AsRef<str>,
    anon_key: impl Into<String>,
) -> AuthResult<CliSessionProvider> {
    let client = SupabaseAuthClient::new(url, anon_key, SessionStore::new(profile_name))?;
    Ok(SessionProvider::new(client))
}

pub fn load_stored_session(profile_name: &str) -> AuthResult<Option<AuthSession>> {
    SessionStore::new(profile_name).load_session()
}

pub fn clear_stored_session(profile_name: &str) -> AuthResult<()> {
    SessionStore::new(profile_name).clear_session()
}

#[cfg(test)]
mod tests {
    use daybook_core::auth::{AuthState, AuthUser};

    use super::*;

    fn session(expires_at: i64) -> AuthSession {
        AuthSession {
            access_token: "secret-access-token".to_string(),
            refresh_token: "secret-refresh-token".to_string(),
            expires_at,
            user: AuthUser {
                id: "user".to_string(),
                email: Some("me@example.com".to_string()),
            },
        }
    }

    #[test]
    fn session_debug_redacts_tokens() {
        let rendered = format!("{:?}", session(1_700_000_000));
        assert!(!rendered.contains("secret-access-token"));
        assert!(!rendered.contains("secret-refresh-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn stored_session_is_scoped_to_profile() {
        SessionStore::new("store-a")
            .save_session(&session(i64::MAX))
            .unwrap();

        assert!(load_stored_session("store-a").unwrap().is_some());
        assert!(load_stored_session("store-b").unwrap().is_none());

        clear_stored_session("store-a").unwrap();
        assert!(load_stored_session("store-a").unwrap().is_none());
    }

    #[tokio::test]
    async fn provider_restores_stored_session() {
        SessionStore::new("restore")
            .save_session(&session(i64::MAX))
            .unwrap();
        let mut provider =
            session_provider("restore", "https://demo.supabase.co", "anon").unwrap();
        assert!(provider.is_loading());

        let user = provider.initialize().await.unwrap().cloned();
        assert_eq!(user.map(|user| user.id), Some("user".to_string()));
        assert!(matches!(provider.state(), AuthState::SignedIn(_)));

        clear_stored_session("restore").unwrap();
    }
}
