//! Session management
//!
//! Turns credentials or a stored remember-token into a session token and
//! keeps the remember-token store in step with password logins.

use std::fmt;

use log::{info, warn};
use serde::Serialize;

use crate::client::BrokerageApi;
use crate::error::Result;
use crate::storage::TokenStore;

/// Username/password pair from the login form
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields filled in
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of POST /sessions
#[derive(Clone, Serialize)]
#[serde(untagged)]
pub enum LoginPayload {
    Password {
        login: String,
        password: String,
        #[serde(rename = "remember-me")]
        remember_me: bool,
    },
    RememberToken {
        #[serde(rename = "remember-token")]
        remember_token: String,
    },
}

impl LoginPayload {
    pub fn password(credentials: Credentials) -> Self {
        LoginPayload::Password {
            login: credentials.username,
            password: credentials.password,
            remember_me: true,
        }
    }

    pub fn remember_token(token: impl Into<String>) -> Self {
        LoginPayload::RememberToken {
            remember_token: token.into(),
        }
    }

    pub fn is_password(&self) -> bool {
        matches!(self, LoginPayload::Password { .. })
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            LoginPayload::Password { .. } => "password",
            LoginPayload::RememberToken { .. } => "remember-token",
        }
    }
}

impl fmt::Debug for LoginPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginPayload::Password { login, .. } => f
                .debug_struct("Password")
                .field("login", login)
                .finish_non_exhaustive(),
            LoginPayload::RememberToken { .. } => {
                f.debug_struct("RememberToken").finish_non_exhaustive()
            }
        }
    }
}

/// Short-lived token sent as `Authorization` on every authenticated call
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Login and remember-token bookkeeping
pub struct SessionManager<'a, A, S> {
    api: &'a A,
    store: &'a S,
}

impl<'a, A: BrokerageApi, S: TokenStore> SessionManager<'a, A, S> {
    pub fn new(api: &'a A, store: &'a S) -> Self {
        Self { api, store }
    }

    /// Create a session. Password logins persist the issued remember-token.
    pub async fn login(&self, payload: &LoginPayload) -> Result<SessionToken> {
        let session = self.api.create_session(payload).await?;

        if payload.is_password() {
            match session.remember_token.as_deref() {
                Some(token) if !token.is_empty() => self.store.save(token).await?,
                _ => warn!("Password login succeeded without a remember-token"),
            }
        }

        info!("Session established via {}", payload.kind());
        Ok(SessionToken::new(session.session_token))
    }

    /// Payload for a silent login, if a remember-token is stored
    pub async fn stored_payload(&self) -> Result<Option<LoginPayload>> {
        Ok(self
            .store
            .load()
            .await?
            .filter(|token| !token.is_empty())
            .map(LoginPayload::remember_token))
    }

    /// Drop the stored remember-token
    pub async fn forget(&self) -> Result<()> {
        self.store.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use crate::storage::MemoryTokenStore;
    use crate::test_support::{FakeBrokerage, LoginBehavior};

    #[test]
    fn test_password_payload_serialization() {
        let payload = LoginPayload::password(Credentials::new("trader", "hunter2"));
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"login": "trader", "password": "hunter2", "remember-me": true})
        );
    }

    #[test]
    fn test_remember_payload_serialization() {
        let payload = LoginPayload::remember_token("tok");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"remember-token": "tok"}));
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let creds = Credentials::new("trader", "hunter2");
        assert!(!format!("{creds:?}").contains("hunter2"));

        let payload = LoginPayload::password(creds);
        assert!(!format!("{payload:?}").contains("hunter2"));

        let remember = LoginPayload::remember_token("secret-remember");
        assert!(!format!("{remember:?}").contains("secret-remember"));

        let token = SessionToken::new("secret-session");
        assert!(!format!("{token:?}").contains("secret-session"));
    }

    #[tokio::test]
    async fn test_password_login_persists_remember_token() {
        let api = FakeBrokerage::default();
        let store = MemoryTokenStore::default();
        let manager = SessionManager::new(&api, &store);

        let token = manager
            .login(&LoginPayload::password(Credentials::new("trader", "pw")))
            .await
            .expect("login should succeed");

        assert_eq!(token.as_str(), "session-1");
        assert_eq!(store.peek().as_deref(), Some("remember-1"));
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_remember_login_writes_nothing() {
        let api = FakeBrokerage::default();
        let store = MemoryTokenStore::with_token("old-remember");
        let manager = SessionManager::new(&api, &store);

        let payload = manager.stored_payload().await.unwrap().expect("token stored");
        manager.login(&payload).await.expect("login should succeed");

        assert_eq!(store.writes(), 0);
        assert_eq!(store.peek().as_deref(), Some("old-remember"));
    }

    #[tokio::test]
    async fn test_unauthorized_login() {
        let api = FakeBrokerage {
            login: LoginBehavior::Unauthorized,
            ..FakeBrokerage::default()
        };
        let store = MemoryTokenStore::default();
        let manager = SessionManager::new(&api, &store);

        let err = manager
            .login(&LoginPayload::password(Credentials::new("trader", "bad")))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidCredentials));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_missing_remember_token_is_not_persisted() {
        let api = FakeBrokerage {
            login: LoginBehavior::NoRememberToken,
            ..FakeBrokerage::default()
        };
        let store = MemoryTokenStore::default();
        let manager = SessionManager::new(&api, &store);

        manager
            .login(&LoginPayload::password(Credentials::new("trader", "pw")))
            .await
            .expect("login should succeed");
        assert_eq!(store.peek(), None);
    }

    #[tokio::test]
    async fn test_stored_payload_absent() {
        let api = FakeBrokerage::default();
        let store = MemoryTokenStore::default();
        let manager = SessionManager::new(&api, &store);
        assert!(manager.stored_payload().await.unwrap().is_none());
    }
}
