//! Where the client keeps its tokens and the signed-in profile.
//!
//! The client never touches storage directly; it goes through
//! [`SessionStore`] so tests and other front ends can supply their own.

use std::sync::Arc;

use async_trait::async_trait;
use jurislead_core::{UserProfile, keys};
use jurislead_store::{LocalStorage, StoreError};
use tracing::debug;

use crate::models::Tokens;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn access_token(&self) -> Result<Option<String>, StoreError>;

    async fn refresh_token(&self) -> Result<Option<String>, StoreError>;

    /// Persist a fresh login: both tokens, the profile, and the logged-in
    /// flag.
    async fn store_login(&self, tokens: &Tokens, user: &UserProfile) -> Result<(), StoreError>;

    async fn store_access_token(&self, token: &str) -> Result<(), StoreError>;

    async fn store_refresh_token(&self, token: &str) -> Result<(), StoreError>;

    async fn store_profile(&self, user: &UserProfile) -> Result<(), StoreError>;

    /// The stored profile. A value that does not parse is
    /// [`StoreError::Corrupt`].
    async fn profile(&self) -> Result<Option<UserProfile>, StoreError>;

    /// Logged-in flag set and an access token present.
    async fn is_authenticated(&self) -> Result<bool, StoreError>;

    /// Remove every session key.
    async fn clear(&self) -> Result<(), StoreError>;
}

/// [`SessionStore`] over the shared [`LocalStorage`] map, using the same
/// keys as the web front end.
#[derive(Clone)]
pub struct StorageSession {
    storage: Arc<LocalStorage>,
}

impl StorageSession {
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<LocalStorage> {
        &self.storage
    }
}

#[async_trait]
impl SessionStore for StorageSession {
    async fn access_token(&self) -> Result<Option<String>, StoreError> {
        self.storage.get_item(keys::ACCESS_TOKEN)
    }

    async fn refresh_token(&self) -> Result<Option<String>, StoreError> {
        self.storage.get_item(keys::REFRESH_TOKEN)
    }

    async fn store_login(&self, tokens: &Tokens, user: &UserProfile) -> Result<(), StoreError> {
        self.storage.set_item(keys::ACCESS_TOKEN, &tokens.access)?;
        self.storage.set_item(keys::REFRESH_TOKEN, &tokens.refresh)?;
        self.storage.set_json(keys::USER_PROFILE, user)?;
        self.storage.set_item(keys::LOGGED_IN, "true")?;
        debug!(user = %user.id, "stored login session");
        Ok(())
    }

    async fn store_access_token(&self, token: &str) -> Result<(), StoreError> {
        self.storage.set_item(keys::ACCESS_TOKEN, token)
    }

    async fn store_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        self.storage.set_item(keys::REFRESH_TOKEN, token)
    }

    async fn store_profile(&self, user: &UserProfile) -> Result<(), StoreError> {
        self.storage.set_json(keys::USER_PROFILE, user)
    }

    async fn profile(&self) -> Result<Option<UserProfile>, StoreError> {
        self.storage.get_json(keys::USER_PROFILE)
    }

    async fn is_authenticated(&self) -> Result<bool, StoreError> {
        let flag = self.storage.get_item(keys::LOGGED_IN)?;
        let token = self.storage.get_item(keys::ACCESS_TOKEN)?;
        Ok(flag.as_deref() == Some("true") && token.is_some_and(|t| !t.is_empty()))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove_items(keys::SESSION_KEYS)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jurislead_core::UserRole;

    pub(crate) fn profile(role: UserRole) -> UserProfile {
        UserProfile {
            id: "u-1".into(),
            email: "asha@example.in".into(),
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            full_name: "Asha Rao".into(),
            phone_number: None,
            user_role: role,
            email_verified: true,
            is_google_user: false,
            date_joined: "2025-01-02T03:04:05Z".into(),
        }
    }

    pub(crate) fn tokens() -> Tokens {
        Tokens {
            access: "acc".into(),
            refresh: "ref".into(),
        }
    }

    #[tokio::test]
    async fn login_then_clear() {
        let session = StorageSession::new(Arc::new(LocalStorage::in_memory()));
        assert!(!session.is_authenticated().await.unwrap());

        session
            .store_login(&tokens(), &profile(UserRole::Client))
            .await
            .unwrap();
        assert!(session.is_authenticated().await.unwrap());
        assert_eq!(session.access_token().await.unwrap().as_deref(), Some("acc"));
        assert_eq!(session.profile().await.unwrap().unwrap().full_name, "Asha Rao");

        session.clear().await.unwrap();
        assert!(!session.is_authenticated().await.unwrap());
        assert!(session.profile().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn flag_without_token_is_not_authenticated() {
        let storage = Arc::new(LocalStorage::in_memory());
        storage.set_item(keys::LOGGED_IN, "true").unwrap();
        let session = StorageSession::new(storage);
        assert!(!session.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn clear_leaves_history_alone() {
        let storage = Arc::new(LocalStorage::in_memory());
        storage.set_item(keys::HISTORY, "[]").unwrap();
        let session = StorageSession::new(storage.clone());
        session
            .store_login(&tokens(), &profile(UserRole::Lawyer))
            .await
            .unwrap();
        session.clear().await.unwrap();
        assert_eq!(storage.get_item(keys::HISTORY).unwrap().as_deref(), Some("[]"));
    }
}
