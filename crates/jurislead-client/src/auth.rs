//! Signed-in state for a front end: who the user is, what role they hold,
//! and whether a role-restricted screen may be shown.

use std::sync::Arc;

use jurislead_core::{UserProfile, UserRole};
use jurislead_store::StoreError;
use tracing::{info, warn};

use crate::models::{GoogleLoginRequest, LoginRequest, LoginSession};
use crate::{ApiClient, ApiError};

/// Outcome of checking the current user against a role restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Session still being restored.
    Loading,
    AuthenticationRequired,
    AccessDenied,
    Granted,
}

impl Access {
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }

    /// Heading and body for a refused screen; `None` when not refused.
    pub fn message(self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::AuthenticationRequired => Some((
                "Authentication Required",
                "Please log in to access this page.",
            )),
            Self::AccessDenied => Some((
                "Access Denied",
                "You don't have permission to access this page.",
            )),
            Self::Loading | Self::Granted => None,
        }
    }
}

pub struct AuthContext {
    api: Arc<ApiClient>,
    user: Option<UserProfile>,
    authenticated: bool,
    loading: bool,
}

impl AuthContext {
    /// A context that has not restored its session yet; call
    /// [`initialize`](Self::initialize).
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            user: None,
            authenticated: false,
            loading: true,
        }
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// Restore the stored session.
    ///
    /// A stored profile that cannot be read clears the session. When a
    /// profile is present it is refreshed from the backend; a failed
    /// refresh keeps the stored copy.
    pub async fn initialize(&mut self) -> Result<(), StoreError> {
        self.loading = true;
        let restored = self.restore().await;

        let result = match restored {
            Ok(Some(stored)) => {
                self.user = Some(stored);
                self.authenticated = true;
                match self.api.get_profile().await {
                    Ok(fresh) => self.user = Some(fresh),
                    Err(e) => warn!(error = %e, "profile refresh failed, keeping stored profile"),
                }
                Ok(())
            }
            Ok(None) => {
                self.user = None;
                self.authenticated = false;
                Ok(())
            }
            Err(e) => Err(e),
        };
        self.loading = false;
        result
    }

    async fn restore(&self) -> Result<Option<UserProfile>, StoreError> {
        let session = self.api.session();
        if !session.is_authenticated().await? {
            return Ok(None);
        }
        match session.profile().await {
            Ok(profile) => Ok(profile),
            Err(StoreError::Corrupt { key, reason }) => {
                warn!(%key, %reason, "stored profile unreadable, clearing session");
                session.clear().await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<&UserProfile, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            user_role: role,
        };
        let session = self.api.login(&request).await?;
        Ok(self.signed_in(session))
    }

    pub async fn google_login(&mut self, request: &GoogleLoginRequest) -> Result<&UserProfile, ApiError> {
        let session = self.api.google_login(request).await?;
        Ok(self.signed_in(session))
    }

    fn signed_in(&mut self, session: LoginSession) -> &UserProfile {
        self.authenticated = true;
        self.loading = false;
        self.user.insert(session.user)
    }

    pub async fn logout(&mut self) {
        self.api.logout().await;
        self.user = None;
        self.authenticated = false;
    }

    /// Re-fetch the profile. Failure signs the user out.
    pub async fn refresh_profile(&mut self) -> Result<&UserProfile, ApiError> {
        match self.api.get_profile().await {
            Ok(profile) => Ok(&*self.user.insert(profile)),
            Err(e) => {
                warn!(error = %e, "profile refresh failed, logging out");
                self.logout().await;
                Err(e)
            }
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated && self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|u| u.user_role)
    }

    pub fn is_lawyer(&self) -> bool {
        self.role() == Some(UserRole::Lawyer)
    }

    pub fn is_client(&self) -> bool {
        self.role() == Some(UserRole::Client)
    }

    /// Check access to a screen limited to `allowed` roles. An empty slice
    /// admits any signed-in user.
    pub fn gate(&self, allowed: &[UserRole]) -> Access {
        if self.loading {
            return Access::Loading;
        }
        let Some(role) = self.role().filter(|_| self.is_authenticated()) else {
            return Access::AuthenticationRequired;
        };
        if allowed.is_empty() || allowed.contains(&role) {
            Access::Granted
        } else {
            info!(%role, "access denied for role");
            Access::AccessDenied
        }
    }
}
