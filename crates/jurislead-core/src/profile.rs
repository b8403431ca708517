use serde::{Deserialize, Serialize};

/// Account role discriminator used by the auth endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Lawyer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Lawyer => "lawyer",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed-in user as returned by the login and profile endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub user_role: UserRole,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub is_google_user: bool,
    #[serde(default)]
    pub date_joined: String,
}

impl UserProfile {
    /// Name for greetings: full name, else first name, else email.
    pub fn display_name(&self) -> &str {
        if !self.full_name.trim().is_empty() {
            &self.full_name
        } else if !self.first_name.trim().is_empty() {
            &self.first_name
        } else {
            &self.email
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_from_backend_json() {
        let json = r#"{
            "id": "42",
            "email": "asha@example.in",
            "first_name": "Asha",
            "last_name": "Rao",
            "full_name": "Asha Rao",
            "user_role": "lawyer",
            "email_verified": true,
            "is_google_user": false,
            "date_joined": "2025-01-04T09:30:00Z"
        }"#;
        let p: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(p.user_role, UserRole::Lawyer);
        assert_eq!(p.display_name(), "Asha Rao");
        assert!(p.phone_number.is_none());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let json = r#"{"id": "1", "email": "x@example.in", "user_role": "client"}"#;
        let p: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(p.display_name(), "x@example.in");
    }
}
