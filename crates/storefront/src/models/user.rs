//! User account types.
//!
//! Profiles come back from the account API; the request types are built by
//! the account service after local validation.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use storepilot_core::{Email, UserId};

/// Avatar used at signup when none is given.
pub const DEFAULT_AVATAR_URL: &str = "https://picsum.photos/800";

/// A user profile as returned by `GET /auth/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account ID.
    pub id: UserId,
    /// Login email. Kept as sent; the API does not guarantee it validates.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role, e.g. `customer` or `admin`.
    #[serde(default)]
    pub role: Option<String>,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar: Option<String>,
}

impl UserProfile {
    /// First letter of the name, upper-cased, for avatar placeholders.
    #[must_use]
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map_or('?', |c| c.to_uppercase().next().unwrap_or(c))
    }
}

/// Email and password for login.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct Credentials {
    /// Validated login email.
    pub email: Email,
    /// Password as typed.
    pub password: SecretString,
}

impl Credentials {
    /// Bundle a validated email with a password.
    #[must_use]
    pub fn new(email: Email, password: impl Into<String>) -> Self {
        Self {
            email,
            password: SecretString::from(password.into()),
        }
    }

    /// JSON body for `POST /auth/login`.
    pub(crate) fn to_body(&self) -> serde_json::Value {
        serde_json::json!({
            "email": self.email.as_str(),
            "password": self.password.expose_secret(),
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Signup request for `POST /users/`.
#[derive(Clone)]
pub struct NewUser {
    /// Display name, at least three characters.
    pub name: String,
    /// Login credentials for the new account.
    pub credentials: Credentials,
    /// Avatar image URL.
    pub avatar: String,
}

impl NewUser {
    /// JSON body for `POST /users/`.
    pub(crate) fn to_body(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "email": self.credentials.email.as_str(),
            "password": self.credentials.password.expose_secret(),
            "avatar": self.avatar,
        })
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("credentials", &self.credentials)
            .field("avatar", &self.avatar)
            .finish()
    }
}

/// Profile edit for `PUT /users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    /// New display name.
    pub name: String,
    /// New login email.
    pub email: Email,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserializes_api_shape() {
        let json = r#"{
            "id": 1,
            "email": "john@mail.com",
            "password": "changeme",
            "name": "Jhon",
            "role": "customer",
            "avatar": "https://i.imgur.com/LDOO4Qs.jpg",
            "creationAt": "2024-01-01T00:00:00.000Z"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, UserId::new(1));
        assert_eq!(profile.role.as_deref(), Some("customer"));
        assert_eq!(profile.initial(), 'J');
    }

    #[test]
    fn test_request_bodies_carry_password() {
        let credentials = Credentials::new(Email::parse("john@mail.com").unwrap(), "abc123");
        assert_eq!(credentials.to_body()["password"], "abc123");

        let new_user = NewUser {
            name: "John".to_string(),
            credentials,
            avatar: DEFAULT_AVATAR_URL.to_string(),
        };
        let body = new_user.to_body();
        assert_eq!(body["email"], "john@mail.com");
        assert_eq!(body["avatar"], DEFAULT_AVATAR_URL);
    }

    #[test]
    fn test_debug_redacts_password() {
        let credentials = Credentials::new(Email::parse("john@mail.com").unwrap(), "hunter22");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter22"));
    }

    #[test]
    fn test_profile_update_serializes_email_as_string() {
        let update = ProfileUpdate {
            name: "Jane".to_string(),
            email: Email::parse("jane@mail.com").unwrap(),
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, serde_json::json!({"name": "Jane", "email": "jane@mail.com"}));
    }
}
