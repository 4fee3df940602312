//! Registered users and profile updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::credential::PasswordDigest;
use super::id::UserId;
use crate::error::{Error, Result};
use crate::record::Record;

/// A registered user as stored in `users`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: PasswordDigest,
    pub username: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Build a new user from registration input.
    ///
    /// # Errors
    ///
    /// `Error::ValidationError` if email, password or username is blank.
    pub fn register(email: &str, password: &str, username: &str) -> Result<Self> {
        let email = email.trim();
        let username = username.trim();

        if email.is_empty() {
            return Err(Error::ValidationError("email is required".to_string()));
        }
        if username.is_empty() {
            return Err(Error::ValidationError("username is required".to_string()));
        }

        Ok(User {
            id: UserId::generate(),
            email: email.to_string(),
            password_hash: PasswordDigest::hash(password)?,
            username: username.to_string(),
            phone: String::new(),
            address: String::new(),
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    /// Check the supplied credentials against this user.
    pub fn matches_credentials(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password_hash.verify(password)
    }
}

impl Record for User {
    type Id = UserId;

    fn record_id(&self) -> Self::Id {
        self.id
    }

    fn entity_name() -> &'static str {
        "user"
    }
}

/// Editable profile fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl ProfileUpdate {
    /// Username and email are required; phone and address may be blank.
    ///
    /// # Errors
    ///
    /// `Error::ValidationError` if username or email is blank.
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() || self.email.trim().is_empty() {
            return Err(Error::ValidationError(
                "username and email are required".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply the update to a user record, stamping `updated_at`.
    pub fn apply_to(&self, user: &mut User) {
        user.username = self.username.trim().to_string();
        user.email = self.email.trim().to_string();
        user.phone = self.phone.trim().to_string();
        user.address = self.address.trim().to_string();
        user.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_trims_and_hashes() {
        let user = User::register(" ana@example.com ", "pw", " ana ").expect("register");
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.username, "ana");
        assert!(user.phone.is_empty());
        assert!(user.matches_credentials("ana@example.com", "pw"));
        assert!(!user.matches_credentials("ana@example.com", "PW"));
        assert!(!user.matches_credentials("other@example.com", "pw"));
    }

    #[test]
    fn test_register_requires_fields() {
        assert!(matches!(
            User::register("", "pw", "ana"),
            Err(Error::ValidationError(_))
        ));
        assert!(matches!(
            User::register("a@b.c", "pw", "  "),
            Err(Error::ValidationError(_))
        ));
        assert!(matches!(
            User::register("a@b.c", "", "ana"),
            Err(Error::ValidationError(_))
        ));
    }

    #[test]
    fn test_json_layout_is_camel_case() {
        let user = User::register("a@b.c", "pw", "ana").expect("register");
        let json = serde_json::to_value(&user).expect("serialize");
        assert!(json.get("passwordHash").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn test_profile_update() {
        let mut user = User::register("a@b.c", "pw", "ana").expect("register");
        let update = ProfileUpdate {
            username: "ana2".to_string(),
            email: "ana@b.c".to_string(),
            phone: "555".to_string(),
            address: "1 Main St".to_string(),
        };
        update.validate().expect("valid update");
        update.apply_to(&mut user);
        assert_eq!(user.username, "ana2");
        assert_eq!(user.address, "1 Main St");
        assert!(user.updated_at.is_some());

        let blank = ProfileUpdate::default();
        assert!(matches!(blank.validate(), Err(Error::ValidationError(_))));
    }
}
