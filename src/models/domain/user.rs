use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use async_graphql::Enum;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// How long a freshly registered user has to follow the activation link.
pub const ACTIVATION_KEY_LIFETIME_HOURS: i64 = 48;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy, Default)]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string; carries its own salt and parameters.
    pub password_hash: String,
    #[serde(default)]
    pub role: UserRole,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_key_created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// A new, inactive user holding a fresh activation key.
    pub fn register(
        first_name: &str,
        last_name: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<Self> {
        let now = Utc::now();

        Ok(User {
            id: Uuid::new_v4().to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            role: UserRole::User,
            is_active: false,
            activation_key: Some(activation_key_for(email)),
            activation_key_created: Some(now),
            created_at: Some(now),
        })
    }

    pub fn check_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(err) => {
                log::error!("Stored password hash of '{}' is unreadable: {}", self.username, err);
                false
            }
        }
    }

    pub fn set_password(&mut self, password: &str) -> AppResult<()> {
        self.password_hash = hash_password(password)?;
        Ok(())
    }

    /// Short digest of the current password hash. Changes whenever the
    /// password does, which retires reset links issued before the change.
    pub fn password_fingerprint(&self) -> String {
        let digest = format!("{:x}", Sha256::digest(self.password_hash.as_bytes()));
        digest[..16].to_string()
    }

    pub fn is_activation_key_expired(&self, now: DateTime<Utc>) -> bool {
        match self.activation_key_created {
            Some(created) => now > created + Duration::hours(ACTIVATION_KEY_LIFETIME_HOURS),
            None => true,
        }
    }

    pub fn activate(&mut self) {
        self.activation_key = None;
        self.activation_key_created = None;
        self.is_active = true;
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {}", e)))
}

fn activation_key_for(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(Uuid::new_v4().simple().to_string()[..6].as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
impl User {
    pub fn test_user(username: &str) -> Self {
        let mut user = User::register(
            "Test",
            "User",
            username,
            &format!("{}@example.com", username),
            "password123",
        )
        .expect("hash password");
        user.activate();
        user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_user_is_inactive_with_key() {
        let user = User::register("John", "Doe", "johndoe", "john@example.com", "secret-pass")
            .expect("user");

        assert!(!user.is_active);
        assert_eq!(user.activation_key.as_ref().map(|k| k.len()), Some(64));
        assert!(!user.is_activation_key_expired(Utc::now()));
        assert_eq!(user.full_name(), "John Doe");
    }

    #[test]
    fn password_is_stored_as_argon2_hash() {
        let user = User::register("John", "Doe", "johndoe", "john@example.com", "secret-pass")
            .expect("user");

        assert!(user.password_hash.starts_with("$argon2"));
        assert!(!user.password_hash.contains("secret-pass"));
        assert!(user.check_password("secret-pass"));
        assert!(!user.check_password("other-pass"));
    }

    #[test]
    fn same_password_gets_distinct_hashes() {
        let first = User::register("John", "Doe", "johndoe", "john@example.com", "secret-pass")
            .expect("user");
        let second = User::register("Jane", "Doe", "janedoe", "jane@example.com", "secret-pass")
            .expect("user");

        assert_ne!(first.password_hash, second.password_hash);
    }

    #[test]
    fn set_password_replaces_hash_and_fingerprint() {
        let mut user = User::register("John", "Doe", "johndoe", "john@example.com", "secret-pass")
            .expect("user");
        let fingerprint = user.password_fingerprint();

        user.set_password("new-secret").expect("set password");

        assert!(user.check_password("new-secret"));
        assert!(!user.check_password("secret-pass"));
        assert_ne!(user.password_fingerprint(), fingerprint);
    }

    #[test]
    fn unreadable_hash_rejects_every_password() {
        let mut user = User::test_user("johndoe");
        user.password_hash = "not-a-phc-string".to_string();

        assert!(!user.check_password("password123"));
    }

    #[test]
    fn activation_key_expires_after_48_hours() {
        let user = User::register("John", "Doe", "johndoe", "john@example.com", "secret-pass")
            .expect("user");
        let later = Utc::now() + Duration::hours(ACTIVATION_KEY_LIFETIME_HOURS + 1);

        assert!(user.is_activation_key_expired(later));
    }

    #[test]
    fn activate_clears_key() {
        let mut user = User::register("John", "Doe", "johndoe", "john@example.com", "secret-pass")
            .expect("user");
        user.activate();

        assert!(user.is_active);
        assert!(user.activation_key.is_none());
        assert!(user.activation_key_created.is_none());
    }
}
