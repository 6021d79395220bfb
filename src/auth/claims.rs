use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::user::{User, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub exp: usize, // Expiration time (as UTC timestamp)
    pub iat: usize, // Issued at (as UTC timestamp)
}

impl Claims {
    pub fn new(user: &User, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

pub const PASSWORD_RESET_PURPOSE: &str = "password_reset";

/// Claims of a password reset link. Bound to the password hash at issue time
/// through `fingerprint`, so a link stops working once the password changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetClaims {
    pub sub: String,
    pub email: String,
    pub fingerprint: String,
    pub purpose: String,
    pub exp: usize,
    pub iat: usize,
}

impl PasswordResetClaims {
    pub fn new(user: &User, lifetime_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(lifetime_hours);

        Self {
            sub: user.id.clone(),
            email: user.email.clone(),
            fingerprint: user.password_fingerprint(),
            purpose: PASSWORD_RESET_PURPOSE.to_string(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        }
    }
}
