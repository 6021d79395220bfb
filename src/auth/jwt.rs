use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    auth::claims::{Claims, PasswordResetClaims, PASSWORD_RESET_PURPOSE},
    errors::{AppError, AppResult},
    models::domain::user::User,
};

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration_hours: i64,
}

impl JwtService {
    pub fn new(secret: &SecretString, expiration_hours: i64) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            validation: Validation::default(),
            expiration_hours,
        }
    }

    pub fn create_token(&self, user: &User) -> AppResult<String> {
        let claims = Claims::new(user, self.expiration_hours);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to create JWT: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized("Token has expired".to_string())
                }
                _ => AppError::Unauthorized(format!("Invalid token: {}", e)),
            })
    }

    pub fn create_password_reset_token(&self, user: &User, lifetime_hours: i64) -> AppResult<String> {
        let claims = PasswordResetClaims::new(user, lifetime_hours);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to create reset token: {}", e)))
    }

    pub fn validate_password_reset_token(&self, token: &str) -> AppResult<PasswordResetClaims> {
        let invalid = || {
            AppError::ValidationError("The password reset link is not valid or has expired".to_string())
        };

        let claims = decode::<PasswordResetClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Rejected password reset token: {}", e);
                invalid()
            })?;

        if claims.purpose != PASSWORD_RESET_PURPOSE {
            return Err(invalid());
        }
        Ok(claims)
    }

    pub fn expiration_hours(&self) -> i64 {
        self.expiration_hours
    }
}
