use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use validator::Validate;

use crate::{
    auth::JwtService,
    errors::{AppError, AppResult},
    models::{
        domain::User,
        dto::request::{
            LoginRequest, PasswordResetConfirmRequest, PasswordResetRequest, RegisterRequest,
        },
    },
    repositories::UserRepository,
    services::mailer::{Email, Mailer},
};

/// How long a mailed password reset link stays usable.
pub const PASSWORD_RESET_LIFETIME_HOURS: i64 = 72;

#[derive(Clone, Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub username: String,
}

/// Registration, e-mail verification, login and password recovery.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
    jwt: JwtService,
    domain_name: String,
    sender: String,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
        jwt: JwtService,
        domain_name: &str,
        sender: &str,
    ) -> Self {
        Self {
            users,
            mailer,
            jwt,
            domain_name: domain_name.trim_end_matches('/').to_string(),
            sender: sender.to_string(),
        }
    }

    pub fn verification_link(&self, user: &User) -> Option<String> {
        user.activation_key
            .as_ref()
            .map(|key| format!("{}/users/verify/{}/{}", self.domain_name, user.email, key))
    }

    /// Stores a new inactive user and mails the activation link. If the mail
    /// cannot be sent the user is removed again.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        request.validate()?;

        if self.users.find_by_username(&request.username).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "User '{}' already exists",
                request.username
            )));
        }
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "E-mail '{}' is already registered",
                request.email
            )));
        }

        let user = User::register(
            &request.first_name,
            &request.last_name,
            &request.username,
            &request.email,
            &request.password1,
        )?;
        let user = self.users.create(user).await?;

        let link = self
            .verification_link(&user)
            .ok_or_else(|| AppError::InternalError("New user has no activation key".to_string()))?;
        let email = Email {
            from: self.sender.clone(),
            to: user.email.clone(),
            subject: "Account activation".to_string(),
            body: format!(
                "Hello {}! To activate your account follow the link: {}",
                user.full_name(),
                link
            ),
        };

        if let Err(err) = self.mailer.send(email).await {
            log::error!("Failed to send activation mail to {}: {}", user.email, err);
            self.users.delete(&user.username).await?;
            return Err(AppError::InternalError(
                "Could not send the activation e-mail".to_string(),
            ));
        }

        log::info!("Registered user '{}'", user.username);
        Ok(user)
    }

    /// Activates the user owning `email` when `key` matches an unexpired
    /// activation key.
    pub async fn verify(&self, email: &str, key: &str) -> AppResult<Session> {
        let mut user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with e-mail '{}' not found", email)))?;

        if user.is_activation_key_expired(Utc::now()) {
            log::info!("Expired activation key used for '{}'", user.username);
            return Err(AppError::ValidationError(
                "The activation key has expired".to_string(),
            ));
        }
        if user.activation_key.as_deref() != Some(key) {
            return Err(AppError::ValidationError(
                "The activation key is not valid".to_string(),
            ));
        }

        user.activate();
        let user = self.users.update(user).await?;
        log::info!("Activated user '{}'", user.username);

        self.session_for(&user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<Session> {
        request.validate()?;

        let invalid = || AppError::Unauthorized("Invalid username or password".to_string());
        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or_else(invalid)?;

        if !user.check_password(&request.password) {
            return Err(invalid());
        }
        if !user.is_active {
            return Err(AppError::Unauthorized("Account is not activated".to_string()));
        }

        log::debug!("User '{}' logged in", user.username);
        self.session_for(&user)
    }

    pub fn password_reset_link(&self, token: &str) -> String {
        format!("{}/users/password_reset/{}", self.domain_name, token)
    }

    /// Mails a reset link to the owner of `email`. Unknown addresses are a
    /// validation error; inactive accounts get no mail.
    pub async fn request_password_reset(&self, request: PasswordResetRequest) -> AppResult<()> {
        request.validate()?;

        let user = self.users.find_by_email(&request.email).await?.ok_or_else(|| {
            AppError::ValidationError(
                "The e-mail is not associated with any account".to_string(),
            )
        })?;

        if !user.is_active {
            log::info!("Password reset requested for inactive user '{}'", user.username);
            return Ok(());
        }

        let token = self
            .jwt
            .create_password_reset_token(&user, PASSWORD_RESET_LIFETIME_HOURS)?;
        let email = Email {
            from: self.sender.clone(),
            to: user.email.clone(),
            subject: "Password recovery".to_string(),
            body: format!(
                "Hello {}! To set a new password follow the link: {}",
                user.full_name(),
                self.password_reset_link(&token)
            ),
        };

        self.mailer.send(email).await.map_err(|err| {
            log::error!("Failed to send password reset mail to {}: {}", user.email, err);
            AppError::InternalError("Could not send the password reset e-mail".to_string())
        })?;

        log::info!("Sent password reset link to '{}'", user.username);
        Ok(())
    }

    /// Sets a new password for the user a reset link was issued to. The link
    /// is single use: it is tied to the password it was issued against.
    pub async fn reset_password(
        &self,
        token: &str,
        request: PasswordResetConfirmRequest,
    ) -> AppResult<()> {
        request.validate()?;

        let claims = self.jwt.validate_password_reset_token(token)?;
        let invalid = || {
            AppError::ValidationError("The password reset link is not valid or has expired".to_string())
        };

        let mut user = self
            .users
            .find_by_email(&claims.email)
            .await?
            .filter(|user| user.id == claims.sub)
            .ok_or_else(invalid)?;

        if user.password_fingerprint() != claims.fingerprint {
            return Err(invalid());
        }

        user.set_password(&request.new_password1)?;
        let user = self.users.update(user).await?;
        log::info!("Password of '{}' was reset", user.username);
        Ok(())
    }

    fn session_for(&self, user: &User) -> AppResult<Session> {
        Ok(Session {
            token: self.jwt.create_token(user)?,
            username: user.username.clone(),
        })
    }
}
