use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::CardStatus;

/// Names and usernames must be longer than three characters and cannot be a
/// bare number.
fn not_only_digits(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        let mut err = ValidationError::new("only_digits");
        err.message = Some("Name, username and surname cannot be a number".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 4, max = 150), custom(function = "not_only_digits"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 4, max = 150), custom(function = "not_only_digits"))]
    pub first_name: String,

    #[validate(length(min = 4, max = 150), custom(function = "not_only_digits"))]
    pub last_name: String,

    #[validate(length(min = 8, max = 128))]
    pub password1: String,

    #[validate(must_match(other = "password1", message = "The passwords do not match"))]
    pub password2: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct PasswordResetConfirmRequest {
    #[validate(length(min = 8, max = 128))]
    pub new_password1: String,

    #[validate(must_match(other = "new_password1", message = "The passwords do not match"))]
    pub new_password2: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AnswerRequest {
    #[validate(length(max = 4))]
    #[serde(default)]
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 250))]
    pub title: String,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateQuestionSetRequest {
    #[validate(length(min = 1))]
    pub category_id: String,

    #[validate(length(min = 1, max = 250))]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1))]
    pub question_set_id: String,

    #[validate(length(min = 1, max = 250))]
    pub text: String,

    #[validate(length(min = 2, max = 4))]
    pub answers: Vec<String>,

    /// Comma separated 1-based indices, e.g. `"1,3"`.
    #[validate(length(min = 1, max = 50))]
    pub right_answers: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateCardRequest {
    #[validate(length(min = 1, max = 250))]
    pub title: String,

    #[validate(length(max = 20))]
    #[serde(default)]
    pub card_series: String,

    #[validate(length(min = 1, max = 20))]
    pub card_number: String,

    pub expiration_date: Option<DateTime<Utc>>,

    pub card_status: Option<CardStatus>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1))]
    pub card_title: String,

    /// Decimal amount with at most two fractional digits, e.g. `"1250.05"`.
    #[validate(length(min = 1, max = 12))]
    pub amount: String,

    pub use_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}
