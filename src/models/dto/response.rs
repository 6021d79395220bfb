use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::domain::{Card, Category, Order, ProgressSnapshot, QuestionSet, QuestionView, User},
    services::QuizStep,
};

/// Body of every page: the display title next to the page's own fields.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub title: String,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> Page<T> {
    pub fn new(title: impl Into<String>, body: T) -> Self {
        Self {
            title: title.into(),
            body,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesBody {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBody {
    pub category: Category,
    pub question_sets: Vec<QuestionSet>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardsBody {
    pub cards: Vec<Card>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

/// Either the next question or `complete: true`, always with the progress.
#[derive(Debug, Clone, Serialize)]
pub struct QuizStepBody {
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    pub progress: ProgressSnapshot,
}

impl From<QuizStep> for QuizStepBody {
    fn from(step: QuizStep) -> Self {
        match step {
            QuizStep::Question { question, progress } => QuizStepBody {
                complete: false,
                question: Some(question),
                progress,
            },
            QuizStep::Complete { progress } => QuizStepBody {
                complete: true,
                question: None,
                progress,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            full_name: user.full_name(),
            id: user.id,
            username: user.username,
            email: user.email,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDto {
    pub id: String,
    pub card_title: String,
    pub amount: String,
    pub use_time: DateTime<Utc>,
}

impl From<Order> for OrderDto {
    fn from(order: Order) -> Self {
        OrderDto {
            amount: order.amount_display(),
            id: order.id,
            card_title: order.card_title,
            use_time: order.use_time,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleResponse {
    pub id: String,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_flattens_body() {
        let page = Page::new(
            "Categories",
            CategoriesBody {
                categories: vec![Category::new("Math", "")],
            },
        );

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["title"], "Categories");
        assert_eq!(json["categories"][0]["title"], "Math");
    }

    #[test]
    fn test_user_dto_hides_credentials() {
        let dto: UserDto = User::test_user("johndoe").into();
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(dto.full_name, "Test User");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("activation_key").is_none());
    }

    #[test]
    fn test_order_dto_formats_amount() {
        let dto: OrderDto = Order::new("GOLD-0001", 1999, Utc::now()).into();
        assert_eq!(dto.amount, "19.99");
    }
}
