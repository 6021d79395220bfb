use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A purchase made with a card. Amounts are kept in kopecks.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Order {
    pub id: String,
    pub card_title: String,
    pub amount_minor: i64,
    pub use_time: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(card_title: &str, amount_minor: i64, use_time: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4().to_string(),
            card_title: card_title.to_string(),
            amount_minor,
            use_time,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Amount formatted with two decimal places, e.g. `1250.05`.
    pub fn amount_display(&self) -> String {
        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let abs = self.amount_minor.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}
