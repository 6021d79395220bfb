use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::slug::Slugged;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy, Default)]
pub enum CardStatus {
    Activated,
    #[default]
    Deactivated,
    Expired,
}

/// A discount card. `title` holds the card code and is what orders refer to.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub card_series: String,
    pub card_number: String,
    pub release_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub card_status: CardStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn default_expiration_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2050, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

impl Card {
    pub fn new(title: &str, card_series: &str, card_number: &str) -> Self {
        let now = Utc::now();
        Card {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            slug: String::new(),
            card_series: card_series.to_string(),
            card_number: card_number.to_string(),
            release_date: now,
            expiration_date: default_expiration_date(),
            card_status: CardStatus::default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
        self.card_status == CardStatus::Expired || self.expiration_date <= at
    }
}

impl Slugged for Card {
    fn title(&self) -> &str {
        &self.title
    }

    fn set_slug(&mut self, slug: String) {
        self.slug = slug;
    }
}
