use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::slug::Slugged;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(title: &str, description: &str) -> Self {
        let now = Utc::now();
        Category {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            slug: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Slugged for Category {
    fn title(&self) -> &str {
        &self.title
    }

    fn set_slug(&mut self, slug: String) {
        self.slug = slug;
    }
}
