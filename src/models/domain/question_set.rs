use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::slug::Slugged;

/// An administrator-curated collection of questions taken as one test.
/// Questions point at their set, the set does not embed them.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct QuestionSet {
    pub id: String,
    pub category_id: String,
    pub title: String,
    pub slug: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuestionSet {
    pub fn new(category_id: &str, title: &str) -> Self {
        let now = Utc::now();
        QuestionSet {
            id: Uuid::new_v4().to_string(),
            category_id: category_id.to_string(),
            title: title.to_string(),
            slug: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Slugged for QuestionSet {
    fn title(&self) -> &str {
        &self.title
    }

    fn set_slug(&mut self, slug: String) {
        self.slug = slug;
    }
}
