use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{map_insert_error, Database},
    errors::{AppError, AppResult},
    models::domain::QuestionSet,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionSetRepository: Send + Sync {
    async fn create(&self, question_set: QuestionSet) -> AppResult<QuestionSet>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuestionSet>>;
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<QuestionSet>>;
    async fn list_by_category(&self, category_id: &str, active_only: bool) -> AppResult<Vec<QuestionSet>>;
    async fn list_active(&self) -> AppResult<Vec<QuestionSet>>;
    async fn update(&self, question_set: QuestionSet) -> AppResult<QuestionSet>;
}

pub struct MongoQuestionSetRepository {
    collection: Collection<QuestionSet>,
}

impl MongoQuestionSetRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("question_sets");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for question_sets collection");

        let slug_index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("slug_unique".to_string())
                    .build(),
            )
            .build();

        let title_index = IndexModel::builder()
            .keys(doc! { "title": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("title_unique".to_string())
                    .build(),
            )
            .build();

        let category_index = IndexModel::builder()
            .keys(doc! { "category_id": 1, "is_active": 1 })
            .options(
                IndexOptions::builder()
                    .name("category_active".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(slug_index).await?;
        self.collection.create_index(title_index).await?;
        self.collection.create_index(category_index).await?;

        log::info!("Successfully created indexes for question_sets collection");
        Ok(())
    }
}

#[async_trait]
impl QuestionSetRepository for MongoQuestionSetRepository {
    async fn create(&self, question_set: QuestionSet) -> AppResult<QuestionSet> {
        self.collection
            .insert_one(&question_set)
            .await
            .map_err(|e| map_insert_error(e, &format!("Question set '{}'", question_set.slug)))?;
        Ok(question_set)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuestionSet>> {
        let question_set = self.collection.find_one(doc! { "id": id }).await?;
        Ok(question_set)
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<QuestionSet>> {
        let question_set = self.collection.find_one(doc! { "slug": slug }).await?;
        Ok(question_set)
    }

    async fn list_by_category(&self, category_id: &str, active_only: bool) -> AppResult<Vec<QuestionSet>> {
        let mut filter = doc! { "category_id": category_id };
        if active_only {
            filter.insert("is_active", true);
        }

        let question_sets = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": 1, "id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(question_sets)
    }

    async fn list_active(&self) -> AppResult<Vec<QuestionSet>> {
        let question_sets = self
            .collection
            .find(doc! { "is_active": true })
            .sort(doc! { "created_at": 1, "id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(question_sets)
    }

    async fn update(&self, question_set: QuestionSet) -> AppResult<QuestionSet> {
        let result = self
            .collection
            .replace_one(doc! { "id": &question_set.id }, &question_set)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Question set with id '{}' not found",
                question_set.id
            )));
        }
        Ok(question_set)
    }
}
