use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{map_insert_error, Database},
    errors::AppResult,
    models::domain::Question,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create(&self, question: Question) -> AppResult<Question>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>>;
    /// Ids of the active questions of a set, in ascending position.
    async fn list_ids_for_set(&self, question_set_id: &str) -> AppResult<Vec<String>>;
    async fn count_for_set(&self, question_set_id: &str) -> AppResult<u64>;
}

pub struct MongoQuestionRepository {
    collection: Collection<Question>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("questions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for questions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let set_position_index = IndexModel::builder()
            .keys(doc! { "question_set_id": 1, "position": 1 })
            .options(
                IndexOptions::builder()
                    .name("set_position".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(set_position_index).await?;

        log::info!("Successfully created indexes for questions collection");
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn create(&self, question: Question) -> AppResult<Question> {
        self.collection
            .insert_one(&question)
            .await
            .map_err(|e| map_insert_error(e, &format!("Question '{}'", question.id)))?;
        Ok(question)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        let question = self.collection.find_one(doc! { "id": id }).await?;
        Ok(question)
    }

    async fn list_ids_for_set(&self, question_set_id: &str) -> AppResult<Vec<String>> {
        let questions: Vec<Question> = self
            .collection
            .find(doc! { "question_set_id": question_set_id, "is_active": true })
            .sort(doc! { "position": 1, "id": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(questions.into_iter().map(|q| q.id).collect())
    }

    async fn count_for_set(&self, question_set_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "question_set_id": question_set_id })
            .await?;
        Ok(count)
    }
}
