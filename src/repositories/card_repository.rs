use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{map_insert_error, Database},
    errors::{AppError, AppResult},
    models::domain::Card,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardRepository: Send + Sync {
    async fn create(&self, card: Card) -> AppResult<Card>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Card>>;
    async fn find_by_title(&self, title: &str) -> AppResult<Option<Card>>;
    /// Latest expiration first, then by id.
    async fn list_cards(&self, offset: i64, limit: i64) -> AppResult<(Vec<Card>, i64)>;
    async fn update(&self, card: Card) -> AppResult<Card>;
}

pub struct MongoCardRepository {
    collection: Collection<Card>,
}

impl MongoCardRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("cards");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for cards collection");

        let title_index = IndexModel::builder()
            .keys(doc! { "title": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("title_unique".to_string())
                    .build(),
            )
            .build();

        let slug_index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("slug_unique".to_string())
                    .build(),
            )
            .build();

        let status_index = IndexModel::builder()
            .keys(doc! { "card_status": 1 })
            .options(
                IndexOptions::builder()
                    .name("card_status".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(title_index).await?;
        self.collection.create_index(slug_index).await?;
        self.collection.create_index(status_index).await?;

        log::info!("Successfully created indexes for cards collection");
        Ok(())
    }
}

#[async_trait]
impl CardRepository for MongoCardRepository {
    async fn create(&self, card: Card) -> AppResult<Card> {
        self.collection
            .insert_one(&card)
            .await
            .map_err(|e| map_insert_error(e, &format!("Card '{}'", card.title)))?;
        Ok(card)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Card>> {
        let card = self.collection.find_one(doc! { "id": id }).await?;
        Ok(card)
    }

    async fn find_by_title(&self, title: &str) -> AppResult<Option<Card>> {
        let card = self.collection.find_one(doc! { "title": title }).await?;
        Ok(card)
    }

    async fn list_cards(&self, offset: i64, limit: i64) -> AppResult<(Vec<Card>, i64)> {
        let total = self.collection.count_documents(doc! {}).await? as i64;

        let cards = self
            .collection
            .find(doc! {})
            .sort(doc! { "expiration_date": -1, "id": 1 })
            .skip(offset as u64)
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok((cards, total))
    }

    async fn update(&self, card: Card) -> AppResult<Card> {
        let result = self
            .collection
            .replace_one(doc! { "id": &card.id }, &card)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Card with id '{}' not found", card.id)));
        }
        Ok(card)
    }
}
