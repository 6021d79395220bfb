use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::Order,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: Order) -> AppResult<Order>;
    /// Orders paid with one card, newest use first.
    async fn list_for_card(&self, card_title: &str) -> AppResult<Vec<Order>>;
}

pub struct MongoOrderRepository {
    collection: Collection<Order>,
}

impl MongoOrderRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("orders");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for orders collection");

        let card_index = IndexModel::builder()
            .keys(doc! { "card_title": 1, "use_time": -1 })
            .options(
                IndexOptions::builder()
                    .name("card_use_time".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(card_index).await?;

        log::info!("Successfully created indexes for orders collection");
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for MongoOrderRepository {
    async fn create(&self, order: Order) -> AppResult<Order> {
        self.collection.insert_one(&order).await?;
        Ok(order)
    }

    async fn list_for_card(&self, card_title: &str) -> AppResult<Vec<Order>> {
        let orders = self
            .collection
            .find(doc! { "card_title": card_title })
            .sort(doc! { "use_time": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(orders)
    }
}
