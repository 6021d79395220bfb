use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{map_insert_error, Database},
    errors::{AppError, AppResult},
    models::domain::Category,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: Category) -> AppResult<Category>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Category>>;
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>>;
    async fn list_active(&self) -> AppResult<Vec<Category>>;
    async fn update(&self, category: Category) -> AppResult<Category>;
}

pub struct MongoCategoryRepository {
    collection: Collection<Category>,
}

impl MongoCategoryRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("categories");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for categories collection");

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

        self.collection.create_index(slug_index).await?;
        self.collection.create_index(title_index).await?;

        log::info!("Successfully created indexes for categories collection");
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    async fn create(&self, category: Category) -> AppResult<Category> {
        self.collection
            .insert_one(&category)
            .await
            .map_err(|e| map_insert_error(e, &format!("Category '{}'", category.slug)))?;
        Ok(category)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Category>> {
        let category = self.collection.find_one(doc! { "id": id }).await?;
        Ok(category)
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        let category = self.collection.find_one(doc! { "slug": slug }).await?;
        Ok(category)
    }

    async fn list_active(&self) -> AppResult<Vec<Category>> {
        let categories = self
            .collection
            .find(doc! { "is_active": true })
            .sort(doc! { "created_at": 1, "id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(categories)
    }

    async fn update(&self, category: Category) -> AppResult<Category> {
        let result = self
            .collection
            .replace_one(doc! { "id": &category.id }, &category)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Category with id '{}' not found",
                category.id
            )));
        }
        Ok(category)
    }
}
