use async_trait::async_trait;
use mongodb::{
    bson::doc,
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{
    db::{map_insert_error, Database},
    errors::{AppError, AppResult},
    models::domain::User,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> AppResult<User>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn update(&self, user: User) -> AppResult<User>;
    async fn delete(&self, username: &str) -> AppResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("users");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for users collection");

        let options = IndexOptions::builder().unique(true).build();
        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(options.clone())
            .build();
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(options)
            .build();

        self.collection.create_index(username_index).await?;
        self.collection.create_index(email_index).await?;

        log::info!("Successfully created indexes for users collection");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        self.collection
            .insert_one(&user)
            .await
            .map_err(|e| map_insert_error(e, "User with this username or email"))?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "username": username })
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "email": email }).await?;
        Ok(user)
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let filter = doc! { "id": &user.id };
        let options = ReplaceOptions::builder().upsert(false).build();

        let result = self
            .collection
            .replace_one(filter, &user)
            .with_options(options)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "User with username '{}' not found",
                user.username
            )));
        }

        Ok(user)
    }

    async fn delete(&self, username: &str) -> AppResult<()> {
        let result = self
            .collection
            .delete_one(doc! { "username": username })
            .await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "User with username '{}' not found",
                username
            )));
        }

        Ok(())
    }
}
