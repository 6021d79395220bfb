use async_trait::async_trait;
use chrono::Duration;
use mongodb::{
    bson::{doc, DateTime as BsonDateTime},
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{db::Database, errors::AppResult, session::SessionStore};

/// One stored session value. The payload is kept as JSON text so it
/// round-trips exactly, whatever BSON would make of it. `updated_at` is a
/// native BSON date so the TTL index can expire the document.
#[derive(Clone, Debug, Deserialize, Serialize)]
struct SessionEntry {
    session_id: String,
    key: String,
    value: String,
    updated_at: BsonDateTime,
}

pub struct MongoSessionStore {
    collection: Collection<SessionEntry>,
    ttl: Duration,
}

impl MongoSessionStore {
    pub fn new(db: &Database, ttl_hours: i64) -> Self {
        let collection = db.get_collection("sessions");
        Self {
            collection,
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Entries last written at or before this instant are expired.
    fn cutoff(&self) -> BsonDateTime {
        BsonDateTime::from_millis(BsonDateTime::now().timestamp_millis() - self.ttl.num_milliseconds())
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for sessions collection");

        let session_key_index = IndexModel::builder()
            .keys(doc! { "session_id": 1, "key": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("session_key_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(session_key_index).await?;

        let expiry_index = IndexModel::builder()
            .keys(doc! { "updated_at": 1 })
            .options(
                IndexOptions::builder()
                    .expire_after(self.ttl.to_std().unwrap_or_default())
                    .name("updated_at_ttl".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(expiry_index).await?;

        log::info!("Successfully created indexes for sessions collection");
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MongoSessionStore {
    async fn get(&self, session_id: &str, key: &str) -> AppResult<Option<Value>> {
        let entry = self
            .collection
            .find_one(doc! { "session_id": session_id, "key": key })
            .await?;

        let Some(entry) = entry else {
            return Ok(None);
        };

        if entry.updated_at <= self.cutoff() {
            log::debug!("Session entry '{}' for {} expired", key, session_id);
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&entry.value)?))
    }

    async fn set(&self, session_id: &str, key: &str, value: Value) -> AppResult<()> {
        let entry = SessionEntry {
            session_id: session_id.to_string(),
            key: key.to_string(),
            value: serde_json::to_string(&value)?,
            updated_at: BsonDateTime::now(),
        };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(doc! { "session_id": session_id, "key": key }, &entry)
            .with_options(options)
            .await?;
        Ok(())
    }

    async fn delete(&self, session_id: &str, key: &str) -> AppResult<()> {
        self.collection
            .delete_one(doc! { "session_id": session_id, "key": key })
            .await?;
        Ok(())
    }

    async fn delete_expired(&self) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "updated_at": { "$lte": self.cutoff() } })
            .await?;

        Ok(result.deleted_count)
    }
}
