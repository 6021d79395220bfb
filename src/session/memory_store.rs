use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{errors::AppResult, session::SessionStore};

type Entries = HashMap<(String, String), (Value, DateTime<Utc>)>;

/// Process-local session store. Progress is lost on restart.
#[derive(Clone)]
pub struct InMemorySessionStore {
    entries: Arc<RwLock<Entries>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn is_live(&self, updated_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        updated_at + self.ttl > now
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(24)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str, key: &str) -> AppResult<Option<Value>> {
        let entry_key = (session_id.to_string(), key.to_string());
        let now = Utc::now();

        {
            let entries = self.entries.read().await;
            match entries.get(&entry_key) {
                None => return Ok(None),
                Some((value, updated_at)) if self.is_live(*updated_at, now) => {
                    return Ok(Some(value.clone()))
                }
                Some(_) => {}
            }
        }

        // Re-checked under the write lock; a concurrent `set` may have refreshed it.
        let mut entries = self.entries.write().await;
        if let Some((_, updated_at)) = entries.get(&entry_key) {
            if !self.is_live(*updated_at, now) {
                entries.remove(&entry_key);
            }
        }
        Ok(None)
    }

    async fn set(&self, session_id: &str, key: &str, value: Value) -> AppResult<()> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, updated_at)| *updated_at + self.ttl > now);
        entries.insert((session_id.to_string(), key.to_string()), (value, now));
        Ok(())
    }

    async fn delete(&self, session_id: &str, key: &str) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        entries.remove(&(session_id.to_string(), key.to_string()));
        Ok(())
    }

    async fn delete_expired(&self) -> AppResult<u64> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, (_, updated_at)| *updated_at + self.ttl > now);
        Ok((before - entries.len()) as u64)
    }
}
