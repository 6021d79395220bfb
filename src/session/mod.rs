pub mod memory_store;
pub mod mongo_store;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AppResult;

pub use memory_store::InMemorySessionStore;
pub use mongo_store::MongoSessionStore;

/// Per-visitor key/value storage backing in-progress quiz attempts.
///
/// Values are plain JSON so anything stored must round-trip through
/// serde. Writes for one key replace the previous value; concurrent requests
/// from one visitor are last-write-wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str, key: &str) -> AppResult<Option<Value>>;
    async fn set(&self, session_id: &str, key: &str, value: Value) -> AppResult<()>;
    async fn delete(&self, session_id: &str, key: &str) -> AppResult<()>;
    /// Removes every entry older than the store's TTL, returning how many went.
    async fn delete_expired(&self) -> AppResult<u64>;
}
