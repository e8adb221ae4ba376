//! TTL-bound key-value stores backing verification codes and sessions.
//!
//! Both live mappings share one Redis deployment, separated by key prefix:
//! `code:{email}` and `session:{token}`. An expired entry and a never-written
//! entry are indistinguishable to callers.

use super::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[async_trait]
pub trait EphemeralStore: Send + Sync {
    /// Store `value` under `key`, replacing any existing entry and resetting
    /// the expiry to `ttl` from now.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Fetch the live value for `key`, `None` on miss or expiry.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// Redis-backed store namespaced by a key prefix.
pub struct RedisStore {
    client: redis::Client,
    prefix: String,
}

impl RedisStore {
    #[must_use]
    pub fn new(client: redis::Client, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }
}

#[async_trait]
impl EphemeralStore for RedisStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;

        redis::cmd("SET")
            .arg(self.key(key))
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs())
            .query_async::<()>(&mut conn)
            .await?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection().await?;

        let value: Option<String> = redis::cmd("GET")
            .arg(self.key(key))
            .query_async(&mut conn)
            .await?;

        Ok(value)
    }
}

/// In-memory store with per-entry expiry, for tests and single-node dev runs.
///
/// Expiry is measured on tokio's clock so paused-time tests can advance it.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EphemeralStore for MemoryStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self.entries.lock().await;

        let expired = match entries.get(key) {
            Some((value, expires_at)) => {
                if *expires_at > Instant::now() {
                    return Ok(Some(value.clone()));
                }
                true
            }
            None => false,
        };

        if expired {
            entries.remove(key);
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_key_prefix() {
        let client = redis::Client::open("redis://127.0.0.1/").unwrap();
        let store = RedisStore::new(client, "session");

        assert_eq!(store.key("abc123"), "session:abc123");
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_store_set_get() {
        let store = MemoryStore::new();

        store
            .set("code:a@example.com", "123456", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            store.get("code:a@example.com").await.unwrap(),
            Some("123456".to_string())
        );
        assert_eq!(store.get("code:b@example.com").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_store_expiry() {
        let store = MemoryStore::new();

        store
            .set("k", "v", Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(61)).await;

        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_store_overwrite_resets_ttl() {
        let store = MemoryStore::new();

        store
            .set("k", "old", Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(50)).await;

        store
            .set("k", "new", Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(50)).await;

        assert_eq!(store.get("k").await.unwrap(), Some("new".to_string()));
    }
}
