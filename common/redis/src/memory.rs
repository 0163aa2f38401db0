use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{Client, CustomRedisError};

/// In-process key-value store with real get/set/del semantics. Used by
/// end-to-end tests that need the cache to actually remember what was written,
/// which the scripted `MockRedisClient` cannot do.
#[derive(Clone, Default)]
pub struct InMemoryRedisClient {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRedisClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Whether a key currently holds a value. Test-side inspection only.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock_entries().contains_key(key)
    }
}

#[async_trait]
impl Client for InMemoryRedisClient {
    async fn get(&self, key: String) -> Result<String, CustomRedisError> {
        match self.lock_entries().get(&key) {
            Some(value) => Ok(value.clone()),
            None => Err(CustomRedisError::NotFound),
        }
    }

    async fn set(&self, key: String, value: String) -> Result<(), CustomRedisError> {
        self.lock_entries().insert(key, value);
        Ok(())
    }

    async fn del(&self, key: String) -> Result<(), CustomRedisError> {
        self.lock_entries().remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_of_missing_key_is_not_found() {
        let client = InMemoryRedisClient::new();
        assert!(matches!(
            client.get("missing".to_string()).await,
            Err(CustomRedisError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_set_then_get_roundtrips() {
        let client = InMemoryRedisClient::new();
        client
            .set("k".to_string(), "v".to_string())
            .await
            .unwrap();
        assert_eq!(client.get("k".to_string()).await.unwrap(), "v");
    }

    #[tokio::test]
    async fn test_del_is_a_noop_for_absent_keys() {
        let client = InMemoryRedisClient::new();
        client.del("absent".to_string()).await.unwrap();

        client
            .set("k".to_string(), "v".to_string())
            .await
            .unwrap();
        client.del("k".to_string()).await.unwrap();
        assert!(!client.contains_key("k"));
    }
}
