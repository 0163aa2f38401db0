use std::sync::Arc;

use async_trait::async_trait;

use common_redis::{Client as RedisClient, CustomRedisError};

use crate::api::errors::ApiError;
use crate::recipes::model::Recipe;

/// The single fixed key under which the full collection snapshot is cached.
pub const RECIPES_LISTING_KEY: &str = "recipes";

/// Access to the cached collection listing. The read path is the only writer;
/// the mutation paths are the only invalidators.
#[async_trait]
pub trait ListingCache {
    /// `Ok(None)` is a miss. Any other cache-layer failure, including a blob
    /// that no longer parses, is surfaced as an error, never as a miss.
    async fn get_listing(&self) -> Result<Option<Vec<Recipe>>, ApiError>;
    async fn store_listing(&self, recipes: &[Recipe]) -> Result<(), ApiError>;
    /// Deletes the cached listing. Deleting an already-absent key is a no-op.
    async fn invalidate(&self) -> Result<(), ApiError>;
}

pub struct RedisListingCache {
    redis: Arc<dyn RedisClient + Send + Sync>,
}

impl RedisListingCache {
    pub fn new(redis: Arc<dyn RedisClient + Send + Sync>) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl ListingCache for RedisListingCache {
    async fn get_listing(&self) -> Result<Option<Vec<Recipe>>, ApiError> {
        match self.redis.get(RECIPES_LISTING_KEY.to_string()).await {
            Ok(blob) => {
                let recipes: Vec<Recipe> = serde_json::from_str(&blob).map_err(|e| {
                    tracing::error!("failed to parse cached recipe listing: {}", e);
                    ApiError::DataParsingError(e.to_string())
                })?;
                Ok(Some(recipes))
            }
            Err(CustomRedisError::NotFound) => Ok(None),
            Err(e) => {
                tracing::error!("failed to read recipe listing from cache: {}", e);
                Err(ApiError::CacheError(e))
            }
        }
    }

    async fn store_listing(&self, recipes: &[Recipe]) -> Result<(), ApiError> {
        let blob = serde_json::to_string(recipes)
            .map_err(|e| ApiError::DataParsingError(e.to_string()))?;
        // No expiry: the snapshot lives until the next invalidation.
        self.redis
            .set(RECIPES_LISTING_KEY.to_string(), blob)
            .await?;
        Ok(())
    }

    async fn invalidate(&self) -> Result<(), ApiError> {
        match self.redis.del(RECIPES_LISTING_KEY.to_string()).await {
            Ok(()) | Err(CustomRedisError::NotFound) => Ok(()),
            Err(e) => Err(ApiError::CacheError(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_redis::MockRedisClient;

    use crate::utils::test_utils::sample_recipe;

    #[tokio::test]
    async fn test_absent_key_is_a_miss() {
        let mut redis = MockRedisClient::new();
        redis.get_ret(RECIPES_LISTING_KEY, Err(CustomRedisError::NotFound));
        let cache = RedisListingCache::new(Arc::new(redis));

        assert_eq!(cache.get_listing().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_hit_deserializes_the_snapshot() {
        let recipes = vec![sample_recipe("Laksa", &["main"])];
        let blob = serde_json::to_string(&recipes).unwrap();

        let mut redis = MockRedisClient::new();
        redis.get_ret(RECIPES_LISTING_KEY, Ok(blob));
        let cache = RedisListingCache::new(Arc::new(redis));

        assert_eq!(cache.get_listing().await.unwrap(), Some(recipes));
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_a_hard_failure_not_a_miss() {
        let mut redis = MockRedisClient::new();
        redis.get_ret(RECIPES_LISTING_KEY, Ok("{not json".to_string()));
        let cache = RedisListingCache::new(Arc::new(redis));

        let result = cache.get_listing().await;
        assert!(matches!(result, Err(ApiError::DataParsingError(_))));
    }

    #[tokio::test]
    async fn test_connectivity_failure_is_a_hard_failure() {
        let mut redis = MockRedisClient::new();
        redis.get_ret(RECIPES_LISTING_KEY, Err(CustomRedisError::Timeout));
        let cache = RedisListingCache::new(Arc::new(redis));

        let result = cache.get_listing().await;
        assert!(matches!(result, Err(ApiError::CacheError(_))));
    }

    #[tokio::test]
    async fn test_store_listing_writes_the_serialized_snapshot() {
        let recipes = vec![sample_recipe("Laksa", &["main"])];

        let mut redis = MockRedisClient::new();
        redis.set_ret(RECIPES_LISTING_KEY, Ok(()));
        let redis = Arc::new(redis);
        let cache = RedisListingCache::new(redis.clone());

        cache.store_listing(&recipes).await.unwrap();

        let calls = redis.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].op, "set");
        assert_eq!(calls[0].key, RECIPES_LISTING_KEY);
    }

    #[tokio::test]
    async fn test_invalidate_treats_absent_key_as_noop() {
        let mut redis = MockRedisClient::new();
        redis.del_ret(RECIPES_LISTING_KEY, Err(CustomRedisError::NotFound));
        let cache = RedisListingCache::new(Arc::new(redis));

        assert!(cache.invalidate().await.is_ok());
    }

    #[tokio::test]
    async fn test_invalidate_surfaces_connectivity_failures() {
        let mut redis = MockRedisClient::new();
        redis.del_ret(RECIPES_LISTING_KEY, Err(CustomRedisError::Timeout));
        let cache = RedisListingCache::new(Arc::new(redis));

        assert!(matches!(
            cache.invalidate().await,
            Err(ApiError::CacheError(_))
        ));
    }
}
