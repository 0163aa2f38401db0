use std::sync::Arc;

use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::recipes::listing_cache::ListingCache;
use crate::recipes::model::{Recipe, RecipePayload, RecipeUpdate};
use crate::recipes::store::RecipeStore;

/// Parses a path parameter into the store's identifier format. A malformed
/// identifier is a client error, distinct from not-found.
pub fn parse_recipe_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|e| ApiError::InvalidRecipeId(e.to_string()))
}

/// The five recipe operations. Reads of the full collection go through the
/// listing cache; single-item lookup and tag search bypass it; every mutation
/// invalidates it after the store acknowledges success.
pub struct RecipeService {
    store: Arc<dyn RecipeStore + Send + Sync>,
    cache: Arc<dyn ListingCache + Send + Sync>,
}

impl RecipeService {
    pub fn new(
        store: Arc<dyn RecipeStore + Send + Sync>,
        cache: Arc<dyn ListingCache + Send + Sync>,
    ) -> Self {
        Self { store, cache }
    }

    /// Cache-aside read of the full collection. A hit is trusted as-is and
    /// never touches the store; a miss queries the store and repopulates the
    /// cache before returning. Concurrent misses may each repopulate; the last
    /// writer wins, which is accepted (see DESIGN.md).
    pub async fn list_all(&self) -> Result<Vec<Recipe>, ApiError> {
        if let Some(recipes) = self.cache.get_listing().await? {
            tracing::debug!("serving recipe listing from cache");
            return Ok(recipes);
        }

        tracing::debug!("recipe listing cache miss, querying the store");
        let recipes = self.store.find_all().await?;

        if let Err(cache_err) = self.cache.store_listing(&recipes).await {
            // The listing was read from the source of truth either way; the
            // next miss retries the write.
            tracing::error!("failed to repopulate recipe listing cache: {}", cache_err);
        }

        Ok(recipes)
    }

    /// Inserts a new recipe with a freshly assigned id and publication time,
    /// then invalidates the cached listing.
    pub async fn create(&self, payload: RecipePayload) -> Result<Recipe, ApiError> {
        let recipe = Recipe::from_payload(payload);
        self.store.insert_one(&recipe).await?;
        self.invalidate_listing().await;
        Ok(recipe)
    }

    /// Applies a partial update to the matching recipe and invalidates the
    /// cached listing. A non-matching id still reports success with zero
    /// documents affected; absence only surfaces through lookups.
    pub async fn update(&self, id: Uuid, update: RecipeUpdate) -> Result<u64, ApiError> {
        let affected = self.store.update_one(id, &update).await?;
        self.invalidate_listing().await;
        Ok(affected)
    }

    /// Deletes the matching recipe and invalidates the cached listing, whether
    /// or not a document was actually removed. Returns the removed count.
    pub async fn delete(&self, id: Uuid) -> Result<u64, ApiError> {
        let removed = self.store.delete_one(id).await?;
        self.invalidate_listing().await;
        Ok(removed)
    }

    /// Single-item lookup, bypassing the cache.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Recipe, ApiError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ApiError::RecipeNotFound)
    }

    /// Tag search, bypassing the cache. An empty result set is a success.
    pub async fn search_by_tag(&self, tag: &str) -> Result<Vec<Recipe>, ApiError> {
        self.store.find_by_tag(tag).await
    }

    // Invalidation runs only after the store mutation succeeded. A failure
    // here is logged and swallowed: the write happened, and the caller is told
    // so; the stale snapshot lives until a later invalidation or miss.
    async fn invalidate_listing(&self) {
        if let Err(err) = self.cache.invalidate().await {
            tracing::error!("failed to invalidate recipe listing cache: {}", err);
        }
    }
}
