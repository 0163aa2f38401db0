use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use common_database::Client as DatabaseClient;

use crate::api::errors::ApiError;
use crate::recipes::model::{Recipe, RecipeUpdate};

/// Operation contract against the recipe collection. The cache-aside layer and
/// the lookup operations only ever reach the collection through this seam.
#[async_trait]
pub trait RecipeStore {
    /// Every recipe in the collection, in stable store order.
    async fn find_all(&self) -> Result<Vec<Recipe>, ApiError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, ApiError>;
    async fn insert_one(&self, recipe: &Recipe) -> Result<(), ApiError>;
    /// Applies the partial update to the matching document. Returns the number
    /// of documents affected; a non-matching id yields 0, not an error.
    async fn update_one(&self, id: Uuid, update: &RecipeUpdate) -> Result<u64, ApiError>;
    /// Returns the number of documents removed (0 or 1).
    async fn delete_one(&self, id: Uuid) -> Result<u64, ApiError>;
    /// Recipes whose tags contain `tag` under case-insensitive comparison.
    async fn find_by_tag(&self, tag: &str) -> Result<Vec<Recipe>, ApiError>;
}

const RECIPE_COLUMNS: &str = "id, name, tags, ingredients, instructions, servings, calories, \
     fat, saturated_fat, carbs, fiber, sugar, protein, published_at";

pub struct PostgresRecipeStore {
    reader: Arc<dyn DatabaseClient + Send + Sync>,
}

impl PostgresRecipeStore {
    pub fn new(reader: Arc<dyn DatabaseClient + Send + Sync>) -> Self {
        Self { reader }
    }

    async fn connection(
        &self,
    ) -> Result<sqlx::pool::PoolConnection<sqlx::Postgres>, ApiError> {
        self.reader.get_connection().await.map_err(|e| {
            tracing::error!("Failed to get database connection: {}", e);
            ApiError::DatabaseUnavailable
        })
    }
}

#[async_trait]
impl RecipeStore for PostgresRecipeStore {
    async fn find_all(&self) -> Result<Vec<Recipe>, ApiError> {
        let mut conn = self.connection().await?;
        let recipes = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY published_at, id"
        ))
        .fetch_all(&mut *conn)
        .await?;
        Ok(recipes)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, ApiError> {
        let mut conn = self.connection().await?;
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(recipe)
    }

    async fn insert_one(&self, recipe: &Recipe) -> Result<(), ApiError> {
        let mut conn = self.connection().await?;
        sqlx::query(&format!(
            "INSERT INTO recipes ({RECIPE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"
        ))
        .bind(recipe.id)
        .bind(&recipe.name)
        .bind(&recipe.tags)
        .bind(&recipe.ingredients)
        .bind(&recipe.instructions)
        .bind(recipe.servings)
        .bind(recipe.calories)
        .bind(recipe.fat)
        .bind(recipe.saturated_fat)
        .bind(recipe.carbs)
        .bind(recipe.fiber)
        .bind(recipe.sugar)
        .bind(recipe.protein)
        .bind(recipe.published_at)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    async fn update_one(&self, id: Uuid, update: &RecipeUpdate) -> Result<u64, ApiError> {
        let mut conn = self.connection().await?;
        let result = sqlx::query(
            "UPDATE recipes SET name = $2, instructions = $3, ingredients = $4, tags = $5 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.instructions)
        .bind(&update.ingredients)
        .bind(&update.tags)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_one(&self, id: Uuid) -> Result<u64, ApiError> {
        let mut conn = self.connection().await?;
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn find_by_tag(&self, tag: &str) -> Result<Vec<Recipe>, ApiError> {
        let mut conn = self.connection().await?;
        let recipes = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes \
             WHERE EXISTS (SELECT 1 FROM unnest(tags) AS t WHERE lower(t) = lower($1)) \
             ORDER BY published_at, id"
        ))
        .bind(tag)
        .fetch_all(&mut *conn)
        .await?;
        Ok(recipes)
    }
}

/// Store backed by process memory, with the same observable semantics as the
/// Postgres implementation. Lets service and HTTP tests run without a live
/// database.
#[derive(Default)]
pub struct MemoryRecipeStore {
    recipes: Mutex<Vec<Recipe>>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_recipes(&self) -> std::sync::MutexGuard<'_, Vec<Recipe>> {
        match self.recipes.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn seed(&self, recipe: Recipe) {
        self.lock_recipes().push(recipe);
    }

    pub fn len(&self) -> usize {
        self.lock_recipes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_recipes().is_empty()
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn find_all(&self) -> Result<Vec<Recipe>, ApiError> {
        Ok(self.lock_recipes().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, ApiError> {
        Ok(self.lock_recipes().iter().find(|r| r.id == id).cloned())
    }

    async fn insert_one(&self, recipe: &Recipe) -> Result<(), ApiError> {
        self.lock_recipes().push(recipe.clone());
        Ok(())
    }

    async fn update_one(&self, id: Uuid, update: &RecipeUpdate) -> Result<u64, ApiError> {
        let mut recipes = self.lock_recipes();
        match recipes.iter_mut().find(|r| r.id == id) {
            Some(recipe) => {
                recipe.name = update.name.clone();
                recipe.instructions = update.instructions.clone();
                recipe.ingredients = update.ingredients.clone();
                recipe.tags = update.tags.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_one(&self, id: Uuid) -> Result<u64, ApiError> {
        let mut recipes = self.lock_recipes();
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        Ok((before - recipes.len()) as u64)
    }

    async fn find_by_tag(&self, tag: &str) -> Result<Vec<Recipe>, ApiError> {
        let needle = tag.to_lowercase();
        Ok(self
            .lock_recipes()
            .iter()
            .filter(|r| r.tags.iter().any(|t| t.to_lowercase() == needle))
            .cloned()
            .collect())
    }
}
