use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::api::errors::ApiError;

/// A recipe as stored and served. `id` and `published_at` are assigned by the
/// service at creation time and never taken from a client payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub servings: i32,
    pub calories: i32,
    pub fat: i32,
    #[serde(rename = "saturatedFat")]
    pub saturated_fat: i32,
    pub carbs: i32,
    pub fiber: i32,
    pub sugar: i32,
    pub protein: i32,
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
}

impl Recipe {
    /// Builds a persistable recipe out of a client payload, stamping a fresh
    /// identifier and the publication time. A client-supplied `id` field is
    /// ignored by payload deserialization, so it can never leak in here.
    pub fn from_payload(payload: RecipePayload) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            name: payload.name,
            tags: payload.tags,
            ingredients: payload.ingredients,
            instructions: payload.instructions,
            servings: payload.servings,
            calories: payload.calories,
            fat: payload.fat,
            saturated_fat: payload.saturated_fat,
            carbs: payload.carbs,
            fiber: payload.fiber,
            sugar: payload.sugar,
            protein: payload.protein,
            published_at: Utc::now(),
        }
    }
}

/// Client-supplied recipe body for create and update requests. Absent fields
/// default to empty/zero; fields of the wrong type fail binding with a 400
/// before any store access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipePayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub servings: i32,
    #[serde(default)]
    pub calories: i32,
    #[serde(default)]
    pub fat: i32,
    #[serde(default, rename = "saturatedFat")]
    pub saturated_fat: i32,
    #[serde(default)]
    pub carbs: i32,
    #[serde(default)]
    pub fiber: i32,
    #[serde(default)]
    pub sugar: i32,
    #[serde(default)]
    pub protein: i32,
}

impl RecipePayload {
    pub fn from_bytes(bytes: Bytes) -> Result<RecipePayload, ApiError> {
        let payload = String::from_utf8(bytes.to_vec())
            .map_err(|e| ApiError::InvalidRequestBody(e.to_string()))?;
        serde_json::from_str::<RecipePayload>(&payload)
            .map_err(|e| ApiError::InvalidRequestBody(e.to_string()))
    }

    /// The subset of fields an update applies. Nutrition values are not
    /// updatable through the partial update path.
    pub fn as_update(&self) -> RecipeUpdate {
        RecipeUpdate {
            name: self.name.clone(),
            instructions: self.instructions.clone(),
            ingredients: self.ingredients.clone(),
            tags: self.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeUpdate {
    pub name: String,
    pub instructions: Vec<String>,
    pub ingredients: Vec<String>,
    pub tags: Vec<String>,
}
