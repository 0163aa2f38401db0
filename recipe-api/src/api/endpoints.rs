use axum::{
    extract::{Path, Query, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::types::MessageResponse;
use crate::recipes::model::{Recipe, RecipePayload};
use crate::recipes::service::{parse_recipe_id, RecipeService};
use crate::router::AppState;

fn recipe_service(state: &AppState) -> RecipeService {
    RecipeService::new(state.recipe_store.clone(), state.listing_cache.clone())
}

pub async fn list_recipes(state: State<AppState>) -> Result<Json<Vec<Recipe>>, ApiError> {
    let recipes = recipe_service(&state).list_all().await?;
    Ok(Json(recipes))
}

pub async fn get_recipe(
    state: State<AppState>,
    id: Option<Path<String>>,
) -> Result<Json<Recipe>, ApiError> {
    let Some(Path(id)) = id else {
        return Err(ApiError::MissingIdParameter);
    };
    let recipe_id = parse_recipe_id(&id)?;
    let recipe = recipe_service(&state).get_by_id(recipe_id).await?;
    Ok(Json(recipe))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub tag: Option<String>,
}

pub async fn search_recipes(
    state: State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let tag = match query.tag {
        Some(tag) if !tag.is_empty() => tag,
        _ => return Err(ApiError::MissingTagParameter),
    };
    let recipes = recipe_service(&state).search_by_tag(&tag).await?;
    Ok(Json(recipes))
}

pub async fn create_recipe(
    state: State<AppState>,
    body: Bytes,
) -> Result<Json<Recipe>, ApiError> {
    let payload = RecipePayload::from_bytes(body)?;
    let recipe = recipe_service(&state).create(payload).await?;
    Ok(Json(recipe))
}

pub async fn update_recipe(
    state: State<AppState>,
    id: Option<Path<String>>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(Path(id)) = id else {
        return Err(ApiError::MissingIdParameter);
    };
    // Body binding is checked before the identifier is parsed.
    let payload = RecipePayload::from_bytes(body)?;
    let recipe_id = parse_recipe_id(&id)?;

    recipe_service(&state)
        .update(recipe_id, payload.as_update())
        .await?;
    Ok(Json(MessageResponse::updated()))
}

pub async fn delete_recipe(
    state: State<AppState>,
    id: Option<Path<String>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(Path(id)) = id else {
        return Err(ApiError::MissingIdParameter);
    };
    let recipe_id = parse_recipe_id(&id)?;

    let removed = recipe_service(&state).delete(recipe_id).await?;
    Ok(Json(MessageResponse::deleted(removed)))
}
