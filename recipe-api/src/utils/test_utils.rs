use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use uuid::Uuid;

use crate::recipes::model::{Recipe, RecipePayload};

pub fn random_string(prefix: &str, length: usize) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect();
    format!("{}{}", prefix, suffix)
}

pub fn sample_recipe(name: &str, tags: &[&str]) -> Recipe {
    Recipe {
        id: Uuid::new_v4(),
        name: name.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ingredients: vec!["ingredient".to_string()],
        instructions: vec!["step one".to_string()],
        servings: 0,
        calories: 0,
        fat: 0,
        saturated_fat: 0,
        carbs: 0,
        fiber: 0,
        sugar: 0,
        protein: 0,
        published_at: Utc::now(),
    }
}

pub fn sample_payload(name: &str, tags: &[&str]) -> RecipePayload {
    RecipePayload {
        name: name.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    }
}
