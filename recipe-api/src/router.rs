use std::{future::ready, sync::Arc};

use axum::{
    http::{Method, StatusCode},
    routing::get,
    Router,
};
use health::HealthRegistry;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use common_metrics::{setup_metrics_recorder, track_metrics};

use crate::api::endpoints::{
    create_recipe, delete_recipe, get_recipe, list_recipes, search_recipes, update_recipe,
};
use crate::recipes::listing_cache::ListingCache;
use crate::recipes::store::RecipeStore;

#[derive(Clone)]
pub struct AppState {
    pub recipe_store: Arc<dyn RecipeStore + Send + Sync>,
    pub listing_cache: Arc<dyn ListingCache + Send + Sync>,
}

pub fn router<S, C>(
    recipe_store: Arc<S>,
    listing_cache: Arc<C>,
    liveness: HealthRegistry,
    enable_metrics: bool,
) -> Router
where
    S: RecipeStore + Send + Sync + 'static,
    C: ListingCache + Send + Sync + 'static,
{
    let state = AppState {
        recipe_store,
        listing_cache,
    };

    // Permissive CORS policy, matching what API consumers behind reverse
    // proxies tend to send.
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .allow_origin(AllowOrigin::mirror_request());

    let status_router = Router::new()
        .route("/_readiness", get(|| ready(StatusCode::OK)))
        .route("/_liveness", get(move || ready(liveness.get_status())));

    let recipes_router = Router::new()
        .route(
            "/api/v1/recipes",
            get(list_recipes).post(create_recipe),
        )
        .route("/api/v1/recipes/search", get(search_recipes))
        .route(
            "/api/v1/recipes/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        );

    let router = Router::new()
        .merge(status_router)
        .merge(recipes_router)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(track_metrics))
        .layer(cors)
        .with_state(state);

    // Don't install the recorder unless asked to: installing a global recorder
    // when the router is built repeatedly (tests) does not work well.
    if enable_metrics {
        let recorder_handle = setup_metrics_recorder();
        router.route("/metrics", get(move || ready(recorder_handle.render())))
    } else {
        router
    }
}
