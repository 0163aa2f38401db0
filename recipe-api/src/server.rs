use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use common_database::get_pool;
use common_redis::RedisClient;
use health::{HealthHandle, HealthRegistry};
use tokio::net::TcpListener;

use crate::config::Config;
use crate::recipes::listing_cache::RedisListingCache;
use crate::recipes::store::PostgresRecipeStore;
use crate::router::router;

pub async fn serve<F>(config: Config, listener: TcpListener, shutdown: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let redis_client = match RedisClient::new(config.redis_url.clone()).await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("Failed to create Redis client: {}", e);
            return;
        }
    };

    let reader = match get_pool(&config.database_url, config.max_pg_connections).await {
        Ok(pool) => {
            tracing::info!("Successfully created Postgres client");
            Arc::new(pool)
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                url = %config.database_url,
                max_connections = config.max_pg_connections,
                "Failed to create Postgres client"
            );
            return;
        }
    };

    let recipe_store = Arc::new(PostgresRecipeStore::new(reader));
    let listing_cache = Arc::new(RedisListingCache::new(redis_client));

    let health = HealthRegistry::new("liveness");
    let simple_loop = health
        .register("simple_loop".to_string(), Duration::from_secs(30))
        .await;
    tokio::spawn(liveness_loop(simple_loop));

    tracing::info!("listening on {:?}", listener.local_addr().unwrap());
    let app = router(
        recipe_store,
        listing_cache,
        health,
        config.enable_metrics,
    );
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .unwrap()
}

async fn liveness_loop(handle: HealthHandle) {
    loop {
        handle.report_healthy().await;
        tokio::time::sleep(Duration::from_secs(10)).await;
    }
}
