use std::{net::SocketAddr, sync::Arc, time::Duration};

use tokio::net::TcpListener;

use common_redis::InMemoryRedisClient;
use health::HealthRegistry;
use recipe_api::recipes::listing_cache::RedisListingCache;
use recipe_api::recipes::store::MemoryRecipeStore;
use recipe_api::router::router;

/// A server bound to an ephemeral port, backed by in-memory store and cache
/// clients so tests exercise the full HTTP stack without live services. The
/// backend handles stay available for seeding and inspection.
pub struct ServerHandle {
    pub addr: SocketAddr,
    pub store: Arc<MemoryRecipeStore>,
    pub redis: Arc<InMemoryRedisClient>,
}

impl ServerHandle {
    pub async fn with_memory_backends() -> Self {
        let store = Arc::new(MemoryRecipeStore::new());
        let redis = Arc::new(InMemoryRedisClient::new());
        let listing_cache = Arc::new(RedisListingCache::new(redis.clone()));

        let liveness = HealthRegistry::new("liveness");
        let handle = liveness
            .register("server".to_string(), Duration::from_secs(30))
            .await;
        handle.report_healthy().await;

        let app = router(store.clone(), listing_cache, liveness, false);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, store, redis }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}
