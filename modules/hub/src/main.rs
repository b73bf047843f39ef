use axum::{routing::get, Router};
use event_bus::{EventBus, InMemoryBus, NatsBus};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use hub_rs::cache::{CacheStore, MemoryStore, RedisStore};
use hub_rs::config::Config;
use hub_rs::health::health;
use hub_rs::services::{BroadcastService, CacheService};
use hub_rs::start_employee_event_consumer;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if present)
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    tracing::info!("Starting hub service...");

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration from environment");

    tracing::info!(
        "Configuration loaded: host={}, port={}, bus_type={}, cache_backend={}",
        config.host,
        config.port,
        config.bus_type,
        config.cache_backend
    );

    // Create event bus
    let bus: Arc<dyn EventBus> = match config.bus_type.to_lowercase().as_str() {
        "inmemory" => {
            tracing::info!("Using InMemory event bus");
            Arc::new(InMemoryBus::new())
        }
        "nats" => {
            tracing::info!("Connecting to NATS at {}", config.nats_url);
            let client = async_nats::connect(&config.nats_url)
                .await
                .expect("Failed to connect to NATS");
            Arc::new(NatsBus::new(client))
        }
        _ => panic!(
            "Invalid BUS_TYPE: {}. Must be 'inmemory' or 'nats'",
            config.bus_type
        ),
    };

    // Create cache store
    let store: Arc<dyn CacheStore> = match config.cache_backend.to_lowercase().as_str() {
        "memory" => {
            tracing::info!("Using in-memory cache store");
            Arc::new(MemoryStore::new())
        }
        "redis" => {
            tracing::info!("Using Redis cache store at {}", config.redis_url);
            Arc::new(RedisStore::new(&config.redis_url).expect("Failed to create Redis client"))
        }
        _ => panic!(
            "Invalid CACHE_BACKEND: {}. Must be 'memory' or 'redis'",
            config.cache_backend
        ),
    };

    let cache = Arc::new(CacheService::new(store));
    let broadcast = Arc::new(BroadcastService::new(bus.clone()));

    // Start the employee event consumer
    start_employee_event_consumer(
        bus.clone(),
        cache.clone(),
        broadcast.clone(),
        config.queue_name.clone(),
    )
    .await;

    // Build the application router
    let app = Router::new().route("/api/health", get(health)).layer(
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    );

    // Bind to the configured address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Hub service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    // Start the server
    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
