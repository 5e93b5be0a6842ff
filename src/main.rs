//! Event store server entry point: loads configuration from the
//! environment, wires the topic registry, validator, store, consumer
//! registry, and dispatcher manager into one `AppState`, and serves the
//! HTTP surface until a shutdown signal is received.

use std::sync::Arc;

use event_store::api::{AppState, RestApiServer};
use event_store::config::Config;
use event_store::consumers::ConsumerRegistry;
use event_store::dispatcher::DispatcherManager;
use event_store::registry::TopicRegistry;
use event_store::store::EventStore;
use event_store::validator::SchemaValidator;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("event_store=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.data_dir)?;
    std::fs::create_dir_all(&config.config_dir)?;

    let validator = Arc::new(SchemaValidator::new());
    let topics = Arc::new(TopicRegistry::new(config.config_dir.clone(), validator.clone()));
    if let Err(e) = topics.load_from_disk() {
        tracing::warn!(error = %e, "failed to load existing topic configuration");
    }

    let store = Arc::new(EventStore::new(config.data_dir.clone()));
    let consumers = Arc::new(ConsumerRegistry::new());
    let dispatchers = Arc::new(DispatcherManager::new(
        store.clone(),
        consumers.clone(),
        config.delivery_timeout,
        config.dispatch_batch_size,
        config.dispatch_poll_interval,
    ));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(AppState::new(
        config,
        topics,
        validator,
        store,
        consumers,
        dispatchers,
    ));

    RestApiServer::new(state).run(addr).await
}
