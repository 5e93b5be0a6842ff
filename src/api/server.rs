//! Router assembly and the server's run loop (spec §6, §9 graceful
//! shutdown). Default-scope routes and their `/tenants/{t}/namespaces/{n}`
//! counterparts share the same handler logic; only the `Scope` they
//! construct differs.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{consumers, events, health, topics};
use super::middleware::request_logger;
use super::state::AppState;
use crate::dispatcher::DispatcherManager;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub struct RestApiServer {
    state: Arc<AppState>,
}

impl RestApiServer {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn build_router(&self) -> Router {
        let default_routes = Router::new()
            .route("/health", get(health::health))
            .route(
                "/topics",
                get(topics::list_topics_default).post(topics::create_topic_default),
            )
            .route(
                "/topics/{name}",
                get(topics::get_topic_default).put(topics::update_schemas_default),
            )
            .route("/events", post(events::publish_default))
            .route("/topics/{name}/events", get(events::get_events_default))
            .route("/consumers/register", post(consumers::register_default))
            .route("/consumers", get(consumers::list_consumers))
            .route("/consumers/{id}", delete(consumers::delete_consumer));

        let scoped_routes = Router::new()
            .route(
                "/topics",
                get(topics::list_topics_scoped).post(topics::create_topic_scoped),
            )
            .route(
                "/topics/{name}",
                get(topics::get_topic_scoped).put(topics::update_schemas_scoped),
            )
            .route("/events", post(events::publish_scoped))
            .route("/topics/{name}/events", get(events::get_events_scoped))
            .route("/consumers/register", post(consumers::register_scoped));

        Router::new()
            .merge(default_routes)
            .nest("/tenants/{tenant}/namespaces/{namespace}", scoped_routes)
            .layer(axum::middleware::from_fn(request_logger))
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(30)))
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .with_state(self.state.clone())
    }

    pub async fn run(self, addr: SocketAddr) -> std::io::Result<()> {
        let router = self.build_router();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "event store listening");
        let dispatchers = self.state.dispatchers.clone();
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal(dispatchers))
            .await
    }
}

async fn shutdown_signal(dispatchers: Arc<DispatcherManager>) {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received, draining dispatchers");
    dispatchers.stop_all().await;
}
