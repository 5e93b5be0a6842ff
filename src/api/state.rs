//! `AppState` (spec §4.9): the single DI container handed to every axum
//! handler via `.with_state(...)`. Nothing reaches another component
//! through a global — everything comes through here.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::consumers::ConsumerRegistry;
use crate::dispatcher::DispatcherManager;
use crate::registry::TopicRegistry;
use crate::store::EventStore;
use crate::validator::SchemaValidator;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub topics: Arc<TopicRegistry>,
    pub validator: Arc<SchemaValidator>,
    pub store: Arc<EventStore>,
    pub consumers: Arc<ConsumerRegistry>,
    pub dispatchers: Arc<DispatcherManager>,
    started_at: Instant,
}

impl AppState {
    pub fn new(
        config: Config,
        topics: Arc<TopicRegistry>,
        validator: Arc<SchemaValidator>,
        store: Arc<EventStore>,
        consumers: Arc<ConsumerRegistry>,
        dispatchers: Arc<DispatcherManager>,
    ) -> Self {
        Self {
            config,
            topics,
            validator,
            store,
            consumers,
            dispatchers,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
