//! `DispatcherManager` (spec §4.7): owns the lifecycle of one
//! [`super::topic_dispatcher`] task per qualified topic. A dispatcher is
//! created lazily on first consumer subscription and never implicitly by
//! a publish with no subscribers.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use super::topic_dispatcher::{self, DispatcherHandle};
use crate::consumers::ConsumerRegistry;
use crate::scope::Scope;
use crate::store::EventStore;

pub struct DispatcherManager {
    event_store: Arc<EventStore>,
    consumers: Arc<ConsumerRegistry>,
    client: reqwest::Client,
    batch_size: usize,
    poll_interval: Duration,
    dispatchers: DashMap<String, DispatcherHandle>,
}

impl DispatcherManager {
    pub fn new(
        event_store: Arc<EventStore>,
        consumers: Arc<ConsumerRegistry>,
        delivery_timeout: Duration,
        batch_size: usize,
        poll_interval: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(delivery_timeout)
            .build()
            .expect("delivery client configuration is static and always valid");
        Self {
            event_store,
            consumers,
            client,
            batch_size,
            poll_interval,
            dispatchers: DashMap::new(),
        }
    }

    /// Idempotent: starts a dispatcher for `(scope, topic)` if one isn't
    /// already running.
    pub fn ensure_running(&self, scope: &Scope, topic: &str) {
        let qualified = scope.qualify(topic);
        if self.dispatchers.contains_key(&qualified) {
            return;
        }
        let handle = topic_dispatcher::spawn(
            scope.clone(),
            topic.to_string(),
            qualified.clone(),
            self.event_store.clone(),
            self.consumers.clone(),
            self.client.clone(),
            self.batch_size,
            self.poll_interval,
        );
        tracing::info!(topic = %qualified, "dispatcher started");
        self.dispatchers.insert(qualified, handle);
    }

    /// Wakes every dispatcher matching `qualified_topics`. Topics with no
    /// running dispatcher (no subscribers yet) are silently skipped.
    pub fn notify_published(&self, qualified_topics: &[String]) {
        for topic in qualified_topics {
            if let Some(handle) = self.dispatchers.get(topic) {
                handle.wake.notify_one();
            }
        }
    }

    pub fn running_dispatchers(&self) -> Vec<String> {
        self.dispatchers.iter().map(|kv| kv.key().clone()).collect()
    }

    /// Stops every dispatcher, letting each finish its current iteration.
    pub async fn stop_all(&self) {
        let keys: Vec<String> = self.dispatchers.iter().map(|kv| kv.key().clone()).collect();
        for key in keys {
            if let Some((_, handle)) = self.dispatchers.remove(&key) {
                handle.stop().await;
            }
        }
    }
}
