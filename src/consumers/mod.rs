//! Consumer registry (spec §4.6): an in-memory, ephemeral set of
//! consumers. Nothing here is persisted — a restart loses every
//! registration, by design.

pub mod consumer;
pub mod registration;

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

pub use consumer::{Consumer, ConsumerEndpoint, DeliveryHandler};
pub use registration::RegistrationRequest;

use crate::error::{StoreError, StoreResult};
use crate::registry::TopicRegistry;
use crate::scope::Scope;

pub struct ConsumerRegistry {
    consumers: DashMap<Uuid, Arc<Consumer>>,
}

impl ConsumerRegistry {
    pub fn new() -> Self {
        Self {
            consumers: DashMap::new(),
        }
    }

    pub fn register(
        &self,
        topic_registry: &TopicRegistry,
        scope: &Scope,
        request: RegistrationRequest,
    ) -> StoreResult<Uuid> {
        if request.topics().is_empty() {
            return Err(StoreError::InvalidConsumerRegistration(
                "topics must not be empty".into(),
            ));
        }

        for topic in request.topics().keys() {
            if !topic_registry.topic_exists(scope, topic) {
                return Err(StoreError::TopicNotFound(topic.clone()));
            }
        }

        let qualified_topics = request
            .topics()
            .iter()
            .map(|(topic, last_id)| (scope.qualify(topic), last_id.clone()))
            .collect();

        let id = Uuid::new_v4();
        let endpoint = match request {
            RegistrationRequest::Http { callback, .. } => {
                let url = callback.parse::<url::Url>().map_err(|e| {
                    StoreError::InvalidConsumerRegistration(format!("invalid callback URL: {e}"))
                })?;
                ConsumerEndpoint::Http(url)
            }
            RegistrationRequest::InProcess { handler, .. } => ConsumerEndpoint::InProcess(handler),
            RegistrationRequest::ExternalPush {
                endpoint, access_key, ..
            } => ConsumerEndpoint::ExternalPush { endpoint, access_key },
        };

        let consumer = Arc::new(Consumer::new(id, endpoint, qualified_topics));
        self.consumers.insert(id, consumer);
        Ok(id)
    }

    pub fn find_all(&self) -> Vec<Arc<Consumer>> {
        self.consumers.iter().map(|kv| kv.value().clone()).collect()
    }

    pub fn find_by_topic(&self, qualified_topic: &str) -> Vec<Arc<Consumer>> {
        self.consumers
            .iter()
            .filter(|kv| kv.value().subscribes_to(qualified_topic))
            .map(|kv| kv.value().clone())
            .collect()
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<Consumer>> {
        self.consumers.get(&id).map(|kv| kv.value().clone())
    }

    pub fn delete(&self, id: Uuid) -> bool {
        self.consumers.remove(&id).is_some()
    }

    pub fn count(&self) -> usize {
        self.consumers.len()
    }

    pub fn update_cursor(&self, id: Uuid, qualified_topic: &str, last_delivered_id: &str) {
        if let Some(consumer) = self.consumers.get(&id) {
            consumer.set_cursor(qualified_topic, last_delivered_id.to_string());
        }
    }
}

impl Default for ConsumerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
