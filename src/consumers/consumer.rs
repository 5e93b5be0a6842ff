//! A registered consumer: a delivery endpoint plus a per-topic cursor.

use std::collections::HashMap;

use dashmap::DashMap;
use url::Url;
use uuid::Uuid;

use crate::store::Event;

/// The three registration shapes spec §4.6 allows. HTTP is the real
/// production path; in-process exists for tests; external push
/// connectors are reserved and not required by the core.
pub enum ConsumerEndpoint {
    Http(Url),
    InProcess(std::sync::Arc<dyn DeliveryHandler>),
    ExternalPush { endpoint: String, access_key: String },
}

/// Synchronous delivery hook used only by in-process (test) consumers.
pub trait DeliveryHandler: Send + Sync {
    fn deliver(&self, consumer_id: Uuid, events: &[Event]) -> Result<(), String>;
}

pub struct Consumer {
    pub id: Uuid,
    pub endpoint: ConsumerEndpoint,
    /// Fully-qualified topic name -> last delivered event id (`None` =
    /// never delivered / from-start).
    cursors: DashMap<String, Option<String>>,
}

impl Consumer {
    pub fn new(id: Uuid, endpoint: ConsumerEndpoint, topics: HashMap<String, Option<String>>) -> Self {
        Self {
            id,
            endpoint,
            cursors: topics.into_iter().collect(),
        }
    }

    pub fn subscribes_to(&self, qualified_topic: &str) -> bool {
        self.cursors.contains_key(qualified_topic)
    }

    pub fn cursor(&self, qualified_topic: &str) -> Option<String> {
        self.cursors.get(qualified_topic).and_then(|v| v.clone())
    }

    pub fn set_cursor(&self, qualified_topic: &str, last_event_id: String) {
        self.cursors.insert(qualified_topic.to_string(), Some(last_event_id));
    }

    pub fn topics_snapshot(&self) -> HashMap<String, Option<String>> {
        self.cursors
            .iter()
            .map(|kv| (kv.key().clone(), kv.value().clone()))
            .collect()
    }

    pub fn callback_display(&self) -> String {
        match &self.endpoint {
            ConsumerEndpoint::Http(url) => url.to_string(),
            ConsumerEndpoint::InProcess(_) => "in-process".to_string(),
            ConsumerEndpoint::ExternalPush { endpoint, .. } => endpoint.clone(),
        }
    }
}
