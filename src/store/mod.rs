//! The event store's write and read paths (spec §4.4, §4.5). The store
//! itself has no notion of topics existing or not — that precondition is
//! the registry's job; callers check `TopicRegistry::topic_exists` before
//! reaching here.

pub mod event;
pub mod layout;
pub mod read;
pub mod write;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde_json::Value;

pub use event::{parse_sequence, Event};
pub use read::ReadQuery;

use crate::error::StoreResult;
use crate::scope::Scope;

pub struct EventStore {
    data_dir: PathBuf,
}

impl EventStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn write_event(
        &self,
        scope: &Scope,
        topic: &str,
        sequence: u64,
        event_type: String,
        payload: Value,
        timestamp: DateTime<Utc>,
    ) -> StoreResult<Event> {
        write::write_event(&self.data_dir, scope, topic, sequence, event_type, payload, timestamp)
    }

    pub fn get_events(&self, scope: &Scope, topic: &str, query: &ReadQuery) -> StoreResult<Vec<Event>> {
        read::get_events(&self.data_dir, scope, topic, query)
    }
}
