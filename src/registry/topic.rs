//! In-memory + on-disk representation of a single topic.

use serde::{Deserialize, Serialize};

use super::schema::SchemaDef;

/// What gets persisted at `<configDir>/<scope?>/<topic>.json` and what
/// `GET /topics` / `GET /topics/{t}` return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSummary {
    pub name: String,
    pub sequence: u64,
    pub schemas: Vec<SchemaDef>,
}

impl TopicSummary {
    pub fn new(name: impl Into<String>, schemas: Vec<SchemaDef>) -> Self {
        Self {
            name: name.into(),
            sequence: 0,
            schemas,
        }
    }

    pub fn event_types(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(|s| s.event_type.as_str())
    }
}
