//! Schema definitions carried by a topic. A `SchemaDef` pairs an
//! `eventType` with the raw JSON-Schema body submitted by the caller —
//! the body is kept exactly as received (including `$schema`, `type`,
//! `properties`, `required`, and any extra vendor fields) so it can be
//! round-tripped back out of `GET /topics/{t}` and handed unmodified to
//! the validator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDef {
    #[serde(rename = "eventType")]
    pub event_type: String,
    #[serde(flatten)]
    pub body: Value,
}

impl SchemaDef {
    /// `$schema` must be present and non-empty; spec 4.2 createTopic.
    pub fn has_schema_uri(&self) -> bool {
        matches!(self.body.get("$schema"), Some(Value::String(s)) if !s.is_empty())
    }
}
