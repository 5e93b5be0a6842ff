//! The `Event` wire/on-disk representation: `{id, timestamp, type, payload}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub payload: Value,
}

impl Event {
    pub fn new(topic: &str, sequence: u64, event_type: String, payload: Value, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: format!("{topic}-{sequence}"),
            timestamp,
            event_type,
            payload,
        }
    }
}

/// Extract the numeric sequence from an id of the form `<topic>-<sequence>`.
/// Returns `None` if the id doesn't parse — callers treat that as "no
/// cursor" rather than failing the request, since a malformed
/// `sinceEventId` is simplest to interpret as "from the start".
pub fn parse_sequence(id: &str) -> Option<u64> {
    id.rsplit_once('-').and_then(|(_, seq)| seq.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_topic_qualified() {
        let e = Event::new("orders", 7, "order.created".into(), Value::Null, Utc::now());
        assert_eq!(e.id, "orders-7");
    }

    #[test]
    fn parses_sequence_out_of_id() {
        assert_eq!(parse_sequence("orders-7"), Some(7));
        assert_eq!(parse_sequence("orders-with-dash-12"), Some(12));
        assert_eq!(parse_sequence("garbage"), None);
    }
}
