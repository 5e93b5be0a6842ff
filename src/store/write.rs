//! Append-only event persistence. Each event is written to its own file
//! via create-new-exclusive then `fsync`, so a write can never silently
//! overwrite a prior event and the id it carries is durable once the call
//! returns successfully.

use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::event::Event;
use super::layout::event_path;
use crate::error::StoreResult;
use crate::scope::Scope;

pub fn write_event(
    data_dir: &Path,
    scope: &Scope,
    topic: &str,
    sequence: u64,
    event_type: String,
    payload: Value,
    timestamp: DateTime<Utc>,
) -> StoreResult<Event> {
    let event = Event::new(topic, sequence, event_type, payload, timestamp);
    let path = event_path(data_dir, scope, topic, sequence, &timestamp);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().write(true).create_new(true).open(&path)?;
    let bytes = serde_json::to_vec(&event)
        .map_err(|e| crate::error::StoreError::Internal(format!("failed to serialize event: {e}")))?;
    file.write_all(&bytes)?;
    file.sync_all()?;

    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn writes_one_file_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let scope = Scope::default_scope();
        let event = write_event(
            dir.path(),
            &scope,
            "orders",
            1,
            "order.created".into(),
            json!({"id": "1"}),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(event.id, "orders-1");

        let path = event_path(dir.path(), &scope, "orders", 1, &event.timestamp);
        assert!(path.exists());
    }

    #[test]
    fn refuses_to_overwrite_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let scope = Scope::default_scope();
        let ts = Utc::now();
        write_event(dir.path(), &scope, "orders", 1, "a".into(), Value::Null, ts).unwrap();
        let err = write_event(dir.path(), &scope, "orders", 1, "a".into(), Value::Null, ts)
            .unwrap_err();
        assert!(matches!(err, crate::error::StoreError::Io(_)));
    }
}
