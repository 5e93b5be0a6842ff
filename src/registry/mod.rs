//! Topic & schema registry: authoritative metadata for every topic plus
//! the per-`(scope,topic)` sequence allocator (spec §4.1, §4.2).
//!
//! One [`TopicEntry`] guards exactly one topic's in-memory state and its
//! config file. The counter bump and its persistence happen inside the
//! same critical section, so an allocated id is never observed before the
//! file that records it has hit disk.

pub mod schema;
pub mod topic;

use std::collections::HashMap;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::scope::Scope;
use crate::validator::SchemaValidator;

pub use schema::SchemaDef;
pub use topic::TopicSummary;

struct TopicEntry {
    summary: Mutex<TopicSummary>,
    config_path: PathBuf,
}

impl TopicEntry {
    fn persist(&self, summary: &TopicSummary) -> StoreResult<()> {
        write_json_atomically(&self.config_path, summary)
    }
}

fn write_json_atomically(path: &Path, value: &TopicSummary) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    let mut tmp = fs::File::create(&tmp_path)?;
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| StoreError::Internal(format!("failed to serialize topic config: {e}")))?;
    tmp.write_all(&bytes)?;
    tmp.sync_all()?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TopicKey(String, String, String);

pub struct TopicRegistry {
    config_dir: PathBuf,
    validator: Arc<SchemaValidator>,
    topics: DashMap<TopicKey, Arc<TopicEntry>>,
}

impl TopicRegistry {
    pub fn new(config_dir: PathBuf, validator: Arc<SchemaValidator>) -> Self {
        Self {
            config_dir,
            validator,
            topics: DashMap::new(),
        }
    }

    /// Load every `<topic>.json` already on disk under `config_dir`,
    /// registering each topic's schemas with the validator as it goes.
    /// Best-effort: a topic whose file cannot be parsed is skipped and a
    /// warning logged, startup is never aborted by a stale config file.
    pub fn load_from_disk(&self) -> StoreResult<()> {
        if !self.config_dir.exists() {
            return Ok(());
        }
        self.load_dir(&self.config_dir, Scope::default_scope())?;
        for entry in fs::read_dir(&self.config_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let tenant = entry.file_name().to_string_lossy().into_owned();
                let tenant_dir = entry.path();
                if !tenant_dir.is_dir() {
                    continue;
                }
                for ns_entry in fs::read_dir(&tenant_dir)? {
                    let ns_entry = ns_entry?;
                    if ns_entry.file_type()?.is_dir() {
                        let namespace = ns_entry.file_name().to_string_lossy().into_owned();
                        self.load_dir(&ns_entry.path(), Scope::new(tenant.clone(), namespace))?;
                    }
                }
            }
        }
        Ok(())
    }

    fn load_dir(&self, dir: &Path, scope: Scope) -> StoreResult<()> {
        if !dir.exists() {
            return Ok(());
        }
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = match fs::read(&path) {
                Ok(b) => b,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to read topic config");
                    continue;
                }
            };
            let summary: TopicSummary = match serde_json::from_slice(&bytes) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to parse topic config");
                    continue;
                }
            };
            if let Err(e) = self.validator.register_schemas(&scope.qualify(&summary.name), &summary.schemas) {
                tracing::warn!(topic = %summary.name, error = %e, "failed to register schemas on load");
                continue;
            }
            let key = TopicKey(scope.tenant.clone(), scope.namespace.clone(), summary.name.clone());
            self.topics.insert(
                key,
                Arc::new(TopicEntry {
                    summary: Mutex::new(summary),
                    config_path: path,
                }),
            );
        }
        Ok(())
    }

    fn config_path(&self, scope: &Scope, name: &str) -> PathBuf {
        match scope.dir_prefix() {
            Some(prefix) => self.config_dir.join(prefix).join(format!("{name}.json")),
            None => self.config_dir.join(format!("{name}.json")),
        }
    }

    fn key(scope: &Scope, name: &str) -> TopicKey {
        TopicKey(scope.tenant.clone(), scope.namespace.clone(), name.to_string())
    }

    pub fn create_topic(
        &self,
        scope: &Scope,
        name: &str,
        schemas: Vec<SchemaDef>,
    ) -> StoreResult<TopicSummary> {
        if name.is_empty() {
            return Err(StoreError::InvalidRequest("topic name must not be empty".into()));
        }
        let key = Self::key(scope, name);
        if self.topics.contains_key(&key) {
            return Err(StoreError::TopicAlreadyExists(name.to_string()));
        }
        validate_schema_list(&schemas)?;

        let summary = TopicSummary::new(name, schemas);
        let config_path = self.config_path(scope, name);
        write_json_atomically(&config_path, &summary)?;
        self.validator
            .register_schemas(&scope.qualify(name), &summary.schemas)?;

        self.topics.insert(
            key,
            Arc::new(TopicEntry {
                summary: Mutex::new(summary.clone()),
                config_path,
            }),
        );
        Ok(summary)
    }

    /// Additive-only schema update: every existing eventType must still
    /// be present in `new_schemas`; new eventTypes may be introduced and
    /// existing bodies may be modified freely.
    pub fn update_schemas(
        &self,
        scope: &Scope,
        name: &str,
        new_schemas: Vec<SchemaDef>,
    ) -> StoreResult<TopicSummary> {
        let key = Self::key(scope, name);
        let entry = self
            .topics
            .get(&key)
            .ok_or_else(|| StoreError::TopicNotFound(name.to_string()))?
            .clone();

        validate_schema_list(&new_schemas)?;

        let mut guard = entry.summary.lock();
        let existing_types: Vec<&str> = guard.event_types().collect();
        let new_types: std::collections::HashSet<&str> =
            new_schemas.iter().map(|s| s.event_type.as_str()).collect();
        for existing in &existing_types {
            if !new_types.contains(existing) {
                return Err(StoreError::InvalidRequest(format!(
                    "schema update would remove eventType '{existing}'"
                )));
            }
        }

        guard.schemas = new_schemas;
        entry.persist(&guard)?;
        self.validator
            .register_schemas(&scope.qualify(name), &guard.schemas)?;
        Ok(guard.clone())
    }

    pub fn get_topic(&self, scope: &Scope, name: &str) -> Option<TopicSummary> {
        let key = Self::key(scope, name);
        self.topics.get(&key).map(|e| e.summary.lock().clone())
    }

    pub fn topic_exists(&self, scope: &Scope, name: &str) -> bool {
        self.topics.contains_key(&Self::key(scope, name))
    }

    pub fn get_all_topics(&self, scope: &Scope) -> Vec<TopicSummary> {
        self.topics
            .iter()
            .filter(|kv| kv.key().0 == scope.tenant && kv.key().1 == scope.namespace)
            .map(|kv| kv.value().summary.lock().clone())
            .collect()
    }

    /// Allocate the next sequence number for `(scope, topic)`. Advances
    /// and persists the counter atomically with respect to its in-memory
    /// view before returning — a failed persist aborts the allocation.
    pub fn get_and_increment_sequence(&self, scope: &Scope, name: &str) -> StoreResult<u64> {
        let key = Self::key(scope, name);
        let entry = self
            .topics
            .get(&key)
            .ok_or_else(|| StoreError::TopicNotFound(name.to_string()))?
            .clone();

        let mut guard = entry.summary.lock();
        let next = guard.sequence + 1;
        guard.sequence = next;
        entry.persist(&guard)?;
        Ok(next)
    }
}

fn validate_schema_list(schemas: &[SchemaDef]) -> StoreResult<()> {
    if schemas.is_empty() {
        return Err(StoreError::InvalidRequest(
            "at least one schema is required".into(),
        ));
    }
    let mut seen: HashMap<&str, ()> = HashMap::new();
    for schema in schemas {
        if schema.event_type.is_empty() {
            return Err(StoreError::InvalidRequest(
                "schema eventType must not be empty".into(),
            ));
        }
        if !schema.has_schema_uri() {
            return Err(StoreError::InvalidRequest(format!(
                "schema for eventType '{}' is missing $schema",
                schema.event_type
            )));
        }
        if seen.insert(schema.event_type.as_str(), ()).is_some() {
            return Err(StoreError::InvalidRequest(format!(
                "duplicate eventType '{}'",
                schema.event_type
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(event_type: &str) -> SchemaDef {
        serde_json::from_value(json!({
            "eventType": event_type,
            "type": "object",
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "properties": {"id": {"type": "string"}},
            "required": ["id"],
        }))
        .unwrap()
    }

    #[test]
    fn create_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let validator = Arc::new(SchemaValidator::new());
        let reg = TopicRegistry::new(dir.path().to_path_buf(), validator);
        let scope = Scope::default_scope();
        reg.create_topic(&scope, "orders", vec![schema("order.created")])
            .unwrap();
        let got = reg.get_topic(&scope, "orders").unwrap();
        assert_eq!(got.sequence, 0);
        assert_eq!(got.event_types().collect::<Vec<_>>(), vec!["order.created"]);
    }

    #[test]
    fn create_twice_fails() {
        let dir = tempfile::tempdir().unwrap();
        let validator = Arc::new(SchemaValidator::new());
        let reg = TopicRegistry::new(dir.path().to_path_buf(), validator);
        let scope = Scope::default_scope();
        reg.create_topic(&scope, "orders", vec![schema("order.created")])
            .unwrap();
        let err = reg
            .create_topic(&scope, "orders", vec![schema("order.created")])
            .unwrap_err();
        assert!(matches!(err, StoreError::TopicAlreadyExists(_)));
    }

    #[test]
    fn sequence_allocation_is_monotonic() {
        let dir = tempfile::tempdir().unwrap();
        let validator = Arc::new(SchemaValidator::new());
        let reg = TopicRegistry::new(dir.path().to_path_buf(), validator);
        let scope = Scope::default_scope();
        reg.create_topic(&scope, "orders", vec![schema("order.created")])
            .unwrap();
        assert_eq!(reg.get_and_increment_sequence(&scope, "orders").unwrap(), 1);
        assert_eq!(reg.get_and_increment_sequence(&scope, "orders").unwrap(), 2);
        assert_eq!(reg.get_topic(&scope, "orders").unwrap().sequence, 2);
    }

    #[test]
    fn additive_update_allowed_removal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let validator = Arc::new(SchemaValidator::new());
        let reg = TopicRegistry::new(dir.path().to_path_buf(), validator);
        let scope = Scope::default_scope();
        reg.create_topic(&scope, "t", vec![schema("a")]).unwrap();

        reg.update_schemas(&scope, "t", vec![schema("a"), schema("b")])
            .unwrap();
        let got = reg.get_topic(&scope, "t").unwrap();
        assert_eq!(got.schemas.len(), 2);

        let err = reg.update_schemas(&scope, "t", vec![schema("b")]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRequest(_)));
    }

    proptest::proptest! {
        #[test]
        fn sequence_allocation_is_strictly_increasing(n in 1u64..200) {
            let dir = tempfile::tempdir().unwrap();
            let validator = Arc::new(SchemaValidator::new());
            let reg = TopicRegistry::new(dir.path().to_path_buf(), validator);
            let scope = Scope::default_scope();
            reg.create_topic(&scope, "orders", vec![schema("order.created")]).unwrap();

            let mut last = 0u64;
            for _ in 0..n {
                let next = reg.get_and_increment_sequence(&scope, "orders").unwrap();
                proptest::prop_assert!(next == last + 1);
                last = next;
            }
        }
    }
}
