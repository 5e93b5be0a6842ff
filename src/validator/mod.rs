//! JSON-Schema-backed payload validation, keyed by `(scopeQualifiedTopic,
//! eventType)` (spec §4.3). Compiled validators are cached; `updateSchemas`
//! simply overwrites the entries for the topic's current eventTypes —
//! stale entries for removed eventTypes are never created because the
//! registry forbids removing an eventType in the first place.

use dashmap::DashMap;
use jsonschema::{Draft, Validator};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::registry::SchemaDef;

type ValidatorKey = (String, String);

pub struct SchemaValidator {
    validators: DashMap<ValidatorKey, Validator>,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self {
            validators: DashMap::new(),
        }
    }

    /// Compile and register every schema for `qualified_topic`, replacing
    /// any validator previously registered for the same `(topic, eventType)`
    /// pair.
    pub fn register_schemas(
        &self,
        qualified_topic: &str,
        schemas: &[SchemaDef],
    ) -> StoreResult<()> {
        for schema in schemas {
            let compiled = jsonschema::options()
                .with_draft(Draft::Draft202012)
                .build(&schema.body)
                .map_err(|e| {
                    StoreError::InvalidRequest(format!(
                        "schema for eventType '{}' does not compile: {e}",
                        schema.event_type
                    ))
                })?;
            self.validators.insert(
                (qualified_topic.to_string(), schema.event_type.clone()),
                compiled,
            );
        }
        Ok(())
    }

    pub fn validate_event(
        &self,
        qualified_topic: &str,
        event_type: &str,
        payload: &Value,
    ) -> StoreResult<()> {
        let key = (qualified_topic.to_string(), event_type.to_string());
        let validator = self.validators.get(&key).ok_or_else(|| StoreError::SchemaNotFound {
            topic: qualified_topic.to_string(),
            event_type: event_type.to_string(),
        })?;
        if let Err(first_error) = validator.validate(payload) {
            return Err(StoreError::SchemaValidation(first_error.to_string()));
        }
        Ok(())
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}
