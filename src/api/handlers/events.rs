//! `/events` publish and `/topics/{t}/events` read (spec §4.4, §4.5,
//! §6.1). Publish validates the entire batch before allocating or
//! writing anything — a single bad event rejects all of them.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::state::AppState;
use crate::error::{StoreError, StoreResult};
use crate::scope::Scope;
use crate::store::{Event, ReadQuery};

#[derive(Deserialize)]
pub struct PublishRequest {
    pub topic: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub payload: Value,
}

#[derive(Serialize)]
pub struct PublishResponse {
    #[serde(rename = "eventIds")]
    pub event_ids: Vec<String>,
}

#[derive(Deserialize)]
pub struct EventsQuery {
    #[serde(rename = "sinceEventId")]
    pub since_event_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}

pub async fn publish_default(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<Vec<PublishRequest>>,
) -> StoreResult<(StatusCode, Json<PublishResponse>)> {
    publish(&state, Scope::default_scope(), batch).await
}

pub async fn publish_scoped(
    State(state): State<Arc<AppState>>,
    Path((tenant, namespace)): Path<(String, String)>,
    Json(batch): Json<Vec<PublishRequest>>,
) -> StoreResult<(StatusCode, Json<PublishResponse>)> {
    publish(&state, Scope::new(tenant, namespace), batch).await
}

async fn publish(
    state: &AppState,
    scope: Scope,
    batch: Vec<PublishRequest>,
) -> StoreResult<(StatusCode, Json<PublishResponse>)> {
    if batch.is_empty() {
        return Err(StoreError::InvalidRequest("event batch must not be empty".into()));
    }

    for event in &batch {
        if !state.topics.topic_exists(&scope, &event.topic) {
            return Err(StoreError::TopicNotFound(event.topic.clone()));
        }
        let qualified = scope.qualify(&event.topic);
        state
            .validator
            .validate_event(&qualified, &event.event_type, &event.payload)?;
    }

    let mut event_ids = Vec::with_capacity(batch.len());
    let mut touched_topics = Vec::new();
    let now = Utc::now();

    for event in batch {
        let sequence = state.topics.get_and_increment_sequence(&scope, &event.topic)?;
        let written = state
            .store
            .write_event(&scope, &event.topic, sequence, event.event_type, event.payload, now)?;
        event_ids.push(written.id);

        let qualified = scope.qualify(&event.topic);
        if !touched_topics.contains(&qualified) {
            touched_topics.push(qualified);
        }
    }

    state.dispatchers.notify_published(&touched_topics);

    Ok((StatusCode::CREATED, Json(PublishResponse { event_ids })))
}

pub async fn get_events_default(
    State(state): State<Arc<AppState>>,
    Path(topic): Path<String>,
    Query(query): Query<EventsQuery>,
) -> StoreResult<Json<EventsResponse>> {
    get_events(&state, Scope::default_scope(), topic, query)
}

pub async fn get_events_scoped(
    State(state): State<Arc<AppState>>,
    Path((tenant, namespace, topic)): Path<(String, String, String)>,
    Query(query): Query<EventsQuery>,
) -> StoreResult<Json<EventsResponse>> {
    get_events(&state, Scope::new(tenant, namespace), topic, query)
}

fn get_events(
    state: &AppState,
    scope: Scope,
    topic: String,
    query: EventsQuery,
) -> StoreResult<Json<EventsResponse>> {
    if !state.topics.topic_exists(&scope, &topic) {
        return Err(StoreError::TopicNotFound(topic));
    }

    let read_query = ReadQuery {
        since_sequence: query.since_event_id.as_deref().and_then(crate::store::parse_sequence),
        date: query.date,
        limit: query.limit,
    };
    let events = state.store.get_events(&scope, &topic, &read_query)?;
    Ok(Json(EventsResponse { events }))
}
