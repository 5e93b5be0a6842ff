//! `/consumers` endpoints (spec §4.6, §6.1).

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::consumers::RegistrationRequest;
use crate::error::{StoreError, StoreResult};
use crate::scope::Scope;

#[derive(Deserialize)]
pub struct RegisterConsumerRequest {
    pub callback: String,
    pub topics: HashMap<String, Option<String>>,
}

#[derive(Serialize)]
pub struct RegisterConsumerResponse {
    #[serde(rename = "consumerId")]
    pub consumer_id: Uuid,
}

#[derive(Serialize)]
pub struct ConsumerSummary {
    pub id: Uuid,
    pub callback: String,
    pub topics: HashMap<String, Option<String>>,
}

#[derive(Serialize)]
pub struct ConsumersResponse {
    pub consumers: Vec<ConsumerSummary>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn register_default(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterConsumerRequest>,
) -> StoreResult<(StatusCode, Json<RegisterConsumerResponse>)> {
    register(&state, Scope::default_scope(), req)
}

pub async fn register_scoped(
    State(state): State<Arc<AppState>>,
    Path((tenant, namespace)): Path<(String, String)>,
    Json(req): Json<RegisterConsumerRequest>,
) -> StoreResult<(StatusCode, Json<RegisterConsumerResponse>)> {
    register(&state, Scope::new(tenant, namespace), req)
}

fn register(
    state: &AppState,
    scope: Scope,
    req: RegisterConsumerRequest,
) -> StoreResult<(StatusCode, Json<RegisterConsumerResponse>)> {
    let topic_names: Vec<String> = req.topics.keys().cloned().collect();
    let request = RegistrationRequest::Http {
        callback: req.callback,
        topics: req.topics,
    };
    let consumer_id = state.consumers.register(&state.topics, &scope, request)?;

    for topic in topic_names {
        state.dispatchers.ensure_running(&scope, &topic);
    }

    Ok((
        StatusCode::CREATED,
        Json(RegisterConsumerResponse { consumer_id }),
    ))
}

pub async fn list_consumers(State(state): State<Arc<AppState>>) -> Json<ConsumersResponse> {
    let consumers = state
        .consumers
        .find_all()
        .into_iter()
        .map(|c| ConsumerSummary {
            id: c.id,
            callback: c.callback_display(),
            topics: c.topics_snapshot(),
        })
        .collect();
    Json(ConsumersResponse { consumers })
}

pub async fn delete_consumer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> StoreResult<Json<MessageResponse>> {
    if state.consumers.delete(id) {
        Ok(Json(MessageResponse {
            message: "consumer deleted".to_string(),
        }))
    } else {
        Err(StoreError::ConsumerNotFound(id.to_string()))
    }
}
