//! `/topics` endpoints (spec §6.1): create, list, fetch, and
//! additive-only schema update.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::error::StoreResult;
use crate::registry::{SchemaDef, TopicSummary};
use crate::scope::Scope;

#[derive(Deserialize)]
pub struct CreateTopicRequest {
    pub name: String,
    pub schemas: Vec<SchemaDef>,
}

#[derive(Deserialize)]
pub struct UpdateSchemasRequest {
    pub schemas: Vec<SchemaDef>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct TopicsResponse {
    pub topics: Vec<TopicSummary>,
}

pub async fn list_topics_default(State(state): State<Arc<AppState>>) -> Json<TopicsResponse> {
    list_topics(&state, &Scope::default_scope())
}

pub async fn list_topics_scoped(
    State(state): State<Arc<AppState>>,
    Path((tenant, namespace)): Path<(String, String)>,
) -> Json<TopicsResponse> {
    list_topics(&state, &Scope::new(tenant, namespace))
}

fn list_topics(state: &AppState, scope: &Scope) -> Json<TopicsResponse> {
    Json(TopicsResponse {
        topics: state.topics.get_all_topics(scope),
    })
}

pub async fn create_topic_default(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTopicRequest>,
) -> StoreResult<(StatusCode, Json<MessageResponse>)> {
    create_topic(&state, &Scope::default_scope(), req)
}

pub async fn create_topic_scoped(
    State(state): State<Arc<AppState>>,
    Path((tenant, namespace)): Path<(String, String)>,
    Json(req): Json<CreateTopicRequest>,
) -> StoreResult<(StatusCode, Json<MessageResponse>)> {
    create_topic(&state, &Scope::new(tenant, namespace), req)
}

fn create_topic(
    state: &AppState,
    scope: &Scope,
    req: CreateTopicRequest,
) -> StoreResult<(StatusCode, Json<MessageResponse>)> {
    state.topics.create_topic(scope, &req.name, req.schemas)?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("topic '{}' created", req.name),
        }),
    ))
}

pub async fn get_topic_default(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> StoreResult<Json<TopicSummary>> {
    get_topic(&state, &Scope::default_scope(), &name)
}

pub async fn get_topic_scoped(
    State(state): State<Arc<AppState>>,
    Path((tenant, namespace, name)): Path<(String, String, String)>,
) -> StoreResult<Json<TopicSummary>> {
    get_topic(&state, &Scope::new(tenant, namespace), &name)
}

fn get_topic(state: &AppState, scope: &Scope, name: &str) -> StoreResult<Json<TopicSummary>> {
    state
        .topics
        .get_topic(scope, name)
        .map(Json)
        .ok_or_else(|| crate::error::StoreError::TopicNotFound(name.to_string()))
}

pub async fn update_schemas_default(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(req): Json<UpdateSchemasRequest>,
) -> StoreResult<Json<TopicSummary>> {
    update_schemas(&state, &Scope::default_scope(), &name, req)
}

pub async fn update_schemas_scoped(
    State(state): State<Arc<AppState>>,
    Path((tenant, namespace, name)): Path<(String, String, String)>,
    Json(req): Json<UpdateSchemasRequest>,
) -> StoreResult<Json<TopicSummary>> {
    update_schemas(&state, &Scope::new(tenant, namespace), &name, req)
}

fn update_schemas(
    state: &AppState,
    scope: &Scope,
    name: &str,
    req: UpdateSchemasRequest,
) -> StoreResult<Json<TopicSummary>> {
    state.topics.update_schemas(scope, name, req.schemas).map(Json)
}
