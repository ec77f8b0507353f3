use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use campus_bus_domain::model::{FleetEntry, PositionReport, Route};
use campus_bus_domain::service::FleetSummary;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{ApiError, AppState};
use crate::app::Ack;

#[derive(Debug, Default, Deserialize)]
pub struct LocationsParams {
    pub route: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssistantRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssistantReply {
    pub reply: String,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "status": "online", "buses": state.query.live_count() }))
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PositionReport>, JsonRejection>,
) -> Result<Json<Ack>, ApiError> {
    let Json(report) = payload.map_err(|e| ApiError::MalformedPayload(e.body_text()))?;
    let ack = state.ingest.ingest(&report)?;
    Ok(Json(ack))
}

pub async fn locations_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationsParams>,
) -> Json<Vec<FleetEntry>> {
    Json(state.query.query(params.route.as_deref()))
}

pub async fn location_handler(
    State(state): State<Arc<AppState>>,
    Path(bus_id): Path<String>,
) -> Result<Json<FleetEntry>, ApiError> {
    state
        .query
        .bus(&bus_id)
        .map(Json)
        .ok_or(ApiError::BusNotFound(bus_id))
}

pub async fn routes_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Route>> {
    Json(state.query.routes())
}

pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<FleetSummary> {
    Json(state.query.summary())
}

pub async fn assistant_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AssistantRequest>, JsonRejection>,
) -> Result<Json<AssistantReply>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::MalformedPayload(e.body_text()))?;
    if request.message.trim().is_empty() {
        return Err(ApiError::MalformedPayload("message must not be empty".to_string()));
    }
    let reply = state.assistant.reply(&request.message).await;
    Ok(Json(AssistantReply { reply }))
}
