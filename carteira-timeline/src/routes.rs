use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use carteira_protocol::timeline::{
    group_timelines_by_client, CreateEventRequest, CreateTimelineRequest, EventQuery, EventUpdate,
    TimelineUpdate, MAX_DESCRIPTION_LEN,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::AuthContext;
use crate::error::{AppError, AppResult};
use crate::AppState;

pub async fn health_check() -> &'static str {
    "ok"
}

fn data<T: Serialize>(value: &T) -> Json<Value> {
    Json(json!({ "data": value }))
}

fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}

fn check_description(description: Option<&str>) -> Result<(), AppError> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LEN => Err(AppError::bad_request(
            format!("descrição excede {MAX_DESCRIPTION_LEN} caracteres"),
        )),
        _ => Ok(()),
    }
}

// --- timelines ---

pub async fn list_timelines(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let timelines = state.store.list_timelines().await?;
    Ok(data(&timelines))
}

pub async fn get_timeline(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let timeline = state.store.get_timeline(&id).await?;
    Ok(data(&timeline))
}

pub async fn create_timeline(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateTimelineRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let new = payload
        .into_new_timeline(&auth.user_id)
        .map_err(|missing| AppError::missing_fields(&missing))?;

    let timeline = state.store.insert_timeline(new).await?;
    info!(timeline_id = %timeline.id, user_id = %auth.user_id, "timeline criada");
    Ok((StatusCode::CREATED, data(&timeline)))
}

pub async fn update_timeline(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<TimelineUpdate>,
) -> AppResult<Json<Value>> {
    let timeline = state.store.update_timeline(&id, payload).await?;
    Ok(data(&timeline))
}

pub async fn delete_timeline(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.store.delete_timeline(&id).await?;
    info!(timeline_id = %id, "timeline excluída");
    Ok(message("Timeline excluída com sucesso"))
}

// --- events ---

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> AppResult<Json<Value>> {
    let Some(timeline_id) = query.timeline_id else {
        return Err(AppError::missing_fields(&["timeline_id"]));
    };

    let events = state.store.list_events(&timeline_id).await?;
    Ok(data(&events))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let event = state.store.get_event(&id).await?;
    Ok(data(&event))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let new = payload
        .into_new_event()
        .map_err(|missing| AppError::missing_fields(&missing))?;
    check_description(new.description.as_deref())?;

    let event = state.store.insert_event(new).await?;
    info!(event_id = %event.id, timeline_id = %event.timeline_id, "evento criado");
    Ok((StatusCode::CREATED, data(&event)))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<EventUpdate>,
) -> AppResult<Json<Value>> {
    check_description(payload.description.as_deref())?;
    let event = state.store.update_event(&id, payload).await?;
    Ok(data(&event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.store.delete_event(&id).await?;
    info!(event_id = %id, "evento excluído");
    Ok(message("Evento excluído com sucesso"))
}

// --- clients ---

/// Raw client timeline rows reduced to one current record per client.
pub async fn list_clients(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let records = state.store.list_client_records().await?;
    let grouped = group_timelines_by_client(records);
    Ok(data(&grouped))
}
