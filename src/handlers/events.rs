// src/handlers/events.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use super::invalid;
use crate::{
    error::AppError,
    models::{
        Entity, load_all, load_one,
        category::EventCategory,
        event::{CreateEventRequest, Event, UpdateEventRequest},
    },
    state::SharedStore,
    store::DocumentStore,
};

async fn ensure_category_exists(
    store: &dyn DocumentStore,
    category_id: &str,
) -> Result<(), AppError> {
    if load_one::<EventCategory>(store, category_id).await?.is_none() {
        return Err(AppError::BadRequest(format!(
            "Category '{}' does not exist",
            category_id
        )));
    }
    Ok(())
}

/// Lists all events, latest start date first.
pub async fn list_events(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let mut events = load_all::<Event>(store.as_ref(), None).await.map_err(|e| {
        tracing::error!("Failed to list events: {:?}", e);
        AppError::from(e)
    })?;
    events.sort_by(|a, b| b.start_date.cmp(&a.start_date));

    Ok(Json(events))
}

pub async fn create_event(
    State(store): State<SharedStore>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(invalid)?;
    payload.check_window().map_err(invalid)?;
    ensure_category_exists(store.as_ref(), &payload.category_id).await?;

    let id = store
        .add(Event::COLLECTION, payload.into_fields())
        .await
        .map_err(|e| {
            tracing::error!("Failed to create event: {:?}", e);
            AppError::from(e)
        })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Updates an event by ID.
/// The resulting date window is checked against the stored dates.
pub async fn update_event(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(invalid)?;

    let current = load_one::<Event>(store.as_ref(), &id)
        .await?
        .ok_or(AppError::NotFound("Event not found".to_string()))?;
    if payload.is_empty() {
        return Ok(StatusCode::OK);
    }
    payload.check_window(&current).map_err(invalid)?;

    if let Some(category_id) = &payload.category_id {
        ensure_category_exists(store.as_ref(), category_id).await?;
    }

    store
        .update(Event::COLLECTION, &id, payload.into_fields())
        .await
        .map_err(|e| {
            tracing::error!("Failed to update event {}: {:?}", id, e);
            AppError::from(e)
        })?;

    Ok(StatusCode::OK)
}

pub async fn delete_event(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let existed = store.delete(Event::COLLECTION, &id).await.map_err(|e| {
        tracing::error!("Failed to delete event {}: {:?}", id, e);
        AppError::from(e)
    })?;

    if !existed {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
