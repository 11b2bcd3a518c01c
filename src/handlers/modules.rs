// src/handlers/modules.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use validator::Validate;

use super::invalid;
use crate::{
    error::AppError,
    models::{
        Entity, load_all, load_one,
        module::{CreateModuleRequest, Module, UpdateModuleRequest},
    },
    state::SharedStore,
};

/// Lists all modules, newest first.
pub async fn list_modules(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let mut modules = load_all::<Module>(store.as_ref(), None).await.map_err(|e| {
        tracing::error!("Failed to list modules: {:?}", e);
        AppError::from(e)
    })?;
    modules.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Json(modules))
}

pub async fn get_module(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let module = load_one::<Module>(store.as_ref(), &id)
        .await?
        .ok_or(AppError::NotFound("Module not found".to_string()))?;

    Ok(Json(module))
}

/// Creates a module. Content is sanitized before it is stored.
pub async fn create_module(
    State(store): State<SharedStore>,
    Json(payload): Json<CreateModuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(invalid)?;

    let id = store
        .add(Module::COLLECTION, payload.into_fields(Utc::now()))
        .await
        .map_err(|e| {
            tracing::error!("Failed to create module: {:?}", e);
            AppError::from(e)
        })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Updates a module by ID and stamps `updatedAt`.
pub async fn update_module(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateModuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(invalid)?;
    if payload.is_empty() {
        load_one::<Module>(store.as_ref(), &id)
            .await?
            .ok_or(AppError::NotFound("Module not found".to_string()))?;
        return Ok(StatusCode::OK);
    }

    store
        .update(Module::COLLECTION, &id, payload.into_fields(Utc::now()))
        .await
        .map_err(|e| {
            tracing::error!("Failed to update module {}: {:?}", id, e);
            AppError::from(e)
        })?;

    Ok(StatusCode::OK)
}

/// Deletes a module by ID.
/// Its exam questions and results are left in place.
pub async fn delete_module(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let existed = store.delete(Module::COLLECTION, &id).await.map_err(|e| {
        tracing::error!("Failed to delete module {}: {:?}", id, e);
        AppError::from(e)
    })?;

    if !existed {
        return Err(AppError::NotFound("Module not found".to_string()));
    }

    tracing::info!("Module {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
