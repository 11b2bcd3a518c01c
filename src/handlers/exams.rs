// src/handlers/exams.rs

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
        exam::{CreateExamRequest, Exam, UpdateExamRequest},
        module::Module,
    },
    state::SharedStore,
    store::Filter,
};

/// Lists the exam questions of one module.
pub async fn list_module_exams(
    State(store): State<SharedStore>,
    Path(module_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let exams = load_all::<Exam>(store.as_ref(), Some(&Filter::eq("moduleId", module_id.as_str())))
        .await
        .map_err(|e| {
            tracing::error!("Failed to list exams of module {}: {:?}", module_id, e);
            AppError::from(e)
        })?;

    Ok(Json(exams))
}

/// Adds an exam question to an existing module.
pub async fn create_exam(
    State(store): State<SharedStore>,
    Path(module_id): Path<String>,
    Json(payload): Json<CreateExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(invalid)?;

    if load_one::<Module>(store.as_ref(), &module_id).await?.is_none() {
        return Err(AppError::NotFound("Module not found".to_string()));
    }

    let id = store
        .add(Exam::COLLECTION, payload.into_fields(&module_id))
        .await
        .map_err(|e| {
            tracing::error!("Failed to create exam question: {:?}", e);
            AppError::from(e)
        })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Updates an exam question by ID. Its module never changes.
pub async fn update_exam(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(invalid)?;
    if payload.is_empty() {
        load_one::<Exam>(store.as_ref(), &id)
            .await?
            .ok_or(AppError::NotFound("Exam question not found".to_string()))?;
        return Ok(StatusCode::OK);
    }

    store
        .update(Exam::COLLECTION, &id, payload.into_fields())
        .await
        .map_err(|e| {
            tracing::error!("Failed to update exam question {}: {:?}", id, e);
            AppError::from(e)
        })?;

    Ok(StatusCode::OK)
}

pub async fn delete_exam(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let existed = store.delete(Exam::COLLECTION, &id).await.map_err(|e| {
        tracing::error!("Failed to delete exam question {}: {:?}", id, e);
        AppError::from(e)
    })?;

    if !existed {
        return Err(AppError::NotFound("Exam question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
