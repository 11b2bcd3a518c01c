// src/handlers/categories.rs

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
        category::{CreateCategoryRequest, EventCategory, UpdateCategoryRequest},
    },
    state::SharedStore,
    store::{DocumentStore, Filter},
};

/// Fails with 409 when another category already uses `slug`.
async fn ensure_slug_free(
    store: &dyn DocumentStore,
    slug: &str,
    except_id: Option<&str>,
) -> Result<(), AppError> {
    let taken = load_all::<EventCategory>(store, Some(&Filter::eq("slug", slug)))
        .await?
        .into_iter()
        .any(|c| Some(c.id.as_str()) != except_id);

    if taken {
        return Err(AppError::Conflict(format!("Slug '{}' already exists", slug)));
    }
    Ok(())
}

pub async fn list_categories(
    State(store): State<SharedStore>,
) -> Result<impl IntoResponse, AppError> {
    let categories = load_all::<EventCategory>(store.as_ref(), None).await.map_err(|e| {
        tracing::error!("Failed to list categories: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(categories))
}

/// Creates a category, deriving the slug from the name when none is given.
pub async fn create_category(
    State(store): State<SharedStore>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let category = payload.resolve().map_err(invalid)?;
    ensure_slug_free(store.as_ref(), &category.slug, None).await?;

    let slug = category.slug.clone();
    let id = store
        .add(EventCategory::COLLECTION, category.into_fields())
        .await
        .map_err(|e| {
            tracing::error!("Failed to create category: {:?}", e);
            AppError::from(e)
        })?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({"id": id, "slug": slug})),
    ))
}

pub async fn update_category(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(invalid)?;
    if payload.is_empty() {
        load_one::<EventCategory>(store.as_ref(), &id)
            .await?
            .ok_or(AppError::NotFound("Category not found".to_string()))?;
        return Ok(StatusCode::OK);
    }

    if let Some(slug) = &payload.slug {
        ensure_slug_free(store.as_ref(), slug, Some(&id)).await?;
    }

    store
        .update(EventCategory::COLLECTION, &id, payload.into_fields())
        .await
        .map_err(|e| {
            tracing::error!("Failed to update category {}: {:?}", id, e);
            AppError::from(e)
        })?;

    Ok(StatusCode::OK)
}

/// Deletes a category. Events that reference it are not touched.
pub async fn delete_category(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let existed = store.delete(EventCategory::COLLECTION, &id).await.map_err(|e| {
        tracing::error!("Failed to delete category {}: {:?}", id, e);
        AppError::from(e)
    })?;

    if !existed {
        return Err(AppError::NotFound("Category not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
