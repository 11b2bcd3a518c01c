// src/handlers/users.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::{
    error::AppError,
    models::{
        Entity, load_all,
        user::{User, UserKpis},
    },
    session::AdminSession,
    state::{AppState, SharedStore},
};

async fn fetch_users(store: &SharedStore) -> Result<Vec<User>, AppError> {
    let mut users = load_all::<User>(store.as_ref(), None).await.map_err(|e| {
        tracing::error!("Failed to list users: {:?}", e);
        AppError::from(e)
    })?;
    users.sort_by(|a, b| b.join_date.cmp(&a.join_date));
    Ok(users)
}

/// Lists all users, most recently joined first.
/// Admin only.
pub async fn list_users(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(fetch_users(&store).await?))
}

/// Total, active-today and new-this-month user counts.
pub async fn user_kpis(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let users = fetch_users(&store).await?;
    Ok(Json(UserKpis::compute(&users, Utc::now())))
}

/// Deletes a user by ID.
/// Admin only. Prevents deleting self; ends any sessions of the deleted user.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if id == session.user_id {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    let existed = state.store.delete(User::COLLECTION, &id).await.map_err(|e| {
        tracing::error!("Failed to delete user {}: {:?}", id, e);
        AppError::from(e)
    })?;

    if !existed {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    state.sessions.end_all_for_user(&id).await;
    Ok(StatusCode::NO_CONTENT)
}
