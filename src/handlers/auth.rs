// src/handlers/auth.rs

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use super::invalid;
use crate::{
    error::AppError,
    models::{
        Entity, load_all, timestamp,
        user::{LoginRequest, User},
    },
    session::AdminSession,
    state::AppState,
    store::{Filter, fields},
    utils::{hash::verify_password, jwt::sign_jwt},
};

/// Authenticates an administrator and opens a session.
///
/// Verifies the email and password against the 'users' collection. Only
/// accounts with the 'admin' role may sign in to the dashboard.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(invalid)?;

    let email = payload.email.trim().to_lowercase();
    let user = load_all::<User>(state.store.as_ref(), Some(&Filter::eq("email", email.as_str())))
        .await
        .map_err(|e| {
            tracing::error!("Login lookup failed: {:?}", e);
            AppError::from(e)
        })?
        .into_iter()
        .next()
        .ok_or(AppError::AuthError("Invalid email or password".to_string()))?;

    let is_valid = match &user.password_hash {
        Some(hash) => verify_password(&payload.password, hash)?,
        None => false,
    };
    if !is_valid {
        return Err(AppError::AuthError("Invalid email or password".to_string()));
    }

    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "Access restricted to administrators".to_string(),
        ));
    }

    let session = state.sessions.begin(&user, state.config.jwt_expiration).await;
    let token = sign_jwt(&session, &state.config.jwt_secret)?;

    let touched = fields(json!({ "lastActive": timestamp::to_stored(Utc::now()) }));
    if let Err(e) = state.store.update(User::COLLECTION, &user.id, touched).await {
        tracing::warn!("Failed to record last activity for {}: {}", user.id, e);
    }

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "expires_at": session.expires_at,
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "role": user.role,
        }
    })))
}

/// Ends the current session. The token stops working immediately.
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> impl IntoResponse {
    state.sessions.end(&session.session_id).await;
    StatusCode::NO_CONTENT
}

/// Returns the session of the signed-in administrator.
pub async fn me(Extension(session): Extension<AdminSession>) -> impl IntoResponse {
    Json(session)
}
