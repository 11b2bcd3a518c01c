// src/utils/jwt.rs

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, session::AdminSession, state::AppState};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID.
    pub sub: String,
    /// User's role (e.g., 'user', 'admin').
    pub role: String,
    /// Session id, resolved against the session registry on every request.
    pub jti: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a JWT for an open session.
/// The token expires together with the session.
pub fn sign_jwt(session: &AdminSession, secret: &str) -> Result<String, AppError> {
    let claims = Claims {
        sub: session.user_id.clone(),
        role: session.role.clone(),
        jti: session.session_id.clone(),
        exp: usize::try_from(session.expires_at.timestamp()).unwrap_or(usize::MAX),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
///
/// Returns the `Claims` if valid, otherwise returns an `AppError`.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Axum Middleware: Authentication.
///
/// Validates the 'Authorization: Bearer <token>' header, then resolves the
/// token's session id in the session registry. A token whose session was
/// signed out is rejected even if its signature is still valid.
/// On success the `AdminSession` is injected into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => token,
        None => return Err(StatusCode::UNAUTHORIZED),
    };

    let claims = verify_jwt(token, &state.config.jwt_secret).map_err(|_| StatusCode::UNAUTHORIZED)?;

    let session = state
        .sessions
        .resolve(&claims.jti)
        .await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

/// Axum Middleware: Admin Authorization.
///
/// Must be used AFTER `auth_middleware`. Checks that the session has the
/// 'admin' role. If not, returns 403 Forbidden.
pub async fn admin_middleware(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let session = req
        .extensions()
        .get::<AdminSession>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !session.is_admin() {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn session() -> AdminSession {
        let now = Utc::now();
        AdminSession {
            session_id: "s-1".into(),
            user_id: "u-1".into(),
            email: "admin@example.org".into(),
            name: "Admin".into(),
            role: "admin".into(),
            started_at: now,
            expires_at: now + Duration::minutes(10),
        }
    }

    #[test]
    fn token_round_trips_session_identity() {
        let token = sign_jwt(&session(), "secret").unwrap();
        let claims = verify_jwt(&token, "secret").unwrap();
        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.jti, "s-1");
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_jwt(&session(), "secret").unwrap();
        assert!(matches!(
            verify_jwt(&token, "other"),
            Err(AppError::AuthError(_))
        ));
    }
}
