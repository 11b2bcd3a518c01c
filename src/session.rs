// src/session.rs

//! Admin session context.
//!
//! A session starts on login and ends on sign-out or expiry. Handlers receive
//! the current [`AdminSession`] as a request extension instead of reaching for
//! any global auth state.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::models::user::{ROLE_ADMIN, User};

/// The signed-in administrator for one request.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSession {
    pub session_id: String,
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Live sessions keyed by session id (the token's `jti`).
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, AdminSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session for `user` lasting `ttl_seconds`.
    /// Sessions that expired without being resolved again are dropped here.
    pub async fn begin(&self, user: &User, ttl_seconds: u64) -> AdminSession {
        let started_at = Utc::now();
        let expires_at = i64::try_from(ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|ttl| started_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let session = AdminSession {
            session_id: uuid::Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
            started_at,
            expires_at,
        };

        {
            let mut guard = self.sessions.write().await;
            guard.retain(|_, s| s.expires_at > started_at);
            guard.insert(session.session_id.clone(), session.clone());
        }
        tracing::info!("Session {} started for {}", session.session_id, session.email);

        session
    }

    /// Looks up a live session, dropping it if it has expired.
    pub async fn resolve(&self, session_id: &str) -> Option<AdminSession> {
        let now = Utc::now();
        {
            let guard = self.sessions.read().await;
            match guard.get(session_id) {
                Some(s) if s.expires_at > now => return Some(s.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        self.sessions.write().await.remove(session_id);
        None
    }

    /// Tears a session down. Returns whether it was live.
    pub async fn end(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id);
        if let Some(s) = &removed {
            tracing::info!("Session {} ended for {}", s.session_id, s.email);
        }
        removed.is_some()
    }

    /// Ends every session belonging to a user, e.g. when the account is deleted.
    pub async fn end_all_for_user(&self, user_id: &str) -> usize {
        let mut guard = self.sessions.write().await;
        let before = guard.len();
        guard.retain(|_, s| s.user_id != user_id);
        before - guard.len()
    }
}
