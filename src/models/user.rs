// src/models/user.rs

use chrono::{DateTime, Datelike, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Entity, decode, timestamp};
use crate::store::{Document, StoreError, collections};

pub const ROLE_ADMIN: &str = "admin";

fn default_role() -> String {
    "user".to_string()
}

/// A platform account ('users' collection).
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,

    /// 'user' or 'admin'.
    pub role: String,

    pub avatar: Option<String>,
    pub join_date: DateTime<Utc>,
    pub last_active: Option<DateTime<Utc>>,

    /// Argon2 password hash, present on admin accounts only.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password_hash: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    name: String,
    email: String,
    #[serde(default = "default_role")]
    role: String,
    avatar: Option<String>,
    password_hash: Option<String>,
}

impl Entity for User {
    const COLLECTION: &'static str = collections::USERS;

    fn from_document(doc: &Document, read_at: DateTime<Utc>) -> Result<Self, StoreError> {
        let stored: StoredUser = decode(Self::COLLECTION, doc)?;
        Ok(Self {
            id: doc.id.clone(),
            name: stored.name,
            email: stored.email,
            role: stored.role,
            avatar: stored.avatar.filter(|a| !a.is_empty()),
            join_date: timestamp::read_or(&doc.data, "joinDate", None, read_at),
            last_active: timestamp::read(&doc.data, "lastActive", None),
            password_hash: stored.password_hash,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Headline numbers for the users screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserKpis {
    pub total_users: usize,
    pub active_today: usize,
    pub new_this_month: usize,
}

impl UserKpis {
    /// Day and month boundaries are taken in UTC.
    pub fn compute(users: &[User], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let start_of_today = today.and_time(NaiveTime::MIN).and_utc();
        let start_of_month = today
            .with_day(1)
            .unwrap_or(today)
            .and_time(NaiveTime::MIN)
            .and_utc();

        let active_today = users
            .iter()
            .filter(|u| u.last_active.is_some_and(|t| t >= start_of_today))
            .count();
        let new_this_month = users
            .iter()
            .filter(|u| u.join_date >= start_of_month)
            .count();

        Self {
            total_users: users.len(),
            active_today,
            new_this_month,
        }
    }
}

/// DTO for admin login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}
