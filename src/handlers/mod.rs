// src/handlers/mod.rs

pub mod auth;
pub mod categories;
pub mod events;
pub mod exams;
pub mod modules;
pub mod results;
pub mod users;

use crate::error::AppError;

/// Maps a `validator` failure to a 400 response.
pub(crate) fn invalid<E: std::fmt::Display>(err: E) -> AppError {
    AppError::BadRequest(err.to_string())
}
