// src/lib.rs

pub mod config;
pub mod error;
pub mod flow;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;
pub mod stats;
pub mod store;
pub mod utils;

pub use routes::create_router;
