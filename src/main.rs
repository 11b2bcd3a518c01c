// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dotenvy::dotenv;
use finlit_admin::config::Config;
use finlit_admin::models::{
    Entity, load_all, timestamp,
    user::{ROLE_ADMIN, User},
};
use finlit_admin::routes;
use finlit_admin::state::{AppState, SharedStore};
use finlit_admin::store::{DocumentStore, Filter, InMemoryStore, PgDocumentStore, fields};
use finlit_admin::utils::hash::hash_password;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let store: SharedStore = match &config.database_url {
        Some(url) => Arc::new(connect_postgres(url).await?),
        None => {
            tracing::warn!(
                "DATABASE_URL not set, using in-memory document store (data is lost on exit)"
            );
            Arc::new(InMemoryStore::new())
        }
    };

    // Seed Admin User
    if let Err(e) = seed_admin_user(store.as_ref(), &config).await {
        tracing::error!("Failed to seed admin user: {:?}", e);
    }

    let state = AppState::new(store, config.clone());

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Start the server
    axum::serve(listener, app).await?;
    Ok(())
}

/// Connects to Postgres with a bounded retry, then applies migrations.
async fn connect_postgres(url: &str) -> Result<PgDocumentStore, Box<dyn std::error::Error>> {
    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    return Err(
                        format!("Failed to connect to database after 5 retries: {}", e).into(),
                    );
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations applied successfully.");

    Ok(PgDocumentStore::new(pool))
}

async fn seed_admin_user(
    store: &dyn DocumentStore,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        let email = email.trim().to_lowercase();
        let existing = load_all::<User>(store, Some(&Filter::eq("email", email.as_str()))).await?;

        if existing.is_empty() {
            tracing::info!("Seeding admin user: {}", email);
            let hashed_password = hash_password(password)?;

            store
                .add(
                    User::COLLECTION,
                    fields(json!({
                        "name": "Administrator",
                        "email": email,
                        "role": ROLE_ADMIN,
                        "passwordHash": hashed_password,
                        "joinDate": timestamp::to_stored(Utc::now()),
                    })),
                )
                .await?;
            tracing::info!("Admin user created successfully.");
        }
    }
    Ok(())
}
