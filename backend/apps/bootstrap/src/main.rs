//! Catalog Bootstrap
//!
//! Connects to the database, applies migrations and reports what the catalog holds.
//! Uses `anyhow` for startup errors; catalog errors are reported through
//! `kernel::error::AppError`.

use std::env;
use std::sync::Arc;

use anyhow::Context;
use catalog::domain::repository::{PlaylistRepository, SongRepository};
use catalog::{CatalogConfig, CatalogResult, PgCatalogRepository, UserService};
use kernel::error::app_error::AppError;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bootstrap=info,catalog=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .map(|v| v.parse::<u32>())
        .transpose()
        .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?
        .unwrap_or(DEFAULT_MAX_CONNECTIONS);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await?;

    tracing::info!(max_connections, "Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let config = CatalogConfig::from_lookup(|key| env::var(key).ok()).map_err(AppError::from)?;
    tracing::info!(
        peppered = config.password_pepper.is_some(),
        memory_kib = config.hashing_cost.memory_kib,
        iterations = config.hashing_cost.iterations,
        "Password hashing configured"
    );

    let store = Arc::new(PgCatalogRepository::new(pool));
    let users = UserService::new(store.clone(), Arc::new(config));

    // Summary failure is not fatal
    match summarize(&users, &store).await {
        Ok((user_count, song_count, playlist_count)) => {
            tracing::info!(
                users = user_count,
                songs = song_count,
                playlists = playlist_count,
                "Catalog ready"
            );
        }
        Err(e) => {
            e.log();
            let err = AppError::from(e);
            if err.is_server_error() {
                tracing::error!(
                    status = err.status_code(),
                    message = err.message(),
                    "Catalog summary failed"
                );
            } else {
                tracing::warn!(
                    status = err.status_code(),
                    message = err.message(),
                    "Catalog summary failed"
                );
            }
        }
    }

    Ok(())
}

async fn summarize(
    users: &UserService<PgCatalogRepository>,
    store: &PgCatalogRepository,
) -> CatalogResult<(usize, usize, usize)> {
    let user_count = users.get_all_users().await?.len();
    let song_count = store.get_all_songs().await?.len();
    let playlist_count = store.get_all_playlists().await?.len();
    Ok((user_count, song_count, playlist_count))
}
