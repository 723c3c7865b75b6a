use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}

pub async fn run_migrations(db: &PgPool) {
    match sqlx::migrate!("./migrations").run(db).await {
        Ok(()) => tracing::info!("migrations applied"),
        Err(e) => tracing::warn!(error = %e, "migration failed; continuing"),
    }
}
