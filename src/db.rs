use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::errors::{Result, ToolError};

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    /// Opens a pool capped at one connection.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await
            .map_err(ToolError::Connect)?;

        Ok(Self { pool })
    }

    pub async fn close(self) {
        self.pool.close().await;
        tracing::debug!("Database pool closed");
    }
}
