//! Applies a single SQL migration file to the configured database.
//!
//! There is no ledger of applied migrations. Running a file twice runs it
//! twice, and a script that is not itself idempotent (for example an
//! `ALTER TABLE ... ADD COLUMN` without `IF NOT EXISTS`) fails the second time.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::PgPool;

use crate::config::Config;
use crate::db::Database;
use crate::errors::{Result, ToolError};

/// Location of the migration the `pms-db-tools` binary applies, relative to
/// the working directory.
pub const DEFAULT_MIGRATION_PATH: &str = "migrations/pms_schema_update.sql";

/// SQL text read in full from disk. Never modified after loading.
#[derive(Debug, Clone)]
pub struct MigrationScript {
    path: PathBuf,
    sql: String,
}

impl MigrationScript {
    /// Reads the whole file. Touches only the filesystem.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(ToolError::MissingFile(path));
        }
        let sql = std::fs::read_to_string(&path).map_err(|source| ToolError::Read {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("Loaded {} ({} bytes)", path.display(), sql.len());
        Ok(Self { path, sql })
    }

    pub fn from_sql(path: impl Into<PathBuf>, sql: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sql: sql.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

#[derive(Debug, Clone)]
pub struct MigrationReport {
    pub path: PathBuf,
    /// Rows affected summed over every statement in the script.
    pub rows_affected: u64,
    pub elapsed: Duration,
    pub applied_at: DateTime<Utc>,
}

impl MigrationReport {
    /// One-line confirmation printed by the applier binary.
    pub fn summary(&self) -> String {
        format!(
            "Migration {} applied at {} ({} rows affected, {:?})",
            self.path.display(),
            self.applied_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.rows_affected,
            self.elapsed
        )
    }
}

pub struct MigrationApplier {
    pool: PgPool,
}

impl MigrationApplier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Executes the script over one connection acquired from the pool.
    ///
    /// The script is sent as a single simple-protocol command, so the server
    /// splits it into statements. The connection goes back to the pool when
    /// the guard drops, whether execution succeeded or not.
    pub async fn apply(&self, script: &MigrationScript) -> Result<MigrationReport> {
        let mut conn = self.pool.acquire().await.map_err(ToolError::Connect)?;

        tracing::info!("Applying migration {}", script.path().display());
        let started = Instant::now();

        let outcome = sqlx::raw_sql(script.sql()).execute(&mut *conn).await;
        drop(conn);

        match outcome {
            Ok(result) => {
                let report = MigrationReport {
                    path: script.path().to_path_buf(),
                    rows_affected: result.rows_affected(),
                    elapsed: started.elapsed(),
                    applied_at: Utc::now(),
                };
                tracing::debug!(
                    "Migration {} applied in {:?} ({} rows affected)",
                    report.path.display(),
                    report.elapsed,
                    report.rows_affected
                );
                Ok(report)
            }
            Err(source) => Err(ToolError::Execution {
                path: script.path().to_path_buf(),
                source,
            }),
        }
    }
}

/// Full applier procedure: read the file, connect, execute, close.
///
/// The file is read before the pool is opened, so a missing file never
/// causes a connection attempt. The pool is closed on both outcomes.
pub async fn run(config: &Config, path: impl AsRef<Path>) -> Result<MigrationReport> {
    let script = MigrationScript::load(path)?;

    tracing::info!("Connecting to {}", config.redacted_url());
    let db = Database::new(&config.database_url).await?;

    let result = MigrationApplier::new(db.pool.clone()).apply(&script).await;
    db.close().await;
    result
}
