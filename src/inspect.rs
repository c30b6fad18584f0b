//! Read-only inspection queries for poking at the PMS database: tables,
//! columns, row samples, and join sanity checks.

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::config::Config;
use crate::db::Database;
use crate::errors::{Result, ToolError};

pub const MAX_SAMPLE_ROWS: i64 = 1000;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TableInfo {
    pub schema: String,
    pub name: String,
    pub table_type: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub default: Option<String>,
}

/// Which columns link a child table to its parent.
#[derive(Debug, Clone)]
pub struct JoinSpec {
    pub child: String,
    pub foreign_key: String,
    pub parent: String,
    pub primary_key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinCheck {
    pub child: String,
    pub parent: String,
    pub total_rows: i64,
    /// Child rows with a non-null foreign key that matches no parent row.
    pub orphan_rows: i64,
}

impl JoinCheck {
    pub fn is_clean(&self) -> bool {
        self.orphan_rows == 0
    }
}

/// Double-quotes an identifier, doubling any embedded quotes.
///
/// Rejects empty names and NUL bytes, which Postgres cannot represent.
pub fn quote_ident(ident: &str) -> Result<String> {
    if ident.is_empty() || ident.contains('\0') {
        return Err(ToolError::InvalidIdentifier(ident.to_string()));
    }
    Ok(format!("\"{}\"", ident.replace('"', "\"\"")))
}

/// `"schema"."table"`
pub fn qualified_name(schema: &str, table: &str) -> Result<String> {
    Ok(format!("{}.{}", quote_ident(schema)?, quote_ident(table)?))
}

/// Base tables and views in `schema`, ordered by name.
pub async fn list_tables(pool: &PgPool, schema: &str) -> Result<Vec<TableInfo>> {
    let tables = sqlx::query_as::<_, TableInfo>(
        r#"
        SELECT table_schema::text AS schema,
               table_name::text AS name,
               table_type::text AS table_type
        FROM information_schema.tables
        WHERE table_schema = $1
        ORDER BY table_name
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await?;

    tracing::debug!("Found {} tables in schema {}", tables.len(), schema);
    Ok(tables)
}

/// Columns of `schema.table` in ordinal order. Empty if the table does not exist.
pub async fn list_columns(pool: &PgPool, schema: &str, table: &str) -> Result<Vec<ColumnInfo>> {
    let columns = sqlx::query_as::<_, ColumnInfo>(
        r#"
        SELECT column_name::text AS name,
               data_type::text AS data_type,
               (is_nullable = 'YES') AS is_nullable,
               column_default::text AS "default"
        FROM information_schema.columns
        WHERE table_schema = $1 AND table_name = $2
        ORDER BY ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await?;

    Ok(columns)
}

pub async fn count_rows(pool: &PgPool, schema: &str, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", qualified_name(schema, table)?);
    let count: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;
    Ok(count)
}

pub fn validate_sample_limit(limit: i64) -> Result<()> {
    if !(1..=MAX_SAMPLE_ROWS).contains(&limit) {
        return Err(ToolError::InvalidArgument(format!(
            "limit must be between 1 and {MAX_SAMPLE_ROWS}, got {limit}"
        )));
    }
    Ok(())
}

/// Up to `limit` rows of `schema.table`, each as a JSON object.
pub async fn sample_rows(
    pool: &PgPool,
    schema: &str,
    table: &str,
    limit: i64,
) -> Result<Vec<serde_json::Value>> {
    validate_sample_limit(limit)?;

    let sql = format!(
        "SELECT row_to_json(t) FROM {} AS t LIMIT $1",
        qualified_name(schema, table)?
    );
    let rows: Vec<serde_json::Value> = sqlx::query_scalar(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSample {
    pub total_rows: i64,
    pub rows: Vec<serde_json::Value>,
}

/// Row count plus a sample of `schema.table` over a fresh pool.
///
/// The limit and identifiers are checked before connecting. The pool is
/// closed whether or not the queries succeed.
pub async fn sample_table(
    config: &Config,
    schema: &str,
    table: &str,
    limit: i64,
) -> Result<TableSample> {
    validate_sample_limit(limit)?;
    qualified_name(schema, table)?;

    let db = Database::new(&config.database_url).await?;
    let sample = async {
        let total_rows = count_rows(&db.pool, schema, table).await?;
        let rows = sample_rows(&db.pool, schema, table, limit).await?;
        Ok::<_, ToolError>(TableSample { total_rows, rows })
    }
    .await;
    db.close().await;
    sample
}

/// Builds the orphan-count query for `spec`. Split out so it can be checked
/// without a database.
pub fn join_check_sql(schema: &str, spec: &JoinSpec) -> Result<String> {
    let child = qualified_name(schema, &spec.child)?;
    let parent = qualified_name(schema, &spec.parent)?;
    let fk = quote_ident(&spec.foreign_key)?;
    let pk = quote_ident(&spec.primary_key)?;

    Ok(format!(
        "SELECT COUNT(*) AS total_rows, \
         COUNT(*) FILTER (WHERE c.{fk} IS NOT NULL AND p.{pk} IS NULL) AS orphan_rows \
         FROM {child} AS c LEFT JOIN {parent} AS p ON p.{pk} = c.{fk}"
    ))
}

/// Counts child rows whose foreign key points at a missing parent.
pub async fn check_join(pool: &PgPool, schema: &str, spec: &JoinSpec) -> Result<JoinCheck> {
    let sql = join_check_sql(schema, spec)?;
    let (total_rows, orphan_rows): (i64, i64) = sqlx::query_as(&sql).fetch_one(pool).await?;

    if orphan_rows > 0 {
        tracing::warn!(
            "{} of {} rows in {} reference a missing {}",
            orphan_rows,
            total_rows,
            spec.child,
            spec.parent
        );
    }

    Ok(JoinCheck {
        child: spec.child.clone(),
        parent: spec.parent.clone(),
        total_rows,
        orphan_rows,
    })
}
