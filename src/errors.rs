use std::path::PathBuf;

/// Errors raised by the migration applier and the inspection utilities.
///
/// Every variant is fatal for the binary that hits it: nothing is retried or
/// downgraded to a warning.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// A required setting is absent or malformed.
    #[error("Configuration error: {0}")]
    Config(String),
    /// The migration file does not exist.
    #[error("Migration file not found: {}", .0.display())]
    MissingFile(PathBuf),
    /// The migration file exists but could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The pool could not be opened or a connection could not be acquired.
    #[error("Database connection error: {0}")]
    Connect(#[source] sqlx::Error),
    /// The database rejected or failed to run the migration script.
    #[error("Migration {} failed: {source}", path.display())]
    Execution {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },
    /// An inspection query failed.
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ToolError {
    /// Process exit status for this error. Every failure path exits with 1.
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// True when the failure happened before any database contact.
    pub fn is_pre_connection(&self) -> bool {
        matches!(
            self,
            ToolError::Config(_)
                | ToolError::MissingFile(_)
                | ToolError::Read { .. }
                | ToolError::InvalidIdentifier(_)
                | ToolError::InvalidArgument(_)
        )
    }

    /// The single failure line shown to the user.
    pub fn user_message(&self) -> String {
        if self.is_pre_connection() {
            format!("{} (database not contacted)", self)
        } else {
            self.to_string()
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_exits_with_one() {
        let errors = vec![
            ToolError::Config("DATABASE_URL missing".into()),
            ToolError::MissingFile(PathBuf::from("migrations/x.sql")),
            ToolError::Connect(sqlx::Error::PoolTimedOut),
            ToolError::Execution {
                path: PathBuf::from("migrations/x.sql"),
                source: sqlx::Error::RowNotFound,
            },
            ToolError::Query(sqlx::Error::RowNotFound),
            ToolError::InvalidIdentifier(String::new()),
        ];
        for err in errors {
            assert_eq!(err.exit_code(), 1, "{err}");
        }
    }

    #[test]
    fn pre_connection_classification() {
        assert!(ToolError::Config("x".into()).is_pre_connection());
        assert!(ToolError::MissingFile(PathBuf::from("a.sql")).is_pre_connection());
        assert!(!ToolError::Connect(sqlx::Error::PoolTimedOut).is_pre_connection());
        assert!(!ToolError::Query(sqlx::Error::RowNotFound).is_pre_connection());
    }

    #[test]
    fn user_message_marks_untouched_database() {
        let err = ToolError::Config("DATABASE_URL or DB_URL environment variable required".into());
        assert_eq!(
            err.user_message(),
            "Configuration error: DATABASE_URL or DB_URL environment variable required (database not contacted)"
        );

        let err = ToolError::Execution {
            path: PathBuf::from("migrations/x.sql"),
            source: sqlx::Error::RowNotFound,
        };
        assert!(!err.user_message().contains("not contacted"));
        assert_eq!(err.user_message(), err.to_string());
    }

    #[test]
    fn display_includes_path() {
        let err = ToolError::MissingFile(PathBuf::from("migrations/pms_schema_update.sql"));
        assert_eq!(
            err.to_string(),
            "Migration file not found: migrations/pms_schema_update.sql"
        );
    }
}
