use crate::errors::{Result, ToolError};

pub const DEFAULT_SCHEMA: &str = "public";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Schema the inspection utilities look in.
    pub schema: String,
}

impl Config {
    /// Loads `.env` if present, then reads configuration from the process
    /// environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .or_else(|| lookup("DB_URL"))
            .ok_or_else(|| {
                ToolError::Config("DATABASE_URL or DB_URL environment variable required".into())
            })
            .and_then(|url| {
                let url = url.trim();
                if url.is_empty() {
                    return Err(ToolError::Config("DATABASE_URL cannot be empty".into()));
                }
                if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                    return Err(ToolError::Config(
                        "DATABASE_URL must start with postgresql:// or postgres://".into(),
                    ));
                }
                Ok(url.to_string())
            })?;

        let schema = lookup("PMS_SCHEMA")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SCHEMA.to_string());

        let config = Self {
            database_url,
            schema,
        };

        tracing::debug!("Database URL: {}", config.redacted_url());
        tracing::debug!("Schema: {}", config.schema);

        Ok(config)
    }

    /// The connection string with any password replaced by `***`.
    pub fn redacted_url(&self) -> String {
        match url::Url::parse(&self.database_url) {
            Ok(mut parsed) => {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some("***"));
                }
                parsed.to_string()
            }
            Err(_) => "<unparseable database url>".to_string(),
        }
    }
}
