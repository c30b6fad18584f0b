//! Applies `migrations/pms_schema_update.sql` to the configured database.

use std::process::ExitCode;

use pms_db_tools::config::Config;
use pms_db_tools::errors::ToolError;
use pms_db_tools::logging;
use pms_db_tools::migration::{self, DEFAULT_MIGRATION_PATH};

fn fail(e: ToolError) -> ExitCode {
    eprintln!("❌ {}", e.user_message());
    ExitCode::from(e.exit_code())
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    // Configuration comes first: no file or database I/O without it.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => return fail(e),
    };

    match migration::run(&config, DEFAULT_MIGRATION_PATH).await {
        Ok(report) => {
            println!("✅ {}", report.summary());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}
