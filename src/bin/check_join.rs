//! Verifies that every child row's foreign key resolves to a parent row,
//! e.g. `check_join --child tasks --fk project_id --parent projects`.

use std::process::ExitCode;

use clap::Parser;
use pms_db_tools::config::Config;
use pms_db_tools::db::Database;
use pms_db_tools::inspect::{self, JoinSpec};
use pms_db_tools::logging;

#[derive(Parser, Debug)]
#[command(about = "Count child rows whose foreign key has no parent")]
struct Args {
    #[arg(long)]
    child: String,

    #[arg(long = "fk")]
    foreign_key: String,

    #[arg(long)]
    parent: String,

    #[arg(long = "pk", default_value = "id")]
    primary_key: String,

    #[arg(long)]
    schema: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    logging::init();
    let args = Args::parse();

    let config = Config::from_env()?;
    let schema = args.schema.unwrap_or_else(|| config.schema.clone());
    let spec = JoinSpec {
        child: args.child,
        foreign_key: args.foreign_key,
        parent: args.parent,
        primary_key: args.primary_key,
    };

    let db = Database::new(&config.database_url).await?;
    let check = inspect::check_join(&db.pool, &schema, &spec).await;
    db.close().await;
    let check = check?;

    println!(
        "{} -> {} on {} = {}: {} rows, {} orphaned",
        check.child,
        check.parent,
        spec.foreign_key,
        spec.primary_key,
        check.total_rows,
        check.orphan_rows
    );

    if check.is_clean() {
        println!("✅ Join is consistent");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("❌ Found {} orphaned rows", check.orphan_rows);
        Ok(ExitCode::FAILURE)
    }
}
