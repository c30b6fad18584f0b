//! Prints the row count of a table and a handful of its rows as JSON.

use clap::Parser;
use pms_db_tools::config::Config;
use pms_db_tools::{inspect, logging};

#[derive(Parser, Debug)]
#[command(about = "Sample rows from a table")]
struct Args {
    table: String,

    #[arg(long, default_value_t = 5)]
    limit: i64,

    #[arg(long)]
    schema: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();
    inspect::validate_sample_limit(args.limit)?;

    let config = Config::from_env()?;
    let schema = args.schema.unwrap_or_else(|| config.schema.clone());

    let sample = inspect::sample_table(&config, &schema, &args.table, args.limit).await?;
    println!("{}.{}: {} rows", schema, args.table, sample.total_rows);

    for (i, row) in sample.rows.iter().enumerate() {
        println!("--- row {} ---", i + 1);
        println!("{}", serde_json::to_string_pretty(row)?);
    }

    Ok(())
}
