//! Lists the tables in the PMS schema and the columns of each.

use clap::Parser;
use pms_db_tools::config::Config;
use pms_db_tools::db::Database;
use pms_db_tools::errors::Result;
use pms_db_tools::{inspect, logging};

#[derive(Parser, Debug)]
#[command(about = "Print tables and their columns")]
struct Args {
    /// Only describe this table.
    #[arg(long)]
    table: Option<String>,

    /// Schema to inspect instead of PMS_SCHEMA.
    #[arg(long)]
    schema: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();

    let config = Config::from_env()?;
    let schema = args.schema.unwrap_or_else(|| config.schema.clone());
    let db = Database::new(&config.database_url).await?;

    let result = describe(&db, &schema, args.table.as_deref()).await;
    db.close().await;
    Ok(result?)
}

async fn describe(db: &Database, schema: &str, only: Option<&str>) -> Result<()> {
    let tables = inspect::list_tables(&db.pool, schema).await?;
    let tables: Vec<_> = match only {
        Some(name) => tables.into_iter().filter(|t| t.name == name).collect(),
        None => tables,
    };

    if tables.is_empty() {
        println!("No matching tables in schema {}", schema);
    } else {
        println!("Found {} tables in schema {}:", tables.len(), schema);
    }

    for table in &tables {
        println!("- {} ({})", table.name, table.table_type);

        let columns = inspect::list_columns(&db.pool, schema, &table.name).await?;
        for col in columns {
            let nullable = if col.is_nullable { "" } else { " NOT NULL" };
            match col.default {
                Some(default) => println!(
                    "  - {}: {}{} DEFAULT {}",
                    col.name, col.data_type, nullable, default
                ),
                None => println!("  - {}: {}{}", col.name, col.data_type, nullable),
            }
        }
        println!();
    }

    Ok(())
}
