//! Live table registry server.
//!
//! Spawns the single-writer table registry, creates the initial tables and
//! runs until interrupted, then drains the registry before exiting.

mod config;
mod logging;

use anyhow::Error;
use config::ServerConfig;
use live_tables::table::TableRegistry;
use log::info;
use pico_args::Arguments;

const HELP: &str = "\
Run a live table registry server

USAGE:
  lt_server [OPTIONS]

OPTIONS:
  --inbox-capacity  N     Registry request inbox capacity  [default: env REGISTRY_INBOX_CAPACITY or 100]
  --tables          N     Number of tables to create       [default: env INITIAL_TABLES or 1]

FLAGS:
  -h, --help              Print help information

ENVIRONMENT:
  REGISTRY_INBOX_CAPACITY   Registry request inbox capacity
  INITIAL_TABLES            Number of tables to create on startup
  TABLE_TIMED               Whether new tables are timed (true/false)
  TABLE_TIME_BASE_SECS      Starting time bank per player, in seconds
  TABLE_TIME_PER_TURN_SECS  Time added after each turn, in seconds
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let inbox_capacity: Option<usize> = pargs.opt_value_from_str("--inbox-capacity")?;
    let initial_tables: Option<usize> = pargs.opt_value_from_str("--tables")?;

    logging::init();

    let config = ServerConfig::from_env(inbox_capacity, initial_tables);
    config.validate()?;

    info!(
        "Starting table registry (inbox capacity {}, timed tables: {})",
        config.inbox_capacity, config.table_defaults.timed
    );
    let registry = TableRegistry::spawn(config.registry_config());

    info!("Creating {} initial table(s)...", config.initial_tables);
    for i in 0..config.initial_tables {
        let name = format!("Table {}", i + 1);
        match registry.create_table(name.clone()).await {
            Ok(table_id) => {
                logging::log_registry_event(
                    "table_created",
                    Some(table_id),
                    &format!("Created '{name}'"),
                );
            }
            Err(e) => {
                log::error!("Failed to create '{}': {}", name, e);
            }
        }
    }

    let tables = registry.list_tables().await?;
    info!("Server ready with {} active table(s)", tables.len());
    for table in tables {
        info!("  - {} (ID: {})", table.name, table.id);
    }

    info!("Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to listen for Ctrl+C: {}", e))?;

    info!("Shutting down table registry...");
    registry.shutdown().await;
    logging::log_registry_event("shutdown", None, "Registry stopped");

    Ok(())
}
