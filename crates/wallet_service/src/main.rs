use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use wallet_core::{Config, Identity};
use wallet_service::console::{run_console, ConsoleSink};
use wallet_service::logging::init_logging;
use wallet_service::SessionRouter;
use wallet_store::{RegistrationStore, SqliteRegistrationStore};

#[derive(Parser, Debug, Clone)]
#[command(name = "wallet-registrar")]
#[command(about = "Collects and stores EVM wallet addresses via a chat flow")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Path to the config file
    #[arg(long, default_value = "wallet-registrar.toml")]
    config: PathBuf,

    /// Identity used by the console transport
    #[arg(long, env = "WALLET_IDENTITY", default_value = "1")]
    identity: i64,

    /// Display name used by the console transport
    #[arg(long, env = "USER", default_value = "")]
    display_name: String,

    /// Log level (overrides debug flag)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.log_level.is_some() {
        // If RUST_LOG is set, use it
        env_logger::init();
    } else {
        init_logging(cli.debug);
    }

    let config = Config::load_from(&cli.config);
    log::info!("Starting wallet registrar");
    log::info!("  Database: {}", config.database_path.display());
    log::info!("  Strict checksum: {}", config.strict_checksum);
    log::info!("  Session ttl: {}s", config.session_ttl_secs);

    let store = Arc::new(SqliteRegistrationStore::new(&config.database_path));
    store.init().await?;

    let router = Arc::new(SessionRouter::new(&config, store, Arc::new(ConsoleSink)));

    // Sweep stale sessions in the background.
    let sweeper = Arc::clone(&router);
    let ttl = config.session_ttl();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(ttl);
        interval.tick().await;
        loop {
            interval.tick().await;
            let evicted = sweeper.evict_stale();
            if evicted > 0 {
                log::info!("evicted {evicted} stale sessions");
            }
        }
    });

    run_console(&router, Identity(cli.identity), cli.display_name).await?;
    Ok(())
}
