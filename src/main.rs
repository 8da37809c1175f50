use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use messenger_accounts::account::{AccountStore, DefaultDeliveryPolicy};
use messenger_accounts::cli::{self, Cli, Commands};
use messenger_accounts::config::AccountsConfig;
use messenger_accounts::error::Result;
use messenger_accounts::storage::Storage;

fn main() {
    let cli = Cli::parse();
    let config = AccountsConfig::load_or_default(&cli.config);

    // Initialize tracing; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli.command, &config) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, config: &AccountsConfig) -> Result<()> {
    info!("Persistence: Opening Sled DB at '{}'...", config.storage.db_path);
    let storage = Arc::new(Storage::open(&config.storage.db_path)?);
    let mut store = AccountStore::with_storage(storage)?;

    match command {
        Commands::Account { cmd } => {
            cli::account::handle_account_command(cmd, &mut store, &DefaultDeliveryPolicy)
        }
        Commands::Device { cmd } => cli::device::handle_device_command(cmd, &mut store),
    }
}
