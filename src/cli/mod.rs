pub mod account;
pub mod device;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "accountctl")]
#[command(about = "Account registry administration", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = "accounts.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Account management
    Account {
        #[command(subcommand)]
        cmd: account::AccountCommands,
    },
    /// Device management
    Device {
        #[command(subcommand)]
        cmd: device::DeviceCommands,
    },
}

fn parse_hex_key(s: &str) -> crate::error::Result<Vec<u8>> {
    hex::decode(s).map_err(|e| crate::error::AccountError::InvalidInput(format!("bad hex key: {}", e)))
}
