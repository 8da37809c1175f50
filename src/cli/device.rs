use clap::Subcommand;
use tracing::info;

use super::account::{find, find_mut};
use crate::account::status::current_timestamp;
use crate::account::{AccountStore, Device, DeviceId};
use crate::error::Result;

#[derive(Subcommand)]
pub enum DeviceCommands {
    /// Add a device, replacing any device with the same id
    Add {
        #[arg(long)]
        number: String,
        /// Defaults to the account's next free device id
        #[arg(long)]
        id: Option<DeviceId>,
        #[arg(long)]
        inactive: bool,
        /// Unix millis; defaults to now
        #[arg(long)]
        last_seen: Option<u64>,
        #[arg(long)]
        unidentified_delivery: bool,
    },
    Remove {
        #[arg(long)]
        number: String,
        #[arg(long)]
        id: DeviceId,
    },
    List {
        #[arg(long)]
        number: String,
    },
    /// Print the id the next provisioned device would get
    NextId {
        #[arg(long)]
        number: String,
    },
}

pub fn handle_device_command(cmd: DeviceCommands, store: &mut AccountStore) -> Result<()> {
    match cmd {
        DeviceCommands::Add { number, id, inactive, last_seen, unidentified_delivery } => {
            let account = find_mut(store, &number)?;
            let id = id.unwrap_or_else(|| account.next_device_id());
            let last_seen = last_seen.unwrap_or_else(current_timestamp);

            account.add_device(
                Device::new(id)
                    .with_active(!inactive)
                    .with_last_seen(last_seen)
                    .with_unauthenticated_delivery(unidentified_delivery),
            );
            store.save(&number)?;
            info!("Added device {} to {}", id, number);
            println!("Device {} added to '{}'.", id, number);
        }
        DeviceCommands::Remove { number, id } => {
            let account = find_mut(store, &number)?;
            if account.remove_device(id).is_some() {
                store.save(&number)?;
                info!("Removed device {} from {}", id, number);
                println!("Device {} removed from '{}'.", id, number);
            } else {
                println!("Device {} not registered on '{}'.", id, number);
            }
        }
        DeviceCommands::List { number } => {
            let account = find(store, &number)?;
            for device in account.devices() {
                println!(
                    "Device: {}\tActive: {}\tLast seen: {}\tUnidentified delivery: {}{}",
                    device.id(),
                    device.is_active(),
                    device.last_seen,
                    device.is_unauthenticated_delivery_supported(),
                    if device.is_master() { "\t(master)" } else { "" }
                );
            }
        }
        DeviceCommands::NextId { number } => {
            println!("{}", find(store, &number)?.next_device_id());
        }
    }
    Ok(())
}
