use clap::Subcommand;
use tracing::info;

use super::parse_hex_key;
use crate::account::{Account, AccountStore, DeliveryPolicy};
use crate::error::{AccountError, Result};

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Register a new account with no devices
    Create {
        #[arg(long)]
        number: String,
        #[arg(long)]
        identity_key: Option<String>,
        /// Unidentified access key, hex
        #[arg(long)]
        uak: Option<String>,
    },
    /// Print an account and its derived status
    Show {
        #[arg(long)]
        number: String,
    },
    List,
    Delete {
        #[arg(long)]
        number: String,
    },
    SetProfile {
        #[arg(long)]
        number: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
        #[arg(long)]
        avatar_digest: Option<String>,
        #[arg(long)]
        pin: Option<String>,
    },
    /// Change unidentified delivery settings
    SetAccess {
        #[arg(long)]
        number: String,
        /// New access key, hex
        #[arg(long, conflicts_with = "clear_uak")]
        uak: Option<String>,
        #[arg(long)]
        clear_uak: bool,
        #[arg(long)]
        unrestricted: Option<bool>,
    },
    /// Print the JSON record of an account
    Export {
        #[arg(long)]
        number: String,
    },
    /// Create or replace an account from a JSON record file
    Import {
        #[arg(long)]
        file: String,
    },
}

pub fn handle_account_command(
    cmd: AccountCommands,
    store: &mut AccountStore,
    policy: &dyn DeliveryPolicy,
) -> Result<()> {
    match cmd {
        AccountCommands::Create { number, identity_key, uak } => {
            let uak = uak.as_deref().map(parse_hex_key).transpose()?;
            let mut account = Account::with_devices(number, Vec::new(), uak);
            account.set_identity_key(identity_key);
            let account = store.create_account(account)?;
            println!("Account '{}' created.", account.number());
        }
        AccountCommands::Show { number } => {
            let account = find(store, &number)?;
            println!("{}", serde_json::to_string_pretty(account)?);
            print!("{}", status_report(account, policy));
        }
        AccountCommands::List => {
            for number in store.account_numbers() {
                if let Some(account) = store.get(&number) {
                    println!(
                        "Account: {}\tDevices: {}\tActive: {}",
                        number,
                        account.device_count(),
                        account.is_active()
                    );
                }
            }
        }
        AccountCommands::Delete { number } => {
            store.remove(&number)?;
            println!("Account '{}' deleted.", number);
        }
        AccountCommands::SetProfile { number, name, avatar, avatar_digest, pin } => {
            let account = find_mut(store, &number)?;
            if name.is_some() {
                account.set_profile_name(name);
            }
            if avatar.is_some() {
                account.set_avatar(avatar);
            }
            if avatar_digest.is_some() {
                account.set_avatar_digest(avatar_digest);
            }
            if pin.is_some() {
                account.set_pin(pin);
            }
            store.save(&number)?;
            info!("Updated profile of {}", number);
        }
        AccountCommands::SetAccess { number, uak, clear_uak, unrestricted } => {
            let uak = uak.as_deref().map(parse_hex_key).transpose()?;
            let account = find_mut(store, &number)?;
            if clear_uak {
                account.set_unidentified_access_key(None);
            } else if uak.is_some() {
                account.set_unidentified_access_key(uak);
            }
            if let Some(unrestricted) = unrestricted {
                account.set_unrestricted_unidentified_access(unrestricted);
            }
            store.save(&number)?;
            info!("Updated unidentified access of {}", number);
        }
        AccountCommands::Export { number } => {
            let account = find(store, &number)?;
            println!("{}", serde_json::to_string(account)?);
        }
        AccountCommands::Import { file } => {
            let data = std::fs::read_to_string(&file)?;
            let account: Account = serde_json::from_str(&data)?;
            if account.number().is_empty() {
                return Err(AccountError::InvalidInput(format!("{} has no account number", file)));
            }
            let number = account.number().to_string();
            store.update(account)?;
            println!("Account '{}' imported from {}.", number, file);
        }
    }
    Ok(())
}

pub(super) fn find<'a>(store: &'a AccountStore, number: &str) -> Result<&'a Account> {
    store
        .get(number)
        .ok_or_else(|| AccountError::AccountNotFound(number.to_string()))
}

pub(super) fn find_mut<'a>(store: &'a mut AccountStore, number: &str) -> Result<&'a mut Account> {
    store
        .get_mut(number)
        .ok_or_else(|| AccountError::AccountNotFound(number.to_string()))
}

fn status_report(account: &Account, policy: &dyn DeliveryPolicy) -> String {
    let lines = [
        ("Active", account.is_active().to_string()),
        ("Last seen", account.last_seen().to_string()),
        ("Active devices", account.active_device_count().to_string()),
        ("Next device id", account.next_device_id().to_string()),
        (
            "Unidentified delivery",
            account.is_unauthenticated_delivery_supported().to_string(),
        ),
        ("Rate limited", policy.is_rate_limited(account).to_string()),
        (
            "Relay",
            policy.relay(account).unwrap_or_else(|| "local".to_string()),
        ),
    ];
    lines
        .iter()
        .map(|(label, value)| format!("{:<28}{}\n", format!("{}:", label), value))
        .collect()
}
