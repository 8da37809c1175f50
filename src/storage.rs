use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::account::Account;
use crate::error::Result;

/// Bumped whenever the stored account layout changes. Records written under
/// another version are not read back.
pub const ACCOUNT_RECORD_VERSION: u32 = 5;

pub struct Storage {
    db: sled::Db,
}

impl Storage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(Storage { db })
    }

    /// In-memory database discarded on drop
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Storage { db })
    }

    // Generic Helper: Put
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let serialized = bincode::serialize(value)?;
        self.db.insert(key.as_bytes(), serialized)?;
        Ok(())
    }

    // Generic Helper: Get
    pub fn get<T: for<'a> Deserialize<'a>>(&self, key: &str) -> Result<Option<T>> {
        match self.db.get(key.as_bytes())? {
            Some(data) => Ok(Some(bincode::deserialize(&data)?)),
            None => Ok(None),
        }
    }

    pub fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.db.remove(key.as_bytes())?.is_some())
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    // --- Accounts ---

    pub fn save_account(&self, account: &Account) -> Result<()> {
        self.put(&account_key(account.number()), account)
    }

    pub fn get_account(&self, number: &str) -> Result<Option<Account>> {
        self.get(&account_key(number))
    }

    pub fn delete_account(&self, number: &str) -> Result<bool> {
        self.delete(&account_key(number))
    }

    /// Every account stored under the current record version
    pub fn load_accounts(&self) -> Result<Vec<Account>> {
        let mut accounts = Vec::new();
        for entry in self.db.scan_prefix(account_prefix().as_bytes()) {
            let (_, data) = entry?;
            accounts.push(bincode::deserialize(&data)?);
        }
        Ok(accounts)
    }
}

fn account_prefix() -> String {
    format!("account:v{}:", ACCOUNT_RECORD_VERSION)
}

fn account_key(number: &str) -> String {
    format!("{}{}", account_prefix(), number)
}
