//! Account storage and management

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::types::{Account, AccountNumber};
use crate::error::{AccountError, Result};
use crate::storage::Storage;

/// Registry of accounts keyed by number.
///
/// Each mutation goes through `&mut self`, so one caller owns the registry at
/// a time; share it behind a lock when several request handlers need it.
pub struct AccountStore {
    accounts: HashMap<AccountNumber, Account>,
    storage: Option<Arc<Storage>>,
}

impl AccountStore {
    /// Create a new empty account store
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            storage: None,
        }
    }

    /// Create with storage backend, loading every persisted account
    pub fn with_storage(storage: Arc<Storage>) -> Result<Self> {
        let accounts: HashMap<_, _> = storage
            .load_accounts()?
            .into_iter()
            .map(|a| (a.number().to_string(), a))
            .collect();
        info!("Persistence: loaded {} accounts", accounts.len());

        Ok(Self {
            accounts,
            storage: Some(storage),
        })
    }

    /// Register a new account
    pub fn create_account(&mut self, account: Account) -> Result<&Account> {
        let number = account.number().to_string();
        if number.is_empty() {
            return Err(AccountError::InvalidInput("account number is empty".to_string()));
        }
        if self.accounts.contains_key(&number) {
            return Err(AccountError::AccountAlreadyExists(number));
        }

        self.persist(&account)?;
        info!("Created account {} with {} devices", number, account.device_count());
        Ok(&*self.accounts.entry(number).or_insert(account))
    }

    pub fn get(&self, number: &str) -> Option<&Account> {
        self.accounts.get(number)
    }

    /// Changes made through the returned reference are kept in memory
    /// until [`AccountStore::save`] is called.
    pub fn get_mut(&mut self, number: &str) -> Option<&mut Account> {
        self.accounts.get_mut(number)
    }

    pub fn contains(&self, number: &str) -> bool {
        self.accounts.contains_key(number)
    }

    /// Insert or replace an account and persist it
    pub fn update(&mut self, account: Account) -> Result<()> {
        self.persist(&account)?;
        debug!("Updated account {}", account.number());
        self.accounts.insert(account.number().to_string(), account);
        Ok(())
    }

    /// Persist the in-memory state of one account
    pub fn save(&self, number: &str) -> Result<()> {
        let account = self
            .accounts
            .get(number)
            .ok_or_else(|| AccountError::AccountNotFound(number.to_string()))?;
        self.persist(account)
    }

    /// Delete an account from storage, then from memory. A storage failure
    /// leaves the in-memory account in place.
    pub fn remove(&mut self, number: &str) -> Result<Account> {
        if !self.accounts.contains_key(number) {
            return Err(AccountError::AccountNotFound(number.to_string()));
        }

        if let Some(storage) = &self.storage {
            storage.delete_account(number)?;
            storage.flush()?;
        }

        let account = self
            .accounts
            .remove(number)
            .ok_or_else(|| AccountError::AccountNotFound(number.to_string()))?;
        info!("Removed account {}", number);
        Ok(account)
    }

    /// Get all accounts
    pub fn all_accounts(&self) -> Vec<&Account> {
        self.accounts.values().collect()
    }

    /// All account numbers, sorted
    pub fn account_numbers(&self) -> Vec<String> {
        let mut numbers: Vec<String> = self.accounts.keys().cloned().collect();
        numbers.sort();
        numbers
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn persist(&self, account: &Account) -> Result<()> {
        if let Some(storage) = &self.storage {
            storage.save_account(account)?;
            storage.flush()?;
        }
        Ok(())
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Device;

    fn account(number: &str) -> Account {
        Account::with_devices(number, vec![Device::new(1).with_last_seen(10)], None)
    }

    #[test]
    fn test_create_account() {
        let mut store = AccountStore::new();

        let created = store.create_account(account("+14150000001")).unwrap();
        assert_eq!(created.number(), "+14150000001");
        assert!(store.contains("+14150000001"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_create_duplicate_rejected() {
        let mut store = AccountStore::new();
        store.create_account(account("+14150000001")).unwrap();

        let err = store.create_account(account("+14150000001")).unwrap_err();
        assert!(matches!(err, AccountError::AccountAlreadyExists(n) if n == "+14150000001"));
    }

    #[test]
    fn test_create_empty_number_rejected() {
        let mut store = AccountStore::new();
        let err = store.create_account(Account::new()).unwrap_err();
        assert!(matches!(err, AccountError::InvalidInput(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_missing() {
        let mut store = AccountStore::new();
        assert!(matches!(
            store.remove("+1"),
            Err(AccountError::AccountNotFound(_))
        ));
        assert!(matches!(store.save("+1"), Err(AccountError::AccountNotFound(_))));
    }

    #[test]
    fn test_remove_missing_leaves_storage_untouched() {
        let storage = Arc::new(Storage::temporary().unwrap());
        storage.save_account(&account("+14150000009")).unwrap();
        let mut store = AccountStore::new();
        store.storage = Some(storage.clone());

        assert!(matches!(
            store.remove("+14150000009"),
            Err(AccountError::AccountNotFound(_))
        ));
        assert!(storage.get_account("+14150000009").unwrap().is_some());
    }

    #[test]
    fn test_remove_deletes_from_storage_and_memory() {
        let storage = Arc::new(Storage::temporary().unwrap());
        let mut store = AccountStore::with_storage(storage.clone()).unwrap();
        store.create_account(account("+14150000001")).unwrap();

        let removed = store.remove("+14150000001").unwrap();
        assert_eq!(removed.number(), "+14150000001");
        assert!(!store.contains("+14150000001"));
        assert!(storage.get_account("+14150000001").unwrap().is_none());
    }

    #[test]
    fn test_account_numbers_sorted() {
        let mut store = AccountStore::new();
        store.create_account(account("+3")).unwrap();
        store.create_account(account("+1")).unwrap();
        store.create_account(account("+2")).unwrap();

        assert_eq!(store.account_numbers(), vec!["+1", "+2", "+3"]);
        assert_eq!(store.all_accounts().len(), 3);
    }

    #[test]
    fn test_persisted_across_reload() {
        let storage = Arc::new(Storage::temporary().unwrap());

        let mut store = AccountStore::with_storage(storage.clone()).unwrap();
        store.create_account(account("+14150000001")).unwrap();
        store.create_account(account("+14150000002")).unwrap();

        store
            .get_mut("+14150000001")
            .unwrap()
            .add_device(Device::new(2).with_unauthenticated_delivery(true));
        store.save("+14150000001").unwrap();
        store.remove("+14150000002").unwrap();

        let reloaded = AccountStore::with_storage(storage).unwrap();
        assert_eq!(reloaded.account_numbers(), vec!["+14150000001"]);
        let account = reloaded.get("+14150000001").unwrap();
        assert_eq!(account.device_count(), 2);
        assert!(account.device(2).unwrap().is_unauthenticated_delivery_supported());
    }

    #[test]
    fn test_unsaved_changes_not_persisted() {
        let storage = Arc::new(Storage::temporary().unwrap());
        let mut store = AccountStore::with_storage(storage.clone()).unwrap();
        store.create_account(account("+14150000001")).unwrap();

        store.get_mut("+14150000001").unwrap().remove_device(1);

        let reloaded = AccountStore::with_storage(storage).unwrap();
        assert_eq!(reloaded.get("+14150000001").unwrap().device_count(), 1);
    }

    #[test]
    fn test_update_upserts() {
        let storage = Arc::new(Storage::temporary().unwrap());
        let mut store = AccountStore::with_storage(storage.clone()).unwrap();

        let mut a = account("+14150000001");
        store.update(a.clone()).unwrap();
        a.set_profile_name(Some("renamed".to_string()));
        store.update(a).unwrap();

        assert_eq!(store.len(), 1);
        let stored = storage.get_account("+14150000001").unwrap().unwrap();
        assert_eq!(stored.profile_name(), Some("renamed"));
    }
}
