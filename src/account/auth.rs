//! Authentication context for accounts
//!
//! The device that authenticated a request belongs to the request, not to the
//! stored account, so it is carried next to the account here and never
//! serialized with it.

use std::marker::PhantomData;

use super::device::{Device, DeviceId};
use super::types::Account;

/// An account loaded for one request, plus the device that authenticated it
#[derive(Clone, Debug)]
pub struct AuthenticatedAccount {
    account: Account,
    authenticated_device: Option<Device>,
}

impl AuthenticatedAccount {
    /// Wrap `account` with no authenticated device yet
    pub fn new(account: Account) -> Self {
        Self {
            account,
            authenticated_device: None,
        }
    }

    /// Wrap `account` for a request authenticated by `device_id`.
    ///
    /// Returns `None` when the account has no such device.
    pub fn for_device(account: Account, device_id: DeviceId) -> Option<Self> {
        let device = account.device(device_id)?.clone();
        Some(Self {
            account,
            authenticated_device: Some(device),
        })
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn account_mut(&mut self) -> &mut Account {
        &mut self.account
    }

    pub fn into_account(self) -> Account {
        self.account
    }

    pub fn authenticated_device(&self) -> Option<&Device> {
        self.authenticated_device.as_ref()
    }

    /// Attach the verified device. Not checked against the account's devices.
    pub fn set_authenticated_device(&mut self, device: Device) {
        if let Some(previous) = &self.authenticated_device {
            tracing::warn!(
                "Account {}: authenticated device {} replaced by {}",
                self.account.number(),
                previous.id(),
                device.id()
            );
        }
        self.authenticated_device = Some(device);
    }

    /// Whether the request came from the master device
    pub fn is_master_request(&self) -> bool {
        self.authenticated_device
            .as_ref()
            .is_some_and(Device::is_master)
    }
}

/// Set of credential subjects presented to generic authorization plumbing
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Subject {
    pub principals: Vec<String>,
}

/// Something generic authentication plumbing can carry as an identity
pub trait Principal {
    /// Display name, if the principal discloses one
    fn name(&self) -> Option<&str>;

    /// Whether this principal vouches for `subject`
    fn implies(&self, subject: &Subject) -> bool;
}

/// Principal view of an account that discloses nothing.
///
/// Accounts travel through authentication plumbing as opaque tokens: no name
/// is reported and no subject is ever vouched for.
#[derive(Clone, Copy, Debug)]
pub struct AccountPrincipal<'a> {
    _account: PhantomData<&'a Account>,
}

impl Principal for AccountPrincipal<'_> {
    fn name(&self) -> Option<&str> {
        None
    }

    fn implies(&self, _subject: &Subject) -> bool {
        false
    }
}

impl Account {
    pub fn as_principal(&self) -> AccountPrincipal<'_> {
        AccountPrincipal {
            _account: PhantomData,
        }
    }
}

impl AuthenticatedAccount {
    pub fn as_principal(&self) -> AccountPrincipal<'_> {
        self.account.as_principal()
    }
}
