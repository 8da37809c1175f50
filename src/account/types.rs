//! Account entity and device collection management

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::device::{Device, DeviceId, MASTER_ID};

/// Account identifier - phone-number-like string
pub type AccountNumber = String;

/// One subscriber: registration state plus its devices.
///
/// Devices are indexed by identifier, so at most one device per identifier
/// can exist. The per-request authenticated device is deliberately not part
/// of this record; see [`super::auth::AuthenticatedAccount`].
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    number: AccountNumber,

    #[serde(with = "crate::encoding::device_set")]
    devices: BTreeMap<DeviceId, Device>,

    identity_key: Option<String>,

    // Profile
    #[serde(rename = "name")]
    profile_name: Option<String>,
    avatar: Option<String>,
    avatar_digest: Option<String>,

    // Registration lock
    pin: Option<String>,

    // Unidentified delivery
    #[serde(rename = "uak", with = "crate::encoding::base64_opt")]
    unidentified_access_key: Option<Vec<u8>>,
    #[serde(rename = "uua")]
    unrestricted_unidentified_access: bool,
}

impl Account {
    /// Create an empty account
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pre-populated account
    pub fn with_devices(
        number: impl Into<AccountNumber>,
        devices: impl IntoIterator<Item = Device>,
        unidentified_access_key: Option<Vec<u8>>,
    ) -> Self {
        let mut account = Self {
            number: number.into(),
            unidentified_access_key,
            ..Self::default()
        };
        for device in devices {
            account.add_device(device);
        }
        account
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn set_number(&mut self, number: impl Into<AccountNumber>) {
        self.number = number.into();
    }

    // --- Devices ---

    /// Insert `device`, replacing any device with the same identifier
    pub fn add_device(&mut self, device: Device) {
        let id = device.id();
        if self.devices.insert(id, device).is_some() {
            tracing::debug!("Account {}: replaced device {}", self.number, id);
        }
    }

    /// Remove the device with `device_id`; absent identifiers are ignored
    pub fn remove_device(&mut self, device_id: DeviceId) -> Option<Device> {
        let removed = self.devices.remove(&device_id);
        if removed.is_some() {
            tracing::debug!("Account {}: removed device {}", self.number, device_id);
        }
        removed
    }

    pub fn device(&self, device_id: DeviceId) -> Option<&Device> {
        self.devices.get(&device_id)
    }

    pub fn device_mut(&mut self, device_id: DeviceId) -> Option<&mut Device> {
        self.devices.get_mut(&device_id)
    }

    /// The device holding the reserved master identifier, if registered
    pub fn master_device(&self) -> Option<&Device> {
        self.device(MASTER_ID)
    }

    /// Devices in ascending identifier order
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn devices_mut(&mut self) -> impl Iterator<Item = &mut Device> {
        self.devices.values_mut()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    // --- Identity & profile ---

    pub fn identity_key(&self) -> Option<&str> {
        self.identity_key.as_deref()
    }

    pub fn set_identity_key(&mut self, identity_key: Option<String>) {
        self.identity_key = identity_key;
    }

    pub fn profile_name(&self) -> Option<&str> {
        self.profile_name.as_deref()
    }

    pub fn set_profile_name(&mut self, name: Option<String>) {
        self.profile_name = name;
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn set_avatar(&mut self, avatar: Option<String>) {
        self.avatar = avatar;
    }

    pub fn avatar_digest(&self) -> Option<&str> {
        self.avatar_digest.as_deref()
    }

    pub fn set_avatar_digest(&mut self, avatar_digest: Option<String>) {
        self.avatar_digest = avatar_digest;
    }

    pub fn pin(&self) -> Option<&str> {
        self.pin.as_deref()
    }

    pub fn set_pin(&mut self, pin: Option<String>) {
        self.pin = pin;
    }

    // --- Unidentified access ---

    pub fn unidentified_access_key(&self) -> Option<&[u8]> {
        self.unidentified_access_key.as_deref()
    }

    pub fn set_unidentified_access_key(&mut self, key: Option<Vec<u8>>) {
        self.unidentified_access_key = key;
    }

    pub fn is_unrestricted_unidentified_access(&self) -> bool {
        self.unrestricted_unidentified_access
    }

    pub fn set_unrestricted_unidentified_access(&mut self, unrestricted: bool) {
        self.unrestricted_unidentified_access = unrestricted;
    }
}
