//! Device records as seen by the account layer

use serde::{Deserialize, Serialize};

/// Numeric device identifier, unique within one account
pub type DeviceId = u64;

/// Reserved identifier of the master device
pub const MASTER_ID: DeviceId = 1;

/// One registered client of an account.
///
/// Credentials and push tokens are owned elsewhere; this is only the part of
/// a device the account queries depend on. The identifier is fixed at
/// construction because the account indexes devices by it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    id: DeviceId,
    pub active: bool,
    /// Last observed activity, unix millis
    pub last_seen: u64,
    #[serde(rename = "unidentifiedDelivery")]
    pub unauthenticated_delivery_supported: bool,
}

impl Device {
    /// Create an active device that was never seen and lacks unidentified delivery
    pub fn new(id: DeviceId) -> Self {
        Self {
            id,
            active: true,
            last_seen: 0,
            unauthenticated_delivery_supported: false,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_last_seen(mut self, last_seen: u64) -> Self {
        self.last_seen = last_seen;
        self
    }

    pub fn with_unauthenticated_delivery(mut self, supported: bool) -> Self {
        self.unauthenticated_delivery_supported = supported;
        self
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn is_master(&self) -> bool {
        self.id == MASTER_ID
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_unauthenticated_delivery_supported(&self) -> bool {
        self.unauthenticated_delivery_supported
    }

    /// Record activity at `timestamp`; older timestamps are ignored
    pub fn touch(&mut self, timestamp: u64) {
        self.last_seen = self.last_seen.max(timestamp);
    }
}
