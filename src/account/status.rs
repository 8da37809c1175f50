//! Derived account status

use super::device::{DeviceId, MASTER_ID};
use super::types::Account;

/// How recently an account must have been seen to count as active
pub const ACTIVE_WINDOW_DAYS: u64 = 365;

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

impl Account {
    /// Whether the account is alive as of now
    pub fn is_active(&self) -> bool {
        self.is_active_at(current_timestamp())
    }

    /// Whether the account is alive as of `now` (unix millis).
    ///
    /// Requires an active master device and overall activity within the
    /// last [`ACTIVE_WINDOW_DAYS`].
    pub fn is_active_at(&self, now: u64) -> bool {
        match self.master_device() {
            Some(master) if master.is_active() => {
                self.last_seen() > now.saturating_sub(ACTIVE_WINDOW_DAYS * MILLIS_PER_DAY)
            }
            _ => false,
        }
    }

    /// Most recent activity across all devices, active or not; 0 when empty
    pub fn last_seen(&self) -> u64 {
        self.devices().map(|d| d.last_seen).max().unwrap_or(0)
    }

    pub fn active_device_count(&self) -> usize {
        self.devices().filter(|d| d.is_active()).count()
    }

    /// Identifier to hand to the next provisioned device.
    ///
    /// The lowest inactive identifier is recycled first. Otherwise one past
    /// the highest identifier in use, never below the master identifier.
    /// If the highest identifier is `DeviceId::MAX`, the lowest unused
    /// identifier above the master is handed out instead.
    /// Active identifiers are never handed out.
    pub fn next_device_id(&self) -> DeviceId {
        if let Some(inactive) = self.devices().find(|d| !d.is_active()) {
            return inactive.id();
        }

        self.devices()
            .map(|d| d.id())
            .fold(MASTER_ID, DeviceId::max)
            .checked_add(1)
            .unwrap_or_else(|| self.lowest_unused_device_id())
    }

    // A device map can never fill the id space, so a gap always exists.
    fn lowest_unused_device_id(&self) -> DeviceId {
        (MASTER_ID + 1..=DeviceId::MAX)
            .find(|id| self.device(*id).is_none())
            .unwrap_or(MASTER_ID)
    }

    /// True iff every active device accepts unidentified delivery.
    ///
    /// Holds vacuously when no device is active.
    pub fn is_unauthenticated_delivery_supported(&self) -> bool {
        self.devices()
            .filter(|d| d.is_active())
            .all(|d| d.is_unauthenticated_delivery_supported())
    }
}

pub(crate) fn current_timestamp() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::device::Device;

    const NOW: u64 = 1_700_000_000_000;

    fn account(devices: Vec<Device>) -> Account {
        Account::with_devices("+14151111111", devices, None)
    }

    #[test]
    fn test_last_seen() {
        assert_eq!(account(vec![]).last_seen(), 0);

        let a = account(vec![
            Device::new(1).with_last_seen(100),
            Device::new(2).with_last_seen(200).with_active(false),
        ]);
        assert_eq!(a.last_seen(), 200);
    }

    #[test]
    fn test_last_seen_only_grows_on_add() {
        let mut a = account(vec![Device::new(1).with_last_seen(500)]);
        a.add_device(Device::new(2).with_last_seen(100));
        assert_eq!(a.last_seen(), 500);
        a.add_device(Device::new(3).with_last_seen(700));
        assert_eq!(a.last_seen(), 700);
    }

    #[test]
    fn test_active_device_count() {
        let a = account(vec![
            Device::new(1),
            Device::new(2),
            Device::new(3).with_active(false),
        ]);
        assert_eq!(a.active_device_count(), 2);
        assert_eq!(account(vec![]).active_device_count(), 0);
    }

    #[test]
    fn test_is_active_requires_master() {
        let a = account(vec![Device::new(2).with_last_seen(NOW)]);
        assert!(!a.is_active_at(NOW));
        assert!(!account(vec![]).is_active_at(NOW));
    }

    #[test]
    fn test_is_active_requires_active_master() {
        let a = account(vec![
            Device::new(1).with_active(false).with_last_seen(NOW),
            Device::new(2).with_last_seen(NOW),
        ]);
        assert!(!a.is_active_at(NOW));
    }

    #[test]
    fn test_is_active_window() {
        let window = ACTIVE_WINDOW_DAYS * MILLIS_PER_DAY;

        let recent = account(vec![Device::new(1).with_last_seen(NOW - window + 1)]);
        assert!(recent.is_active_at(NOW));

        let dormant = account(vec![Device::new(1).with_last_seen(NOW - window)]);
        assert!(!dormant.is_active_at(NOW));
    }

    #[test]
    fn test_is_active_uses_any_device_last_seen() {
        let a = account(vec![
            Device::new(1).with_last_seen(0),
            Device::new(2).with_active(false).with_last_seen(NOW),
        ]);
        assert!(a.is_active_at(NOW));
    }

    #[test]
    fn test_is_active_now() {
        let a = account(vec![Device::new(1).with_last_seen(current_timestamp())]);
        assert!(a.is_active());
    }

    #[test]
    fn test_next_device_id_reuses_inactive() {
        let a = account(vec![
            Device::new(1),
            Device::new(2).with_active(false),
            Device::new(3),
        ]);
        assert_eq!(a.next_device_id(), 2);
    }

    #[test]
    fn test_next_device_id_lowest_inactive_wins() {
        let a = account(vec![
            Device::new(1),
            Device::new(5).with_active(false),
            Device::new(3).with_active(false),
            Device::new(4),
        ]);
        assert_eq!(a.next_device_id(), 3);
    }

    #[test]
    fn test_next_device_id_grows() {
        let a = account(vec![Device::new(1), Device::new(2)]);
        assert_eq!(a.next_device_id(), 3);

        let sparse = account(vec![Device::new(1), Device::new(7)]);
        assert_eq!(sparse.next_device_id(), 8);
    }

    #[test]
    fn test_next_device_id_max_id() {
        let a = account(vec![Device::new(1), Device::new(DeviceId::MAX)]);
        assert_eq!(a.next_device_id(), 2);

        let crowded = account(vec![
            Device::new(1),
            Device::new(2),
            Device::new(3),
            Device::new(DeviceId::MAX),
        ]);
        assert_eq!(crowded.next_device_id(), 4);
    }

    #[test]
    fn test_next_device_id_max_id_from_json() {
        let json = r#"{"number":"+1","devices":[
            {"id":1,"active":true,"lastSeen":0,"unidentifiedDelivery":false},
            {"id":18446744073709551615,"active":true,"lastSeen":0,"unidentifiedDelivery":false}
        ]}"#;
        let a: Account = serde_json::from_str(json).unwrap();
        assert_eq!(a.next_device_id(), 2);
    }

    #[test]
    fn test_next_device_id_floor() {
        assert_eq!(account(vec![]).next_device_id(), MASTER_ID + 1);
    }

    #[test]
    fn test_unauthenticated_delivery() {
        assert!(account(vec![]).is_unauthenticated_delivery_supported());

        let mixed = account(vec![
            Device::new(1).with_unauthenticated_delivery(true),
            Device::new(2),
        ]);
        assert!(!mixed.is_unauthenticated_delivery_supported());

        let inactive_excluded = account(vec![
            Device::new(1).with_unauthenticated_delivery(true),
            Device::new(2).with_active(false),
        ]);
        assert!(inactive_excluded.is_unauthenticated_delivery_supported());

        let all_inactive = account(vec![Device::new(1).with_active(false)]);
        assert!(all_inactive.is_unauthenticated_delivery_supported());
    }
}
