//! Unidentified (sealed-sender style) access checks

use subtle::ConstantTimeEq;

use super::types::Account;

impl Account {
    /// Check an access key presented by an unauthenticated sender.
    ///
    /// Unrestricted accounts accept any caller. Otherwise the presented key
    /// must match the account's key, compared in constant time.
    pub fn verify_unidentified_access(&self, presented: Option<&[u8]>) -> bool {
        if self.is_unrestricted_unidentified_access() {
            return true;
        }

        match (self.unidentified_access_key(), presented) {
            (Some(expected), Some(presented)) => expected.ct_eq(presented).into(),
            _ => false,
        }
    }
}
