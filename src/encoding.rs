//! Serde helpers for account records.
//!
//! Use with `#[serde(with = "...")]` on the fields they describe.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Optional opaque bytes carried as a standard base64 string
pub mod base64_opt {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine};

    pub fn serialize<S>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        bytes
            .as_ref()
            .map(|b| STANDARD.encode(b))
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|s| STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Device map carried as a plain sequence of devices.
///
/// Duplicate identifiers in the input collapse to the last occurrence.
pub mod device_set {
    use super::*;
    use crate::account::device::{Device, DeviceId};
    use std::collections::BTreeMap;

    pub fn serialize<S>(devices: &BTreeMap<DeviceId, Device>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(devices.values())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<DeviceId, Device>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let devices: Vec<Device> = Vec::deserialize(deserializer)?;
        Ok(devices.into_iter().map(|d| (d.id(), d)).collect())
    }
}
