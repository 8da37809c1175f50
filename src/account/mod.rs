//! Account System Module
//!
//! This module implements the subscriber account model with:
//! - Devices indexed by identifier, device 1 being the master device
//! - Derived liveness and device-id allocation
//! - Unidentified delivery checks
//! - Request-scoped authentication context
//! - Persistent account registry

pub mod access;
pub mod auth;
pub mod device;
pub mod policy;
pub mod status;
pub mod store;
pub mod types;

pub use auth::{AccountPrincipal, AuthenticatedAccount, Principal, Subject};
pub use device::{Device, DeviceId, MASTER_ID};
pub use policy::{DefaultDeliveryPolicy, DeliveryPolicy};
pub use status::ACTIVE_WINDOW_DAYS;
pub use store::AccountStore;
pub use types::{Account, AccountNumber};
