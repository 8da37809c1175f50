pub mod account; // subscriber accounts and their devices
pub mod cli;
pub mod config;
pub mod encoding;
pub mod error;
pub mod storage;

pub use account::{Account, AccountStore, AuthenticatedAccount, Device, DeviceId};
pub use error::{AccountError, Result};
