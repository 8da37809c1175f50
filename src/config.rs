use serde::{Deserialize, Serialize};

use crate::error::{AccountError, Result};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AccountsConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_db_path() -> String {
    "./data/accounts".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            storage: StorageConfig::default(),
        }
    }
}

impl AccountsConfig {
    pub fn load(path: &str) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        toml::from_str(&s).map_err(|e| AccountError::ConfigError(e.to_string()))
    }

    // Runs before logging is set up, hence eprintln.
    pub fn load_or_default(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            match Self::load(path) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error loading config {}: {}. Using defaults.", path, e);
                    Self::default()
                }
            }
        } else {
            eprintln!("Config file not found at '{}'. Creating default.", path);
            let config = Self::default();
            if let Ok(s) = toml::to_string_pretty(&config) {
                let _ = std::fs::write(path, s);
            }
            config
        }
    }
}
