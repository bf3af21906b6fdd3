use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;
use crate::persistence::DEFAULT_KEY_PREFIX;

/// Settings for opening a store, parsed from the JSON handed to `create_store`.
///
/// Every field is optional in that JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// LMDB path without the `.lmdb` suffix.
    pub path: String,
    pub key_prefix: String,
    /// LMDB map size in bytes.
    pub map_size: usize,
    pub admin_password: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "kreasibooth".to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            map_size: 10 * 1024 * 1024,
            admin_password: "admin123".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn from_json(json: &str) -> Result<Self, AppResponse> {
        let config: StoreConfig = serde_json::from_str(json)?;
        if config.path.trim().is_empty() {
            return Err(AppResponse::ValidationError("Store path cannot be empty".to_string()));
        }
        if config.map_size == 0 {
            return Err(AppResponse::ValidationError("map_size must be positive".to_string()));
        }
        Ok(config)
    }
}
