use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account whose key material is available in secure storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAccount {
    /// Hex address, any casing.
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl StoredAccount {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            created_at: None,
        }
    }

    /// True when `address` refers to this account, ignoring checksum casing.
    pub fn matches(&self, address: &str) -> bool {
        normalize_address(&self.address) == normalize_address(address)
    }
}

/// Lowercases a hex address and ensures the `0x` prefix.
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    format!("0x{}", body.to_ascii_lowercase())
}
