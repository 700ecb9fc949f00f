//! Registration record data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Kind of wallet that owns a registered address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletType {
    /// EVM-compatible wallet; ownership proven with personal-message signatures
    #[serde(rename = "EVM")]
    Evm,
    /// Movement wallet; ownership proven with an Ed25519 signature when supplied
    #[serde(rename = "Movement")]
    Movement,
}

impl WalletType {
    /// Wire name of the wallet type.
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletType::Evm => "EVM",
            WalletType::Movement => "Movement",
        }
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EVM" => Ok(WalletType::Evm),
            "Movement" => Ok(WalletType::Movement),
            other => Err(anyhow::anyhow!("Unknown wallet type: {}", other)),
        }
    }
}

/// A registered wallet address.
///
/// Serialized as `{"walletType", "address", "timestamp", "verified"}`; records
/// written before `verified` existed load with `verified = false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    /// Wallet kind
    pub wallet_type: WalletType,
    /// Address exactly as submitted by the client
    pub address: String,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: u64,
    /// Whether ownership of the address was cryptographically proven
    #[serde(default)]
    pub verified: bool,
}

impl RegistrationRecord {
    /// Creates a record stamped with the current time.
    pub fn new(wallet_type: WalletType, address: impl Into<String>, verified: bool) -> Self {
        Self {
            wallet_type,
            address: address.into(),
            timestamp: current_timestamp_ms(),
            verified,
        }
    }

    /// Whether this record is for `address`, ignoring ASCII case.
    pub fn matches_address(&self, address: &str) -> bool {
        self.address.eq_ignore_ascii_case(address)
    }
}

/// Current time in milliseconds since the Unix epoch.
pub fn current_timestamp_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}
