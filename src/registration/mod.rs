//! Wallet Registration Module
//!
//! This module implements the registration flow behind `POST /register`:
//!
//! 1. Shape validation - `walletType` and `address` must be present
//! 2. Ownership verification - signatures must recover (or verify) to the claimed address
//! 3. Duplicate check - an address may be registered once, ignoring case
//! 4. Append - a timestamped record is written to the store
//!
//! Steps 3 and 4 run as one insert-if-absent operation on the [`RegistrationLedger`].

mod verify;

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{RegistryConfig, StoreBackend};
use crate::storage::{
    InsertOutcome, JsonFileStore, MemoryStore, RecordStore, RegistrationLedger, RegistrationRecord,
    WalletType,
};

pub use verify::{verify_evm_ownership, verify_movement_ownership, MovementProof};

/// Message returned for a verified registration.
pub const REGISTERED_MESSAGE: &str = "Wallet registered successfully.";

/// Message returned for a registration accepted without ownership proof.
pub const REGISTERED_UNVERIFIED_MESSAGE: &str =
    "Wallet registered successfully (ownership not verified).";

// ============================================================================
// REQUEST / OUTCOME STRUCTURES
// ============================================================================

/// Registration request body.
///
/// Every field is optional on the wire so that missing fields produce a
/// validation error rather than a decoding failure. Empty strings count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    /// `"EVM"` or `"Movement"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_type: Option<String>,
    /// Claimed wallet address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// EVM signature over the connection message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_signature: Option<String>,
    /// Signature over the registration challenge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_signature: Option<String>,
    /// Hex Ed25519 public key (Movement only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

impl RegistrationRequest {
    /// Builds an EVM registration request.
    pub fn evm(
        address: impl Into<String>,
        connection_signature: impl Into<String>,
        registration_signature: impl Into<String>,
    ) -> Self {
        Self {
            wallet_type: Some(WalletType::Evm.to_string()),
            address: Some(address.into()),
            connection_signature: Some(connection_signature.into()),
            registration_signature: Some(registration_signature.into()),
            public_key: None,
        }
    }

    /// Builds a Movement registration request, optionally carrying an ownership proof.
    pub fn movement(address: impl Into<String>, proof: Option<MovementProof>) -> Self {
        let (public_key, registration_signature) = match proof {
            Some(proof) => (Some(proof.public_key), Some(proof.signature)),
            None => (None, None),
        };
        Self {
            wallet_type: Some(WalletType::Movement.to_string()),
            address: Some(address.into()),
            connection_signature: None,
            registration_signature,
            public_key,
        }
    }
}

/// Returns the field value unless it is absent or empty.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// A successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    /// The record that was written
    pub record: RegistrationRecord,
}

impl RegistrationOutcome {
    /// User-facing success message.
    pub fn message(&self) -> &'static str {
        if self.record.verified {
            REGISTERED_MESSAGE
        } else {
            REGISTERED_UNVERIFIED_MESSAGE
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Reasons a registration is refused.
///
/// The display text is the message returned to the client.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Missing required fields.")]
    MissingFields,

    #[error("Invalid wallet type.")]
    InvalidWalletType(String),

    #[error("Connection signature verification failed.")]
    ConnectionSignatureMismatch,

    #[error("Registration signature verification failed.")]
    RegistrationSignatureMismatch,

    #[error("Public key does not match the claimed address.")]
    PublicKeyMismatch,

    #[error("Movement wallet ownership proof required.")]
    OwnershipProofRequired,

    #[error("Error verifying signatures.")]
    Verification(#[source] anyhow::Error),

    #[error("Wallet already registered.")]
    AlreadyRegistered,

    #[error("Server error.")]
    Storage(#[source] anyhow::Error),
}

// ============================================================================
// REGISTRATION SERVICE
// ============================================================================

/// Runs the registration flow against a record ledger.
pub struct RegistrationService {
    ledger: RegistrationLedger,
    allow_unverified_movement: bool,
}

impl RegistrationService {
    /// Creates a service over `store`.
    pub fn new(store: Arc<dyn RecordStore>, allow_unverified_movement: bool) -> Self {
        Self {
            ledger: RegistrationLedger::new(store),
            allow_unverified_movement,
        }
    }

    /// Creates a service with the store selected by configuration.
    pub async fn from_config(config: &RegistryConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn RecordStore> = match config.store {
            StoreBackend::File => Arc::new(JsonFileStore::open(&config.data_file).await?),
            StoreBackend::Memory => {
                warn!("Using in-memory registration store (records are lost on restart)");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::new(store, config.allow_unverified_movement))
    }

    /// The ledger holding registered records.
    pub fn ledger(&self) -> &RegistrationLedger {
        &self.ledger
    }

    /// Validates, verifies, and stores a registration.
    ///
    /// # Returns
    ///
    /// * `Ok(RegistrationOutcome)` - The address was registered
    /// * `Err(RegistrationError)` - The request was refused; the store is unchanged
    pub async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        // Step 1: shape validation
        let (wallet_type, address) = match (present(&request.wallet_type), present(&request.address)) {
            (Some(wallet_type), Some(address)) => (wallet_type, address),
            _ => return Err(RegistrationError::MissingFields),
        };
        let wallet_type = WalletType::from_str(wallet_type)
            .map_err(|_| RegistrationError::InvalidWalletType(wallet_type.to_string()))?;

        // Step 2: ownership verification
        let verified = match wallet_type {
            WalletType::Evm => {
                verify_evm_ownership(
                    address,
                    present(&request.connection_signature),
                    present(&request.registration_signature),
                )?;
                true
            }
            WalletType::Movement => {
                let verified = verify_movement_ownership(
                    address,
                    present(&request.public_key),
                    present(&request.registration_signature),
                )?;
                if !verified && !self.allow_unverified_movement {
                    warn!("Refusing unproven Movement registration for {}", address);
                    return Err(RegistrationError::OwnershipProofRequired);
                }
                verified
            }
        };

        // Steps 3 and 4: duplicate check and append
        let record = RegistrationRecord::new(wallet_type, address, verified);
        match self
            .ledger
            .insert_if_absent(record.clone())
            .await
            .map_err(RegistrationError::Storage)?
        {
            InsertOutcome::Inserted => {
                info!(
                    "Accepted {} registration for {} (verified: {})",
                    wallet_type, address, verified
                );
                Ok(RegistrationOutcome { record })
            }
            InsertOutcome::AlreadyRegistered(existing) => {
                info!(
                    "Rejected duplicate registration for {} (registered at {})",
                    address, existing.timestamp
                );
                Err(RegistrationError::AlreadyRegistered)
            }
        }
    }
}
