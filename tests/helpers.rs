//! Shared test helpers
//!
//! The module is organized into several categories:
//! - **Keys and Addresses**: Fixed test keys with their known addresses
//! - **Signed Requests**: Builders for correctly signed registration requests
//! - **Services**: Registration services and API servers over in-memory stores

use std::sync::Arc;

use ed25519_dalek::SigningKey as MovementSigningKey;
use wallet_registry::api::ApiServer;
use wallet_registry::config::{Config, StoreBackend};
use wallet_registry::connector::LocalEvmWallet;
use wallet_registry::crypto::{
    connection_message, movement_address, sign_movement_message, sign_personal_message,
    REGISTRATION_CHALLENGE,
};
use wallet_registry::registration::{MovementProof, RegistrationRequest, RegistrationService};
use wallet_registry::storage::{MemoryStore, RecordStore};

// ============================================================================
// CONSTANTS
// ============================================================================

/// EVM test private key
pub const TEST_EVM_PRIVATE_KEY: &str =
    "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

/// Checksummed address of `TEST_EVM_PRIVATE_KEY`
pub const TEST_EVM_ADDRESS: &str = "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23";

/// Second EVM private key (scalar 1)
pub const OTHER_EVM_PRIVATE_KEY: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000001";

/// Checksummed address of `OTHER_EVM_PRIVATE_KEY`
pub const OTHER_EVM_ADDRESS: &str = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";

/// Secret bytes of the Movement test key
pub const TEST_MOVEMENT_SEED: [u8; 32] = [7u8; 32];

// ============================================================================
// KEYS AND SIGNATURES
// ============================================================================

/// EVM signing key parsed from hex.
pub fn evm_key(private_key: &str) -> k256::ecdsa::SigningKey {
    wallet_registry::crypto::evm_signing_key_from_hex(private_key).unwrap()
}

/// EVM wallet for the given private key.
#[allow(dead_code)]
pub fn evm_wallet(private_key: &str) -> LocalEvmWallet {
    LocalEvmWallet::from_hex(private_key).unwrap()
}

/// Movement signing key from a fixed seed.
pub fn movement_key(seed: [u8; 32]) -> MovementSigningKey {
    MovementSigningKey::from_bytes(&seed)
}

/// Movement address of a signing key.
#[allow(dead_code)]
pub fn movement_key_address(key: &MovementSigningKey) -> String {
    movement_address(&key.verifying_key())
}

/// Hex public key of a Movement signing key.
pub fn movement_public_key_hex(key: &MovementSigningKey) -> String {
    format!("0x{}", hex::encode(key.verifying_key().as_bytes()))
}

// ============================================================================
// SIGNED REQUESTS
// ============================================================================

/// EVM registration request for `address`, with both messages signed by `private_key`.
pub fn signed_evm_request_for(address: &str, private_key: &str) -> RegistrationRequest {
    let key = evm_key(private_key);
    RegistrationRequest::evm(
        address,
        sign_personal_message(&key, &connection_message(address)).unwrap(),
        sign_personal_message(&key, REGISTRATION_CHALLENGE).unwrap(),
    )
}

/// Correctly signed EVM registration request for the test key.
#[allow(dead_code)]
pub fn signed_evm_request() -> RegistrationRequest {
    signed_evm_request_for(TEST_EVM_ADDRESS, TEST_EVM_PRIVATE_KEY)
}

/// Movement registration request carrying an Ed25519 proof from `key`.
#[allow(dead_code)]
pub fn signed_movement_request(address: &str, key: &MovementSigningKey) -> RegistrationRequest {
    RegistrationRequest::movement(
        address,
        Some(MovementProof {
            public_key: movement_public_key_hex(key),
            signature: sign_movement_message(key, REGISTRATION_CHALLENGE),
        }),
    )
}

// ============================================================================
// SERVICES
// ============================================================================

/// Configuration using the in-memory store.
pub fn build_test_config() -> Config {
    let mut config = Config::default();
    config.registry.store = StoreBackend::Memory;
    config
}

/// Registration service over a fresh in-memory store.
#[allow(dead_code)]
pub fn memory_service() -> (Arc<MemoryStore>, RegistrationService) {
    let store = Arc::new(MemoryStore::new());
    let service = RegistrationService::new(store.clone() as Arc<dyn RecordStore>, true);
    (store, service)
}

/// API server over a fresh in-memory store.
#[allow(dead_code)]
pub fn build_test_api_server() -> (Arc<MemoryStore>, ApiServer) {
    let (store, service) = memory_service();
    (store, ApiServer::new(build_test_config(), service))
}
