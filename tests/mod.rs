//! Test module organization
//!
//! This module re-exports test helpers for use in test files.

mod helpers;

#[allow(unused_imports)]
pub use helpers::{
    build_test_api_server, build_test_config, evm_key, evm_wallet, memory_service, movement_key,
    movement_key_address, movement_public_key_hex, signed_evm_request, signed_evm_request_for,
    signed_movement_request, OTHER_EVM_ADDRESS, OTHER_EVM_PRIVATE_KEY, TEST_EVM_ADDRESS,
    TEST_EVM_PRIVATE_KEY, TEST_MOVEMENT_SEED,
};
