//! Cryptographic Operations Module
//!
//! This module handles the ownership proofs used by wallet registration:
//! EIP-191 personal-message signing and signer recovery for EVM wallets, and
//! Ed25519 signing and verification for Movement wallets. Curve arithmetic is
//! delegated to `k256` and `ed25519-dalek`.
//!
//! ## Security Requirements
//!
//! **CRITICAL**: Private keys must never be exposed or logged. Only the messages
//! defined here may be signed for registration so that both sides agree byte for byte.

pub mod evm;
pub mod mvm;

use anyhow::{Context, Result};

pub use evm::{
    ethereum_address, evm_signing_key_from_hex, hash_personal_message, recover_address,
    sign_personal_message, to_checksum_address,
};
pub use mvm::{
    movement_address, movement_signing_key_from_hex, normalize_movement_address,
    parse_movement_public_key, sign_movement_message, verify_movement_signature,
};

// ============================================================================
// REGISTRATION MESSAGES
// ============================================================================

/// Challenge signed by the wallet when registering.
pub const REGISTRATION_CHALLENGE: &str =
    "Please sign this message to verify wallet ownership for registration.";

/// Builds the message a wallet signs when it is connected.
///
/// The address is embedded exactly as the wallet reported it, so the server must
/// rebuild this message from the claimed address string without normalising it.
pub fn connection_message(address: &str) -> String {
    format!("I approve connecting my wallet {} to this application.", address)
}

/// Compares two addresses ignoring ASCII case.
pub fn addresses_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Decodes a hex string with or without a `0x` prefix.
pub(crate) fn decode_hex(value: &str) -> Result<Vec<u8>> {
    let trimmed = value.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(hex_part).with_context(|| format!("Invalid hex string: {}", value))
}
