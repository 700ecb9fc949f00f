//! Movement wallet signatures
//!
//! Movement accounts use Ed25519 keys. A single-key account address is
//! `sha3_256(public_key || 0x00)`.

use anyhow::{Context, Result};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use sha3::{Digest, Sha3_256};

use super::decode_hex;

/// Ed25519 single-key scheme identifier appended before hashing.
const ED25519_SCHEME: u8 = 0x00;

/// Derives the Movement account address of an Ed25519 public key.
pub fn movement_address(public_key: &VerifyingKey) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(public_key.as_bytes());
    hasher.update([ED25519_SCHEME]);
    format!("0x{}", hex::encode(hasher.finalize()))
}

/// Normalises a Movement address to `0x` + 64 lower-case hex digits.
///
/// Short addresses are left-padded with zeros. Returns `None` when the input is
/// not hex or is longer than 32 bytes.
pub fn normalize_movement_address(address: &str) -> Option<String> {
    let trimmed = address.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if hex_part.is_empty() || hex_part.len() > 64 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("0x{:0>64}", hex_part.to_ascii_lowercase()))
}

/// Parses a hex-encoded Ed25519 public key.
pub fn parse_movement_public_key(public_key: &str) -> Result<VerifyingKey> {
    let key_bytes: [u8; 32] = decode_hex(public_key)
        .context("Public key is not valid hex")?
        .try_into()
        .map_err(|bytes: Vec<u8>| {
            anyhow::anyhow!("Invalid public key length: expected 32 bytes, got {}", bytes.len())
        })?;
    VerifyingKey::from_bytes(&key_bytes).map_err(|e| anyhow::anyhow!("Invalid Ed25519 public key: {}", e))
}

/// Verifies an Ed25519 signature over the UTF-8 bytes of `message`.
///
/// # Returns
///
/// * `Ok(bool)` - True if signature is valid, false otherwise
/// * `Err(anyhow::Error)` - The signature is not 64 bytes of hex
pub fn verify_movement_signature(
    message: &str,
    public_key: &VerifyingKey,
    signature: &str,
) -> Result<bool> {
    let signature_bytes: [u8; 64] = decode_hex(signature)
        .context("Signature is not valid hex")?
        .try_into()
        .map_err(|_| anyhow::anyhow!("Invalid signature length"))?;
    let signature = Signature::from_bytes(&signature_bytes);

    Ok(public_key.verify_strict(message.as_bytes(), &signature).is_ok())
}

/// Signs `message` and returns the `0x`-prefixed hex signature.
pub fn sign_movement_message(signing_key: &SigningKey, message: &str) -> String {
    let signature = signing_key.sign(message.as_bytes());
    format!("0x{}", hex::encode(signature.to_bytes()))
}

/// Parses a hex-encoded 32-byte Ed25519 private key.
pub fn movement_signing_key_from_hex(private_key: &str) -> Result<SigningKey> {
    let key_bytes: [u8; 32] = decode_hex(private_key)
        .context("Movement private key is not valid hex")?
        .try_into()
        .map_err(|bytes: Vec<u8>| {
            anyhow::anyhow!("Invalid private key length: expected 32 bytes, got {}", bytes.len())
        })?;
    Ok(SigningKey::from_bytes(&key_bytes))
}
