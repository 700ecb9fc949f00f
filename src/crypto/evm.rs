//! EVM wallet signatures
//!
//! Personal messages are hashed as
//! `keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)` and
//! signatures travel as `0x`-prefixed 65-byte `r || s || v` hex strings.

use anyhow::{Context, Result};
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};

use super::decode_hex;

const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Hashes a message the way `personal_sign` does before signing.
pub fn hash_personal_message(message: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// Derives the Ethereum address of a public key.
///
/// The address is `keccak256(uncompressed_public_key)[12:32]`, returned
/// lower-cased with a `0x` prefix.
pub fn ethereum_address(verifying_key: &VerifyingKey) -> String {
    // Uncompressed format: 0x04 || x (32 bytes) || y (32 bytes)
    let public_key_point = verifying_key.to_encoded_point(false);
    let hash = Keccak256::digest(&public_key_point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&hash[12..32]))
}

/// Recovers the address that signed `message` as a personal message.
///
/// Accepts 65-byte `r || s || v` signatures with `v` as 0/1, 27/28, or an
/// EIP-155 value (35 and above), and 64-byte EIP-2098 compact signatures where
/// the parity is the top bit of `s`. High-`s` signatures are normalised before
/// recovery, flipping the recovery parity to match.
///
/// # Returns
///
/// * `Ok(String)` - Lower-cased `0x` address of the signer
/// * `Err(anyhow::Error)` - The signature is malformed or no key can be recovered
pub fn recover_address(message: &str, signature: &str) -> Result<String> {
    let mut signature_bytes = decode_hex(signature).context("Signature is not valid hex")?;

    let parity = match signature_bytes.len() {
        65 => match signature_bytes[64] {
            v @ (0 | 1) => v,
            v @ (27 | 28) => v - 27,
            v if v >= 35 => (v - 35) & 1,
            v => return Err(anyhow::anyhow!("Invalid signature recovery byte: {}", v)),
        },
        // EIP-2098: r || (y_parity << 255 | s)
        64 => {
            let parity = signature_bytes[32] >> 7;
            signature_bytes[32] &= 0x7f;
            parity
        }
        len => {
            return Err(anyhow::anyhow!(
                "Invalid signature length: expected 64 or 65 bytes, got {}",
                len
            ))
        }
    };

    let mut ecdsa_signature = EcdsaSignature::from_slice(&signature_bytes[..64])
        .map_err(|e| anyhow::anyhow!("Invalid ECDSA signature: {}", e))?;
    let mut recovery_id = RecoveryId::from_byte(parity)
        .ok_or_else(|| anyhow::anyhow!("Invalid recovery id: {}", parity))?;

    if let Some(normalized) = ecdsa_signature.normalize_s() {
        ecdsa_signature = normalized;
        recovery_id = RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced());
    }

    let message_hash = hash_personal_message(message);
    let verifying_key =
        VerifyingKey::recover_from_prehash(&message_hash, &ecdsa_signature, recovery_id)
            .map_err(|e| anyhow::anyhow!("Failed to recover signer: {}", e))?;

    Ok(ethereum_address(&verifying_key))
}

/// Signs `message` as a personal message.
///
/// # Returns
///
/// * `Ok(String)` - `0x`-prefixed `r || s || v` signature with `v` in {27, 28}
/// * `Err(anyhow::Error)` - Signing failed
pub fn sign_personal_message(signing_key: &SigningKey, message: &str) -> Result<String> {
    let message_hash = hash_personal_message(message);
    let (signature, recovery_id) = signing_key
        .sign_prehash_recoverable(&message_hash)
        .map_err(|e| anyhow::anyhow!("Failed to sign message: {}", e))?;

    let mut signature_bytes = Vec::with_capacity(65);
    signature_bytes.extend_from_slice(&signature.to_bytes());
    signature_bytes.push(recovery_id.to_byte() + 27);

    Ok(format!("0x{}", hex::encode(signature_bytes)))
}

/// Encodes an address with the EIP-55 mixed-case checksum.
pub fn to_checksum_address(address: &str) -> Result<String> {
    let hex_part = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);
    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(anyhow::anyhow!("Invalid EVM address: {}", address));
    }

    let lower = hex_part.to_ascii_lowercase();
    let hash = Keccak256::digest(lower.as_bytes());

    let checksummed: String = lower
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let nibble = if i % 2 == 0 { hash[i / 2] >> 4 } else { hash[i / 2] & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect();

    Ok(format!("0x{}", checksummed))
}

/// Parses a secp256k1 private key from hex (with or without `0x`).
pub fn evm_signing_key_from_hex(private_key: &str) -> Result<SigningKey> {
    let key_bytes = decode_hex(private_key).context("EVM private key is not valid hex")?;
    if key_bytes.len() != 32 {
        return Err(anyhow::anyhow!(
            "Invalid private key length: expected 32 bytes, got {}",
            key_bytes.len()
        ));
    }
    SigningKey::from_slice(&key_bytes)
        .map_err(|e| anyhow::anyhow!("Failed to create ECDSA signing key: {}", e))
}
