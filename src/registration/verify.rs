//! Ownership verification for registration requests

use tracing::warn;

use super::RegistrationError;
use crate::crypto::{
    self, addresses_match, connection_message, normalize_movement_address,
    parse_movement_public_key, REGISTRATION_CHALLENGE,
};

/// Ed25519 ownership proof for a Movement address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementProof {
    /// Hex Ed25519 public key
    pub public_key: String,
    /// Hex signature over the registration challenge
    pub signature: String,
}

/// Checks that both EVM signatures were produced by `address`.
///
/// A missing or malformed signature is a verification failure (500); a
/// well-formed signature from another key is a mismatch (401).
pub fn verify_evm_ownership(
    address: &str,
    connection_signature: Option<&str>,
    registration_signature: Option<&str>,
) -> Result<(), RegistrationError> {
    let connection_signature = connection_signature.ok_or_else(|| {
        RegistrationError::Verification(anyhow::anyhow!("Missing connection signature"))
    })?;
    let recovered = crypto::recover_address(&connection_message(address), connection_signature)
        .map_err(|e| {
            warn!("Failed to recover connection signer for {}: {:#}", address, e);
            RegistrationError::Verification(e)
        })?;
    if !addresses_match(&recovered, address) {
        warn!(
            "Connection signature for {} was produced by {}",
            address, recovered
        );
        return Err(RegistrationError::ConnectionSignatureMismatch);
    }

    let registration_signature = registration_signature.ok_or_else(|| {
        RegistrationError::Verification(anyhow::anyhow!("Missing registration signature"))
    })?;
    let recovered = crypto::recover_address(REGISTRATION_CHALLENGE, registration_signature)
        .map_err(|e| {
            warn!("Failed to recover registration signer for {}: {:#}", address, e);
            RegistrationError::Verification(e)
        })?;
    if !addresses_match(&recovered, address) {
        warn!(
            "Registration signature for {} was produced by {}",
            address, recovered
        );
        return Err(RegistrationError::RegistrationSignatureMismatch);
    }

    Ok(())
}

/// Checks a Movement ownership proof, if one was supplied.
///
/// Without a public key there is nothing to verify against and the address is
/// reported as unverified (`Ok(false)`). With a public key, the key must derive
/// the claimed address and the signature over the challenge must be valid.
pub fn verify_movement_ownership(
    address: &str,
    public_key: Option<&str>,
    registration_signature: Option<&str>,
) -> Result<bool, RegistrationError> {
    let Some(public_key) = public_key else {
        return Ok(false);
    };

    let verifying_key = parse_movement_public_key(public_key).map_err(|e| {
        warn!("Invalid Movement public key for {}: {:#}", address, e);
        RegistrationError::Verification(e)
    })?;

    let derived = crypto::movement_address(&verifying_key);
    if normalize_movement_address(address).as_deref() != Some(derived.as_str()) {
        warn!("Movement public key for {} derives {}", address, derived);
        return Err(RegistrationError::PublicKeyMismatch);
    }

    let signature = registration_signature.ok_or_else(|| {
        RegistrationError::Verification(anyhow::anyhow!("Missing registration signature"))
    })?;
    let valid = crypto::verify_movement_signature(REGISTRATION_CHALLENGE, &verifying_key, signature)
        .map_err(RegistrationError::Verification)?;
    if !valid {
        warn!("Movement registration signature for {} is invalid", address);
        return Err(RegistrationError::RegistrationSignatureMismatch);
    }

    Ok(true)
}
