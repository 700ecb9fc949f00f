//! Local wallet providers

use std::io::{BufRead, Write};

use anyhow::Context;
use ed25519_dalek::SigningKey as MovementSigningKey;
use k256::ecdsa::SigningKey as EvmSigningKey;

use super::WalletProvider;
use crate::crypto::{
    ethereum_address, evm_signing_key_from_hex, movement_address, movement_signing_key_from_hex,
    sign_movement_message, sign_personal_message, to_checksum_address,
};
use crate::storage::WalletType;

// ============================================================================
// EVM WALLET
// ============================================================================

/// EVM wallet backed by a locally held secp256k1 key.
pub struct LocalEvmWallet {
    signing_key: EvmSigningKey,
}

impl LocalEvmWallet {
    /// Creates a wallet from a signing key.
    pub fn new(signing_key: EvmSigningKey) -> Self {
        Self { signing_key }
    }

    /// Creates a wallet from a hex private key.
    pub fn from_hex(private_key: &str) -> anyhow::Result<Self> {
        Ok(Self::new(evm_signing_key_from_hex(private_key)?))
    }

    /// Creates a wallet from a hex private key stored in an environment variable.
    pub fn from_env(var: &str) -> anyhow::Result<Self> {
        let private_key = std::env::var(var).map_err(|_| {
            anyhow::anyhow!(
                "Environment variable '{}' not set. Please set it with your EVM private key (hex encoded).",
                var
            )
        })?;
        Self::from_hex(&private_key)
    }

    /// EIP-55 checksummed address of the wallet.
    pub fn address(&self) -> anyhow::Result<String> {
        to_checksum_address(&ethereum_address(self.signing_key.verifying_key()))
    }
}

impl WalletProvider for LocalEvmWallet {
    fn wallet_type(&self) -> WalletType {
        WalletType::Evm
    }

    fn request_address(&self) -> anyhow::Result<Option<String>> {
        self.address().map(Some)
    }

    fn sign_message(&self, message: &str) -> anyhow::Result<String> {
        sign_personal_message(&self.signing_key, message)
    }
}

// ============================================================================
// MOVEMENT WALLET
// ============================================================================

/// Where a Movement wallet gets its address from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressSource {
    /// Address entered up front
    Fixed(String),
    /// Address typed on standard input when connecting
    Prompt,
    /// Address derived from the wallet's Ed25519 key
    DerivedFromKey,
}

/// Movement wallet.
///
/// The address is taken on trust unless the wallet also holds an Ed25519 key,
/// in which case it can sign the registration challenge.
pub struct MovementWallet {
    address_source: AddressSource,
    signing_key: Option<MovementSigningKey>,
}

impl MovementWallet {
    /// Wallet whose address is supplied manually with no proof.
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address_source: AddressSource::Fixed(address.into()),
            signing_key: None,
        }
    }

    /// Wallet that asks for its address on standard input.
    pub fn prompt() -> Self {
        Self {
            address_source: AddressSource::Prompt,
            signing_key: None,
        }
    }

    /// Wallet holding an Ed25519 key; its address is derived from the key.
    pub fn with_signing_key(signing_key: MovementSigningKey) -> Self {
        Self {
            address_source: AddressSource::DerivedFromKey,
            signing_key: Some(signing_key),
        }
    }

    /// Wallet holding an Ed25519 key given as hex.
    pub fn from_hex(private_key: &str) -> anyhow::Result<Self> {
        Ok(Self::with_signing_key(movement_signing_key_from_hex(private_key)?))
    }

    /// Replaces the address source, keeping any signing key.
    pub fn address_source(mut self, address_source: AddressSource) -> Self {
        self.address_source = address_source;
        self
    }

    fn prompt_for_address() -> anyhow::Result<Option<String>> {
        print!("Enter your Movement wallet address: ");
        std::io::stdout().flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read address from standard input")?;

        let address = line.trim();
        Ok((!address.is_empty()).then(|| address.to_string()))
    }
}

impl WalletProvider for MovementWallet {
    fn wallet_type(&self) -> WalletType {
        WalletType::Movement
    }

    fn request_address(&self) -> anyhow::Result<Option<String>> {
        match &self.address_source {
            AddressSource::Fixed(address) => Ok(Some(address.clone())),
            AddressSource::Prompt => Self::prompt_for_address(),
            AddressSource::DerivedFromKey => {
                let signing_key = self
                    .signing_key
                    .as_ref()
                    .context("Movement wallet has no key to derive an address from")?;
                Ok(Some(movement_address(&signing_key.verifying_key())))
            }
        }
    }

    fn sign_message(&self, message: &str) -> anyhow::Result<String> {
        let signing_key = self
            .signing_key
            .as_ref()
            .context("Movement wallet has no signing key")?;
        Ok(sign_movement_message(signing_key, message))
    }

    fn public_key(&self) -> Option<String> {
        self.signing_key
            .as_ref()
            .map(|key| format!("0x{}", hex::encode(key.verifying_key().as_bytes())))
    }
}
