//! Wallet Key Generation Utility
//!
//! This binary generates a secp256k1 key for an EVM wallet and an Ed25519 key for
//! a Movement wallet, and prints the address each key registers as.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin generate_keys
//!
//! # Export the keys for register_wallet
//! export WALLET_PRIVATE_KEY=<evm private key>
//! export MOVEMENT_PRIVATE_KEY=<movement private key>
//! ```

use anyhow::Result;
use k256::ecdsa::SigningKey as EvmSigningKey;
use rand::RngCore;

use wallet_registry::crypto::{ethereum_address, movement_address, to_checksum_address};

fn main() -> Result<()> {
    let mut rng = rand::rngs::OsRng;

    // EVM: secp256k1
    let evm_key = EvmSigningKey::random(&mut rng);
    let evm_address = to_checksum_address(&ethereum_address(evm_key.verifying_key()))?;

    // Movement: Ed25519
    let mut movement_secret = [0u8; 32];
    rng.fill_bytes(&mut movement_secret);
    let movement_key = ed25519_dalek::SigningKey::from_bytes(&movement_secret);
    let movement_key_address = movement_address(&movement_key.verifying_key());

    println!("Generated EVM Key Pair:");
    println!("Private Key (hex): 0x{}", hex::encode(evm_key.to_bytes()));
    println!("Address: {}", evm_address);
    println!();
    println!("Generated Movement Key Pair:");
    println!("Private Key (hex): 0x{}", hex::encode(movement_key.to_bytes()));
    println!("Public Key (hex): 0x{}", hex::encode(movement_key.verifying_key().as_bytes()));
    println!("Address: {}", movement_key_address);

    Ok(())
}
