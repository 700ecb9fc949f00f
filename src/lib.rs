//! Wallet Registry Service Library
//!
//! This crate provides a wallet registration service: clients prove ownership of an
//! EVM (or Movement) address by signing two challenge messages, and the server verifies
//! the signatures and appends the address to a JSON file record store.

pub mod api;
pub mod config;
pub mod connector;
pub mod crypto;
pub mod registration;
pub mod storage;

// Re-export commonly used types
pub use config::{ApiConfig, Config, RegistryConfig, StoreBackend};
pub use connector::{LocalEvmWallet, MovementWallet, RegistryClient, WalletConnector, WalletProvider};
pub use registration::{RegistrationError, RegistrationRequest, RegistrationService};
pub use storage::{JsonFileStore, MemoryStore, RecordStore, RegistrationLedger, RegistrationRecord, WalletType};
