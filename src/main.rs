//! Wallet Registry Service
//!
//! Serves `POST /register`: verifies that the caller controls the wallet address
//! it claims and records the address once in a JSON file record store.
//!
//! ## Overview
//!
//! For every registration the service:
//! 1. Validates that `walletType` and `address` are present
//! 2. Recovers the signers of the connection and registration signatures (EVM)
//!    or checks the Ed25519 proof when one is supplied (Movement)
//! 3. Refuses addresses that are already registered, ignoring case
//! 4. Appends a timestamped record and rewrites the store file

use anyhow::Result;
use tracing::info;

use wallet_registry::api::ApiServer;
use wallet_registry::config::{Config, CONFIG_PATH_ENV};
use wallet_registry::registration::RegistrationService;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

/// Main application entry point that initializes and runs the registry.
///
/// This function:
/// 1. Initializes logging and tracing
/// 2. Loads configuration from TOML file
/// 3. Opens the record store
/// 4. Runs the API server until Ctrl-C
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging for debugging and monitoring
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("Wallet Registry Service");
        println!();
        println!("Usage: wallet-registry [OPTIONS]");
        println!();
        println!("Options:");
        println!("  --config <path>   Use custom config file path");
        println!("  --help, -h        Show this help message");
        println!();
        println!("Environment variables:");
        println!("  {}    Path to config file (overridden by --config)", CONFIG_PATH_ENV);
        return Ok(());
    }

    if let Some(pos) = args.iter().position(|arg| arg == "--config") {
        let path = args
            .get(pos + 1)
            .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
        std::env::set_var(CONFIG_PATH_ENV, path);
        info!("Using custom config: {}", path);
    }

    info!("Starting Wallet Registry Service");

    // Load configuration from config/wallet-registry.toml (or WALLET_REGISTRY_CONFIG_PATH)
    let config = Config::load()?;
    info!("Configuration loaded successfully");

    let service = RegistrationService::from_config(&config.registry).await?;
    let existing = service.ledger().records().await.len();
    info!("Registration store holds {} records", existing);

    // Run the API server (this blocks until shutdown)
    let api_server = ApiServer::new(config, service);
    api_server.run().await
}
