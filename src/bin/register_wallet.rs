//! Wallet Registration Client
//!
//! Connects a wallet, signs the connection and registration messages, and submits
//! the registration to a running wallet registry.
//!
//! ## Usage
//!
//! ```bash
//! # EVM wallet, key read from WALLET_PRIVATE_KEY
//! cargo run --bin register_wallet -- --wallet-type evm --server http://127.0.0.1:3000
//!
//! # Movement wallet, address typed at the prompt (no ownership proof)
//! cargo run --bin register_wallet -- --wallet-type movement
//!
//! # Movement wallet with an Ed25519 key from MOVEMENT_PRIVATE_KEY
//! cargo run --bin register_wallet -- --wallet-type movement --movement-key-env MOVEMENT_PRIVATE_KEY
//! ```

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::warn;

use wallet_registry::connector::{
    AddressSource, LocalEvmWallet, MovementWallet, RegistryClient, WalletConnector,
};
use wallet_registry::storage::WalletType;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WalletKind {
    Evm,
    Movement,
}

#[derive(Debug, Parser)]
#[command(name = "register_wallet", about = "Register a wallet address with the wallet registry")]
struct Args {
    /// Wallet type to register
    #[arg(long, value_enum, default_value = "evm")]
    wallet_type: WalletKind,

    /// Base URL of the wallet registry
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Environment variable holding the EVM private key (hex)
    #[arg(long, default_value = "WALLET_PRIVATE_KEY")]
    private_key_env: String,

    /// Movement address to register (prompted for when omitted)
    #[arg(long)]
    address: Option<String>,

    /// Environment variable holding a Movement Ed25519 private key (hex)
    #[arg(long)]
    movement_key_env: Option<String>,
}

fn build_connector(args: &Args) -> Result<WalletConnector> {
    let connector = match args.wallet_type {
        WalletKind::Evm => match LocalEvmWallet::from_env(&args.private_key_env) {
            Ok(wallet) => WalletConnector::new(Box::new(wallet)),
            Err(e) => {
                warn!("No EVM wallet available: {:#}", e);
                WalletConnector::unavailable(WalletType::Evm)
            }
        },
        WalletKind::Movement => {
            let wallet = match &args.movement_key_env {
                Some(var) => {
                    let private_key = std::env::var(var).map_err(|_| {
                        anyhow::anyhow!("Environment variable '{}' not set", var)
                    })?;
                    MovementWallet::from_hex(&private_key)?
                }
                None => MovementWallet::prompt(),
            };
            let wallet = match &args.address {
                Some(address) => wallet.address_source(AddressSource::Fixed(address.clone())),
                None if args.movement_key_env.is_none() => wallet,
                None => wallet.address_source(AddressSource::DerivedFromKey),
            };
            WalletConnector::new(Box::new(wallet))
        }
    };
    Ok(connector)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let client = RegistryClient::new(&args.server)?;
    let mut connector = build_connector(&args)?;

    let connected = connector.connect().map(|connection| connection.address.clone());
    match connected {
        Ok(address) => println!("Connected Address: {}", address),
        Err(_) => {
            if !connector.message().is_empty() {
                println!("{}", connector.message());
            }
            std::process::exit(1);
        }
    }

    let registered = connector.register(&client).await.is_ok();
    println!("{}", connector.message());
    if !registered {
        std::process::exit(1);
    }

    Ok(())
}
