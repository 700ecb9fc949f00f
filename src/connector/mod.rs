//! Wallet Connector Module
//!
//! Client side of registration. A [`WalletConnector`] obtains an address from a
//! [`WalletProvider`], collects the connection and registration signatures, and
//! submits them through a [`RegistryClient`]. Every outcome is also kept as a
//! user-facing status message, mirroring what the registration page shows.

mod client;
mod wallets;

use thiserror::Error;
use tracing::{info, warn};

use crate::crypto::{connection_message, REGISTRATION_CHALLENGE};
use crate::registration::{MovementProof, RegistrationRequest};
use crate::storage::WalletType;

pub use client::{RegistrationReply, RegistryClient};
pub use wallets::{AddressSource, LocalEvmWallet, MovementWallet};

// ============================================================================
// WALLET PROVIDER
// ============================================================================

/// A source of wallet addresses and message signatures.
///
/// This plays the role of a browser wallet extension: it reveals an address and
/// signs personal messages on request.
pub trait WalletProvider: Send + Sync {
    /// Kind of wallet this provider manages.
    fn wallet_type(&self) -> WalletType;

    /// Requests access to the wallet and returns its first address.
    ///
    /// `Ok(None)` means the user supplied no address.
    fn request_address(&self) -> anyhow::Result<Option<String>>;

    /// Signs `message` and returns the encoded signature.
    fn sign_message(&self, message: &str) -> anyhow::Result<String>;

    /// Hex public key, for wallets whose address cannot be recovered from a signature.
    fn public_key(&self) -> Option<String> {
        None
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Connector failures. The display text is the message shown to the user.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Wallet provider is not installed.")]
    NotInstalled,

    #[error("Error connecting {wallet_type} wallet.")]
    ConnectFailed {
        wallet_type: WalletType,
        #[source]
        source: anyhow::Error,
    },

    #[error("No wallet address provided.")]
    NoAddress,

    #[error("Please connect a wallet first.")]
    NotConnected,

    #[error("Error signing registration message.")]
    SigningFailed(#[source] anyhow::Error),

    #[error("Error: {0}")]
    Rejected(String),

    #[error("Error registering wallet.")]
    Transport(#[source] anyhow::Error),
}

// ============================================================================
// CONNECTOR
// ============================================================================

/// A connected wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Address reported by the wallet
    pub address: String,
    /// Signature over the connection message (EVM only)
    pub connection_signature: Option<String>,
}

/// Drives the connect and register actions for one wallet.
pub struct WalletConnector {
    wallet_type: WalletType,
    provider: Option<Box<dyn WalletProvider>>,
    connection: Option<Connection>,
    message: String,
}

impl WalletConnector {
    /// Creates a connector backed by `provider`.
    pub fn new(provider: Box<dyn WalletProvider>) -> Self {
        Self {
            wallet_type: provider.wallet_type(),
            provider: Some(provider),
            connection: None,
            message: String::new(),
        }
    }

    /// Creates a connector for a wallet type whose provider is not installed.
    pub fn unavailable(wallet_type: WalletType) -> Self {
        Self {
            wallet_type,
            provider: None,
            connection: None,
            message: String::new(),
        }
    }

    /// Wallet type selected for this connector.
    pub fn wallet_type(&self) -> WalletType {
        self.wallet_type
    }

    /// Current connection, if any.
    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    /// Latest user-facing status message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Connects the wallet.
    ///
    /// Clears any previous connection and message first. For EVM wallets the
    /// connection message is signed immediately; Movement wallets only report an
    /// address. A dismissed address prompt leaves the connector disconnected
    /// with no status message.
    pub fn connect(&mut self) -> Result<&Connection, ConnectorError> {
        self.message.clear();
        self.connection = None;

        let result = self.try_connect();
        match result {
            Ok(connection) => {
                info!("Connected {} wallet {}", self.wallet_type, connection.address);
                Ok(self.connection.insert(connection))
            }
            Err(ConnectorError::NoAddress) => {
                info!("No {} wallet address provided", self.wallet_type);
                Err(ConnectorError::NoAddress)
            }
            Err(e) => {
                warn!("Wallet connection failed: {:?}", e);
                self.message = e.to_string();
                Err(e)
            }
        }
    }

    fn try_connect(&self) -> Result<Connection, ConnectorError> {
        let provider = self.provider.as_ref().ok_or(ConnectorError::NotInstalled)?;
        let wallet_type = self.wallet_type;
        let connect_failed = |source: anyhow::Error| ConnectorError::ConnectFailed { wallet_type, source };

        let address = provider
            .request_address()
            .map_err(connect_failed)?
            .filter(|address| !address.trim().is_empty())
            .ok_or(ConnectorError::NoAddress)?;

        let connection_signature = match wallet_type {
            WalletType::Evm => Some(
                provider
                    .sign_message(&connection_message(&address))
                    .map_err(connect_failed)?,
            ),
            WalletType::Movement => None,
        };

        Ok(Connection {
            address,
            connection_signature,
        })
    }

    /// Signs the registration challenge and submits the registration.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - `Success: <server message>`
    /// * `Err(ConnectorError)` - Not connected, signing failed, refused, or unreachable server
    pub async fn register(&mut self, client: &RegistryClient) -> Result<String, ConnectorError> {
        let result = self.try_register(client).await;
        self.message = match &result {
            Ok(message) => message.clone(),
            Err(e) => e.to_string(),
        };
        result
    }

    async fn try_register(&self, client: &RegistryClient) -> Result<String, ConnectorError> {
        let connection = self.connection.as_ref().ok_or(ConnectorError::NotConnected)?;
        let request = self.build_request(connection)?;

        let reply = client
            .register(&request)
            .await
            .map_err(ConnectorError::Transport)?;

        if reply.is_success() {
            Ok(format!("Success: {}", reply.message))
        } else {
            Err(ConnectorError::Rejected(reply.message))
        }
    }

    fn build_request(&self, connection: &Connection) -> Result<RegistrationRequest, ConnectorError> {
        match self.wallet_type {
            WalletType::Evm => {
                let connection_signature = connection
                    .connection_signature
                    .clone()
                    .ok_or(ConnectorError::NotConnected)?;
                let provider = self.provider.as_ref().ok_or(ConnectorError::NotInstalled)?;
                let registration_signature = provider
                    .sign_message(REGISTRATION_CHALLENGE)
                    .map_err(ConnectorError::SigningFailed)?;
                Ok(RegistrationRequest::evm(
                    connection.address.clone(),
                    connection_signature,
                    registration_signature,
                ))
            }
            WalletType::Movement => {
                let proof = match self.provider.as_ref().and_then(|p| p.public_key().map(|key| (p, key))) {
                    Some((provider, public_key)) => Some(MovementProof {
                        public_key,
                        signature: provider
                            .sign_message(REGISTRATION_CHALLENGE)
                            .map_err(ConnectorError::SigningFailed)?,
                    }),
                    None => None,
                };
                Ok(RegistrationRequest::movement(connection.address.clone(), proof))
            }
        }
    }
}
