//! Unit tests for the wallet connector and registry client
//!
//! These tests verify the connect and register actions, the user-facing status
//! messages, and the requests sent to the registry. Registry responses are mocked
//! with wiremock; one test runs against the real API routes.

use serde_json::json;
use wallet_registry::connector::{
    ConnectorError, MovementWallet, RegistryClient, WalletConnector, WalletProvider,
};
use wallet_registry::crypto::{connection_message, recover_address, REGISTRATION_CHALLENGE};
use wallet_registry::registration::RegistrationRequest;
use wallet_registry::storage::{RecordStore, WalletType};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[path = "mod.rs"]
mod test_helpers;
use test_helpers::{
    build_test_api_server, evm_wallet, movement_key, movement_key_address, TEST_EVM_ADDRESS,
    TEST_EVM_PRIVATE_KEY, TEST_MOVEMENT_SEED,
};

/// Provider whose user rejects every request.
struct RejectingWallet;

impl WalletProvider for RejectingWallet {
    fn wallet_type(&self) -> WalletType {
        WalletType::Evm
    }

    fn request_address(&self) -> anyhow::Result<Option<String>> {
        Err(anyhow::anyhow!("User rejected the request"))
    }

    fn sign_message(&self, _message: &str) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("User rejected the request"))
    }
}

/// Provider that reveals an address but refuses to sign the registration challenge.
struct ConnectOnlyWallet;

impl WalletProvider for ConnectOnlyWallet {
    fn wallet_type(&self) -> WalletType {
        WalletType::Evm
    }

    fn request_address(&self) -> anyhow::Result<Option<String>> {
        Ok(Some(TEST_EVM_ADDRESS.to_string()))
    }

    fn sign_message(&self, message: &str) -> anyhow::Result<String> {
        if message == REGISTRATION_CHALLENGE {
            Err(anyhow::anyhow!("User rejected the request"))
        } else {
            Ok("0x00".to_string())
        }
    }
}

async fn mock_registry(status: u16, body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

// ============================================================================
// CONNECT TESTS
// ============================================================================

/// What is tested: Connecting an EVM wallet
/// Why: The connector records the checksummed address and a valid connection signature
#[test]
fn test_connect_evm_wallet() {
    let mut connector = WalletConnector::new(Box::new(evm_wallet(TEST_EVM_PRIVATE_KEY)));

    let connection = connector.connect().unwrap().clone();
    assert_eq!(connection.address, TEST_EVM_ADDRESS);

    let signature = connection.connection_signature.expect("EVM connections are signed");
    let signer = recover_address(&connection_message(TEST_EVM_ADDRESS), &signature).unwrap();
    assert!(signer.eq_ignore_ascii_case(TEST_EVM_ADDRESS));
    assert_eq!(connector.message(), "");
}

/// What is tested: Connecting when no wallet provider is installed
/// Why: The user is told the provider is missing
#[test]
fn test_connect_without_provider() {
    let mut connector = WalletConnector::unavailable(WalletType::Evm);

    assert!(matches!(connector.connect(), Err(ConnectorError::NotInstalled)));
    assert_eq!(connector.message(), "Wallet provider is not installed.");
    assert!(connector.connection().is_none());
}

/// What is tested: The user rejecting the connection request
/// Why: Provider failures are reported with the wallet type
#[test]
fn test_connect_rejected_by_user() {
    let mut connector = WalletConnector::new(Box::new(RejectingWallet));

    assert!(matches!(
        connector.connect(),
        Err(ConnectorError::ConnectFailed { wallet_type: WalletType::Evm, .. })
    ));
    assert_eq!(connector.message(), "Error connecting EVM wallet.");
}

/// What is tested: A Movement wallet supplying an empty address
/// Why: A dismissed prompt leaves the connector disconnected without a status message
#[test]
fn test_connect_movement_empty_address() {
    let mut connector = WalletConnector::new(Box::new(MovementWallet::with_address("   ")));

    assert!(matches!(connector.connect(), Err(ConnectorError::NoAddress)));
    assert!(connector.connection().is_none());
    assert_eq!(connector.message(), "");
}

/// What is tested: Connecting a Movement wallet with a fixed address
/// Why: Movement connections report the address without signing anything
#[test]
fn test_connect_movement_fixed_address() {
    let mut connector = WalletConnector::new(Box::new(MovementWallet::with_address("0x1")));
    connector.connect().unwrap();
    assert_eq!(connector.connection().unwrap().address, "0x1");
    assert!(connector.connection().unwrap().connection_signature.is_none());
    assert_eq!(connector.message(), "");
}

// ============================================================================
// REGISTER TESTS
// ============================================================================

/// What is tested: Registering before connecting
/// Why: A connection is required and nothing is sent
#[tokio::test]
async fn test_register_requires_connection() {
    let server = mock_registry(200, json!({ "message": "unused" })).await;
    let client = RegistryClient::new(&server.uri()).unwrap();
    let mut connector = WalletConnector::new(Box::new(evm_wallet(TEST_EVM_PRIVATE_KEY)));

    let err = connector.register(&client).await.unwrap_err();
    assert!(matches!(err, ConnectorError::NotConnected));
    assert_eq!(connector.message(), "Please connect a wallet first.");
    assert!(server.received_requests().await.unwrap().is_empty());
}

/// What is tested: Successful EVM registration against a mocked registry
/// Why: The request carries both signatures and the message is prefixed with "Success: "
#[tokio::test]
async fn test_register_evm_success() {
    let server = mock_registry(200, json!({ "message": "Wallet registered successfully." })).await;
    let client = RegistryClient::new(&server.uri()).unwrap();
    let mut connector = WalletConnector::new(Box::new(evm_wallet(TEST_EVM_PRIVATE_KEY)));
    connector.connect().unwrap();

    let message = connector.register(&client).await.unwrap();
    assert_eq!(message, "Success: Wallet registered successfully.");
    assert_eq!(connector.message(), message);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let sent: RegistrationRequest = requests[0].body_json().unwrap();
    assert_eq!(sent.wallet_type.as_deref(), Some("EVM"));
    assert_eq!(sent.address.as_deref(), Some(TEST_EVM_ADDRESS));
    assert!(sent.connection_signature.is_some());
    let signer =
        recover_address(REGISTRATION_CHALLENGE, sent.registration_signature.as_deref().unwrap())
            .unwrap();
    assert!(signer.eq_ignore_ascii_case(TEST_EVM_ADDRESS));
}

/// What is tested: A registration refused by the registry
/// Why: The server message is shown prefixed with "Error: "
#[tokio::test]
async fn test_register_rejected_by_server() {
    let server = mock_registry(409, json!({ "message": "Wallet already registered." })).await;
    let client = RegistryClient::new(&server.uri()).unwrap();
    let mut connector = WalletConnector::new(Box::new(evm_wallet(TEST_EVM_PRIVATE_KEY)));
    connector.connect().unwrap();

    let err = connector.register(&client).await.unwrap_err();
    assert!(matches!(err, ConnectorError::Rejected(_)));
    assert_eq!(connector.message(), "Error: Wallet already registered.");
}

/// What is tested: The wallet refusing to sign the registration challenge
/// Why: Signing failures are reported and nothing is sent
#[tokio::test]
async fn test_register_signing_failure() {
    let server = mock_registry(200, json!({ "message": "unused" })).await;
    let client = RegistryClient::new(&server.uri()).unwrap();
    let mut connector = WalletConnector::new(Box::new(ConnectOnlyWallet));
    connector.connect().unwrap();

    let err = connector.register(&client).await.unwrap_err();
    assert!(matches!(err, ConnectorError::SigningFailed(_)));
    assert_eq!(connector.message(), "Error signing registration message.");
    assert!(server.received_requests().await.unwrap().is_empty());
}

/// What is tested: A registry that cannot be reached
/// Why: Transport failures produce the generic registration error
#[tokio::test]
async fn test_register_transport_failure() {
    // Port 9 (discard) is not served
    let client = RegistryClient::new("http://127.0.0.1:9").unwrap();
    let mut connector = WalletConnector::new(Box::new(evm_wallet(TEST_EVM_PRIVATE_KEY)));
    connector.connect().unwrap();

    let err = connector.register(&client).await.unwrap_err();
    assert!(matches!(err, ConnectorError::Transport(_)));
    assert_eq!(connector.message(), "Error registering wallet.");
}

/// What is tested: Movement registration without a key
/// Why: Only walletType and address are sent
#[tokio::test]
async fn test_register_movement_without_key() {
    let server = mock_registry(
        200,
        json!({ "message": "Wallet registered successfully (ownership not verified).", "verified": false }),
    )
    .await;
    let client = RegistryClient::new(&server.uri()).unwrap();
    let mut connector = WalletConnector::new(Box::new(MovementWallet::with_address("0x1")));
    connector.connect().unwrap();
    connector.register(&client).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(sent, json!({ "walletType": "Movement", "address": "0x1" }));
}

/// What is tested: Movement registration with an Ed25519 key
/// Why: The request carries the public key and a signature over the challenge
#[tokio::test]
async fn test_register_movement_with_key() {
    let server = mock_registry(200, json!({ "message": "Wallet registered successfully." })).await;
    let client = RegistryClient::new(&server.uri()).unwrap();
    let key = movement_key(TEST_MOVEMENT_SEED);
    let mut connector =
        WalletConnector::new(Box::new(MovementWallet::with_signing_key(key.clone())));

    assert_eq!(connector.connect().unwrap().address, movement_key_address(&key));
    connector.register(&client).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let sent: RegistrationRequest = requests[0].body_json().unwrap();
    assert_eq!(sent.wallet_type.as_deref(), Some("Movement"));
    assert!(sent.public_key.is_some());
    assert!(sent.registration_signature.is_some());
    assert!(sent.connection_signature.is_none());
}

// ============================================================================
// CLIENT TESTS
// ============================================================================

/// What is tested: Base URLs with a path prefix
/// Why: The registry may be mounted below the host root
#[tokio::test]
async fn test_client_keeps_base_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/registry/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .mount(&server)
        .await;

    let client = RegistryClient::new(&format!("{}/registry", server.uri())).unwrap();
    assert!(client.base_url().as_str().ends_with("/registry/"));

    let reply = client
        .register(&RegistrationRequest::movement("0x1", None))
        .await
        .unwrap();
    assert!(reply.is_success());
    assert_eq!(reply.message, "ok");
}

/// What is tested: Invalid registry URLs
/// Why: Configuration mistakes are reported when the client is built
#[test]
fn test_client_rejects_invalid_url() {
    assert!(RegistryClient::new("not a url").is_err());
}

// ============================================================================
// END-TO-END TESTS
// ============================================================================

/// What is tested: Connect and register against the real API routes
/// Why: Client and server must agree on messages, encodings, and status handling
#[tokio::test]
async fn test_end_to_end_registration() {
    let (store, server) = build_test_api_server();
    let (addr, serving) = warp::serve(server.test_routes()).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(serving);

    let client = RegistryClient::new(&format!("http://{}", addr)).unwrap();
    let mut connector = WalletConnector::new(Box::new(evm_wallet(TEST_EVM_PRIVATE_KEY)));
    connector.connect().unwrap();

    let message = connector.register(&client).await.unwrap();
    assert_eq!(message, "Success: Wallet registered successfully.");
    assert_eq!(store.load().await.len(), 1);

    // A second attempt is refused as a duplicate
    let err = connector.register(&client).await.unwrap_err();
    assert!(matches!(err, ConnectorError::Rejected(_)));
    assert_eq!(connector.message(), "Error: Wallet already registered.");
    assert_eq!(store.load().await.len(), 1);
}
