//! Generic API structures and handlers
//!
//! This module contains the shared response structure, warp filter helpers, the
//! rejection handler, and the API server that wires the routes together.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use warp::{
    http::{Method, StatusCode},
    Filter, Rejection, Reply,
};

use super::register::register_handler;
use crate::config::Config;
use crate::registration::RegistrationService;

// ============================================================================
// SHARED RESPONSE STRUCTURE
// ============================================================================

/// Response body for every API endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome, shown to the user verbatim
    pub message: String,
    /// Whether wallet ownership was proven (registration success only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

impl MessageResponse {
    /// A response carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            verified: None,
        }
    }

    /// A successful registration response.
    pub fn registered(message: impl Into<String>, verified: bool) -> Self {
        Self {
            message: message.into(),
            verified: Some(verified),
        }
    }
}

// ============================================================================
// WARP FILTER HELPERS
// ============================================================================

/// Creates a warp filter that provides access to the registration service.
pub fn with_service(
    service: Arc<RegistrationService>,
) -> impl Filter<Extract = (Arc<RegistrationService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

// ============================================================================
// CORS CONFIGURATION
// ============================================================================

/// Creates a CORS filter based on the configured allowed origins.
fn create_cors_filter(allowed_origins: &[String]) -> warp::cors::Builder {
    let methods = vec![Method::GET, Method::POST, Method::OPTIONS];

    if allowed_origins.iter().any(|origin| origin == "*") {
        warp::cors()
            .allow_any_origin()
            .allow_methods(methods)
            .allow_headers(vec!["content-type"])
    } else {
        let origins: Vec<&str> = allowed_origins.iter().map(|s| s.as_str()).collect();
        warp::cors()
            .allow_origins(origins)
            .allow_methods(methods)
            .allow_headers(vec!["content-type"])
    }
}

// ============================================================================
// REJECTION HANDLER
// ============================================================================

/// Whether the rejection came from the CORS filter refusing the request origin.
fn is_cors_forbidden(rej: &Rejection) -> bool {
    format!("{:?}", rej).contains("CorsForbidden")
}

/// Global rejection handler for all API routes.
///
/// Converts warp rejections into `{ "message": ... }` responses. A body that is
/// not valid JSON is treated as an unexpected failure and reported as a server error.
pub async fn handle_rejection(rej: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(err) = rej.find::<warp::filters::body::BodyDeserializeError>() {
        warn!("Rejected request body: {}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error.".to_string())
    } else if rej.is_not_found() {
        (StatusCode::NOT_FOUND, "Endpoint not found".to_string())
    } else if rej.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large".to_string())
    } else if rej.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length header required".to_string())
    } else if rej.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Expected a JSON request body".to_string())
    } else if rej.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else if is_cors_forbidden(&rej) {
        // warp does not export its CORS rejection type
        warn!("Rejected cross-origin request: {:?}", rej);
        (StatusCode::FORBIDDEN, "Origin not allowed".to_string())
    } else {
        error!("Unhandled rejection: {:?}", rej);
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error.".to_string())
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&MessageResponse::new(message)),
        status,
    ))
}

// ============================================================================
// API SERVER IMPLEMENTATION
// ============================================================================

/// REST API server for the wallet registry.
pub struct ApiServer {
    /// Service configuration
    config: Arc<Config>,
    /// Registration flow and record ledger
    service: Arc<RegistrationService>,
}

impl ApiServer {
    /// Creates a new API server.
    pub fn new(config: Config, service: RegistrationService) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }

    /// Binds the configured address and serves requests until Ctrl-C.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Server shut down cleanly
    /// * `Err(anyhow::Error)` - Failed to parse or bind the address
    pub async fn run(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.api.host, self.config.api.port)
            .parse()
            .context("Failed to parse API server address")?;

        let (bound, server) = warp::serve(self.create_routes())
            .try_bind_with_graceful_shutdown(addr, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for shutdown signal: {}", e);
                }
            })
            .with_context(|| format!("Failed to bind API server to {}", addr))?;

        info!("API server listening on {}", bound);
        server.await;
        info!("API server stopped");

        Ok(())
    }

    /// Creates all API routes for the server.
    pub(crate) fn create_routes(
        &self,
    ) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
        let service = self.service.clone();

        // Health check endpoint - returns service status
        let health = warp::path!("health").and(warp::get()).map(|| {
            warp::reply::json(&MessageResponse::new("Wallet registry is running"))
        });

        // Registration endpoint, also mounted where the registration page posts
        let register = warp::path!("register")
            .or(warp::path!("api" / "register"))
            .unify()
            .and(warp::post())
            .and(warp::body::content_length_limit(self.config.registry.max_body_bytes))
            .and(warp::body::json())
            .and(with_service(service))
            .and_then(register_handler);

        health
            .or(register)
            .with(create_cors_filter(&self.config.api.cors_origins))
            .recover(handle_rejection)
    }

    /// Public method for testing - exposes routes for integration tests
    pub fn test_routes(
        &self,
    ) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
        self.create_routes()
    }
}
