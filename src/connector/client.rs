//! Registry API Client
//!
//! HTTP client for the registration endpoint.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;
use url::Url;

use crate::api::MessageResponse;
use crate::registration::RegistrationRequest;

/// Server reply to a registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReply {
    /// HTTP status code
    pub status: u16,
    /// Message returned by the server
    pub message: String,
    /// Whether ownership was proven (present on success)
    pub verified: Option<bool>,
}

impl RegistrationReply {
    /// Whether the server accepted the registration.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client for the wallet registry.
pub struct RegistryClient {
    /// Base URL of the registry (always ends with `/`)
    base_url: Url,
    /// HTTP client instance
    client: reqwest::Client,
}

impl RegistryClient {
    /// Creates a client for the registry at `base_url` (e.g. `http://127.0.0.1:3000`).
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("Invalid registry URL: {}", base_url))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { base_url, client })
    }

    /// Base URL of the registry.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Submits a registration.
    ///
    /// Non-2xx statuses are not errors here; they are returned in the reply
    /// together with the server's message.
    ///
    /// # Returns
    ///
    /// * `Ok(RegistrationReply)` - The server answered with a message
    /// * `Err(anyhow::Error)` - The request failed or the reply was not a message
    pub async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationReply> {
        let url = self
            .base_url
            .join("register")
            .context("Failed to build registration URL")?;

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .context("Failed to send POST /register request")?;

        let status = response.status().as_u16();
        let body: MessageResponse = response
            .json()
            .await
            .context("Failed to parse POST /register response")?;

        debug!("POST /register answered {}: {}", status, body.message);

        Ok(RegistrationReply {
            status,
            message: body.message,
            verified: body.verified,
        })
    }
}
