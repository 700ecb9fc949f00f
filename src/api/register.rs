//! Registration endpoint

use std::sync::Arc;

use tracing::{error, info};
use warp::http::StatusCode;

use super::generic::MessageResponse;
use crate::registration::{RegistrationError, RegistrationRequest, RegistrationService};

impl RegistrationError {
    /// HTTP status returned for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RegistrationError::MissingFields | RegistrationError::InvalidWalletType(_) => {
                StatusCode::BAD_REQUEST
            }
            RegistrationError::ConnectionSignatureMismatch
            | RegistrationError::RegistrationSignatureMismatch
            | RegistrationError::PublicKeyMismatch
            | RegistrationError::OwnershipProofRequired => StatusCode::UNAUTHORIZED,
            RegistrationError::AlreadyRegistered => StatusCode::CONFLICT,
            RegistrationError::Verification(_) | RegistrationError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Handler for POST /register.
///
/// # Arguments
///
/// * `request` - The decoded request body
/// * `service` - The registration service
///
/// # Returns
///
/// * `Ok(warp::Reply)` - JSON `{ message }` with the status of the outcome
pub async fn register_handler(
    request: RegistrationRequest,
    service: Arc<RegistrationService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let (status, body) = match service.register(&request).await {
        Ok(outcome) => (
            StatusCode::OK,
            MessageResponse::registered(outcome.message(), outcome.record.verified),
        ),
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                error!("Registration failed: {} ({:?})", e, e);
            } else {
                info!("Registration refused with {}: {}", status.as_u16(), e);
            }
            (status, MessageResponse::new(e.to_string()))
        }
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
