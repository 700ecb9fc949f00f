//! REST API Server Module
//!
//! This module exposes the wallet registry over HTTP. All responses are JSON
//! objects carrying a human-readable `message`.

// Generic shared code
mod generic;

// Registration endpoint
mod register;

pub use generic::{handle_rejection, with_service, ApiServer, MessageResponse};
pub use register::register_handler;
