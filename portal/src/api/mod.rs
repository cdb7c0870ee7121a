//! Backend REST boundary.
//!
//! The backend is the authority on every token: it is presented as a bearer
//! header on each request, and a 401 ends the local session the same way a
//! locally detected expiry does.

mod client;
pub mod headers;
mod transport;

pub use self::client::ApiClient;
pub use self::transport::{HyperTransport, Transport, TransportError};

use std::time::Duration;

use http::StatusCode;
use shared::types::ErrorResponse;
use thiserror::Error;

use crate::session::SessionError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Session rejected by the backend; logged out")]
    Unauthorized,

    #[error("Backend returned {status}: {error}")]
    Status {
        status: StatusCode,
        error: ErrorResponse,
    },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Failed to build request: {0}")]
    Http(#[from] http::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}
