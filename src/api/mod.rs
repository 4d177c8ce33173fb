pub mod backend;
#[cfg(test)]
pub mod memory;

pub use backend::{HttpBackend, OfferBackend};

use thiserror::Error;

/// Failures talking to the marketplace backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("connection error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend answered with status {0}")]
    Status(u16),

    /// The backend understood the request and refused it.
    #[error("{0}")]
    Rejected(String),

    #[error("response is missing `{0}`")]
    MissingPayload(&'static str),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}
