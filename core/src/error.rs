//! Error types for the wallet API client.
//!
//! # Design
//! `InvalidParameter` is raised locally, before any request is built, when a
//! required argument is missing or empty. `NotFound` gets its own variant
//! because callers routinely branch on it. Every other non-2xx response lands
//! in `HttpError` with the raw status and body.

use thiserror::Error;

/// Errors returned by `WalletClient` and `BlockingClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required argument was missing or empty.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The HTTP round-trip itself failed.
    #[error("transport failed: {0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The client configuration could not be loaded from the environment.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;
