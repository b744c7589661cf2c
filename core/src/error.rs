//! Error types for the chat core
//!
//! Transport failures never reach the user as-is: the conversation collapses
//! every [`TransportError`] into one fixed chat message. The variants exist so
//! the cause can still be logged.

use thiserror::Error;

/// Failures delivering or decoding a chat exchange
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP request could not be sent or the body could not be read
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status code
    #[error("Chat endpoint returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// The response body was not valid JSON for the chat protocol
    #[error("Failed to decode chat response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response decoded but matched neither the success nor the error shape
    #[error("Unexpected chat response shape: {0}")]
    UnexpectedShape(String),
}

/// Invalid configuration values
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// The chat endpoint is not an absolute http(s) URL
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected value
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// A numeric setting is outside its accepted range
    #[error("{name} must be within {min}..={max}, got {value}")]
    OutOfRange {
        /// Setting name
        name: &'static str,
        /// Rejected value
        value: f32,
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
    },

    /// A required text setting is empty
    #[error("{0} cannot be empty")]
    Empty(&'static str),
}
