//! Error types for the adapters module

use thiserror::Error;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Main error type for adapter operations
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Handshake with the stream endpoint failed
    #[error("Connection failed for {endpoint}: {reason}")]
    ConnectionFailed {
        /// Endpoint that failed to connect
        endpoint: String,
        /// Reason for the failure
        reason: String,
    },

    /// Handshake did not complete in time
    #[error("Connection timeout for {endpoint} after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Endpoint that timed out
        endpoint: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Every attempt of one connect call failed
    #[error("Maximum connection attempts ({max_attempts}) exceeded for {endpoint}")]
    MaxReconnectAttemptsExceeded {
        /// Endpoint that could not be reached
        endpoint: String,
        /// Attempts that were made
        max_attempts: u32,
    },

    /// The peer closed the stream or the stream ended
    #[error("Connection closed: {reason:?}")]
    ConnectionClosed {
        /// Close reason sent by the peer, if any
        reason: Option<String>,
    },

    /// Send or receive without an open connection
    #[error("Not connected")]
    NotConnected,

    /// No frame arrived within the receive timeout
    #[error("No frame received within {timeout_ms}ms")]
    ReceiveTimeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Priming request for challenge cookies was rejected
    #[error("Challenge priming rejected with HTTP {status}")]
    ChallengeRejected {
        /// HTTP status of the rejected response
        status: u16,
    },

    /// A header name or value could not be encoded
    #[error("Invalid header {name}: {reason}")]
    InvalidHeader {
        /// Header name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration error in adapter settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// WebSocket protocol or transport error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// HTTP error from the priming client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error during network operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize a batch for output
    #[error("Failed to serialize JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AdapterError {
    /// Check if this error is recoverable through reconnecting
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AdapterError::ConnectionFailed { .. }
                | AdapterError::ConnectionTimeout { .. }
                | AdapterError::ConnectionClosed { .. }
                | AdapterError::NotConnected
                | AdapterError::ReceiveTimeout { .. }
                | AdapterError::ChallengeRejected { .. }
                | AdapterError::MaxReconnectAttemptsExceeded { .. }
                | AdapterError::WebSocket(_)
                | AdapterError::Http(_)
                | AdapterError::Io(_)
        )
    }

    /// Check if this error indicates a permanent failure
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            AdapterError::Configuration(_) | AdapterError::InvalidHeader { .. }
        )
    }
}
