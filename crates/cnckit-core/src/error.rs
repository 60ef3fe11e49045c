//! Error handling for CNCKit
//!
//! Provides the error types used across the client crates:
//! - Controller errors (facade construction and lifecycle)
//! - Connection errors (open parameters)
//! - Remote errors (opaque failures reported by the controller service)
//!
//! All error types use `thiserror` for ergonomic error handling.

use serde_json::Value;
use thiserror::Error;

/// Controller error type
///
/// Represents errors raised by the controller facade itself. Data-shape
/// anomalies in reports never produce one of these; they degrade to
/// defaults instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// The facade was built without a transport connector
    #[error("Expected a transport connector, but none was provided")]
    MissingTransport,

    /// No live transport is attached
    #[error("Controller not connected")]
    NotConnected,

    /// A transport is attached but no session is open
    #[error("No open connection session")]
    NoSession,
}

/// Connection error type
///
/// Represents problems with the parameters used to open a machine connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Invalid connection parameters
    #[error("Invalid connection parameters: {reason}")]
    InvalidParameters {
        /// The reason the parameters are invalid.
        reason: String,
    },

    /// Unknown connection kind
    #[error("Unknown connection kind: {kind}")]
    UnknownKind {
        /// The rejected kind string.
        kind: String,
    },
}

/// An error reported by the remote controller service.
///
/// The payload is passed through exactly as received; this crate never
/// inspects or rewrites it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Remote error: {0}")]
pub struct RemoteError(pub Value);

impl RemoteError {
    /// Wrap a remote error payload
    pub fn new(payload: impl Into<Value>) -> Self {
        Self(payload.into())
    }

    /// The payload as reported by the service
    pub fn payload(&self) -> &Value {
        &self.0
    }
}

/// Main error type for CNCKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Controller error
    #[error(transparent)]
    Controller(#[from] ControllerError),

    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Remote service error
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

}

impl Error {
    /// Check if this is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Check if this is a controller error
    pub fn is_controller_error(&self) -> bool {
        matches!(self, Error::Controller(_))
    }

    /// Check if this error came from the remote service
    pub fn is_remote_error(&self) -> bool {
        matches!(self, Error::Remote(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
