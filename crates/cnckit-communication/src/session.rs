//! Connection session
//!
//! Tracks the single machine connection the service has open for this
//! client, and the parameters used to request one.

use cnckit_core::data::{non_empty_str, sub_map};
use cnckit_core::{ConnectionError, ConnectionKind, Session, ValueMap};
use serde_json::{json, Value};

/// Default baud rate for serial connections
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default port for network connections
pub const DEFAULT_NETWORK_PORT: u16 = 23;

/// Fallbacks applied to [`OpenOptions`] fields left unset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenDefaults {
    /// Baud rate used when a serial open does not name one
    pub baud_rate: u32,
    /// Port used when a network open does not name one
    pub port: u16,
}

impl Default for OpenDefaults {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            port: DEFAULT_NETWORK_PORT,
        }
    }
}

/// Parameters for opening a machine connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOptions {
    /// Serial/USB port
    Serial {
        /// Port path (e.g. `/dev/ttyUSB0`, `COM3`)
        path: String,
        /// Baud rate, or the configured default
        baud_rate: Option<u32>,
    },
    /// Network socket
    Network {
        /// Host address
        host: String,
        /// Port, or the configured default
        port: Option<u16>,
    },
}

impl OpenOptions {
    /// Serial connection on `path` at the default baud rate
    pub fn serial(path: impl Into<String>) -> Self {
        Self::Serial {
            path: path.into(),
            baud_rate: None,
        }
    }

    /// Network connection to `host` on the default port
    pub fn network(host: impl Into<String>) -> Self {
        Self::Network {
            host: host.into(),
            port: None,
        }
    }

    /// Set the baud rate (serial only)
    pub fn with_baud_rate(mut self, rate: u32) -> Self {
        if let Self::Serial { baud_rate, .. } = &mut self {
            *baud_rate = Some(rate);
        }
        self
    }

    /// Set the port (network only)
    pub fn with_port(mut self, value: u16) -> Self {
        if let Self::Network { port, .. } = &mut self {
            *port = Some(value);
        }
        self
    }

    /// Connection kind these options describe
    pub fn kind(&self) -> ConnectionKind {
        match self {
            Self::Serial { .. } => ConnectionKind::Serial,
            Self::Network { .. } => ConnectionKind::Network,
        }
    }

    /// Reject options the service could never open
    pub fn validate(&self) -> Result<(), ConnectionError> {
        let reason = match self {
            Self::Serial { path, .. } if path.trim().is_empty() => "serial path is empty",
            Self::Serial {
                baud_rate: Some(0), ..
            } => "baud rate must be > 0",
            Self::Network { host, .. } if host.trim().is_empty() => "network host is empty",
            Self::Network { port: Some(0), .. } => "port must be > 0",
            _ => return Ok(()),
        };
        Err(ConnectionError::InvalidParameters {
            reason: reason.to_string(),
        })
    }

    /// Wire form of the options with defaults filled in
    pub fn resolve(&self, defaults: &OpenDefaults) -> ValueMap {
        let value = match self {
            Self::Serial { path, baud_rate } => json!({
                "path": path,
                "baudRate": baud_rate.unwrap_or(defaults.baud_rate),
            }),
            Self::Network { host, port } => json!({
                "host": host,
                "port": port.unwrap_or(defaults.port),
            }),
        };
        match value {
            Value::Object(map) => map,
            _ => ValueMap::new(),
        }
    }
}

/// State of the connection session
#[derive(Debug, Clone, Default)]
pub struct ConnectionSession {
    session: Session,
}

impl ConnectionSession {
    /// Create a session with no open connection
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of the open connection (empty if none)
    pub fn ident(&self) -> &str {
        &self.session.ident
    }

    /// Whether a connection is open
    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    /// Snapshot of the session
    pub fn snapshot(&self) -> Session {
        self.session.clone()
    }

    /// Record a successful open acknowledgment.
    ///
    /// The first acknowledgment argument is the new identifier.
    pub fn acknowledge_open(&mut self, args: &[Value]) {
        self.session.ident = args
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
    }

    /// Record a close acknowledgment, successful or not
    pub fn acknowledge_close(&mut self) {
        self.session.ident.clear();
    }

    /// Populate the session from a `connection:open` payload
    /// (`{ident, type, settings}`)
    pub fn apply_open_event(&mut self, payload: Option<&Value>) {
        let empty = ValueMap::new();
        let payload = payload.and_then(Value::as_object).unwrap_or(&empty);

        self.session.ident = non_empty_str(payload, "ident")
            .unwrap_or_default()
            .to_string();
        self.session.kind = payload
            .get("type")
            .and_then(Value::as_str)
            .and_then(ConnectionKind::from_name);
        self.session.settings = sub_map(payload, "settings").cloned().unwrap_or_default();
    }

    /// Forget the session
    pub fn clear(&mut self) {
        self.session.clear();
    }
}
