//! Transport contract
//!
//! The reconnecting event transport to the controller service lives outside
//! this crate. It is consumed through two traits:
//! - [`TransportConnector`] creates a live transport for a host and hands it
//!   the [`EventSink`] every pushed event must go through
//! - [`Transport`] carries outbound requests and reports liveness
//!
//! Framing, retry and backoff belong to the implementation. The
//! [`ConnectOptions`] are passed through to it unchanged.

use cnckit_core::{AckCallback, ConnectionKind, ControllerFamily, EventSink, ValueMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Options handed to the transport when connecting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    /// Reconnect automatically after the link drops
    pub reconnection: bool,
    /// Reconnection attempts before giving up (`None` retries forever)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconnection_attempts: Option<u32>,
    /// Delay between reconnection attempts in milliseconds
    pub reconnection_delay_ms: u64,
    /// Connection timeout in milliseconds
    pub timeout_ms: u64,
    /// Query string sent with the handshake (e.g. an access token)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            reconnection: true,
            reconnection_attempts: None,
            reconnection_delay_ms: 1000,
            timeout_ms: 20000,
            query: None,
        }
    }
}

/// A live link to the controller service.
///
/// Requests are fire-and-forget: results arrive through the supplied
/// acknowledgment callbacks, never as return values. Implementations may
/// invoke an acknowledgment synchronously.
pub trait Transport: Send + Sync {
    /// Whether the link is currently up
    fn is_connected(&self) -> bool;

    /// Tear the link down. No events are delivered afterwards.
    fn destroy(&self);

    /// Ask the service to open a machine connection
    fn open(
        &self,
        family: ControllerFamily,
        kind: ConnectionKind,
        options: ValueMap,
        ack: AckCallback,
    );

    /// Ask the service to close the machine connection `ident`
    fn close(&self, ident: &str, ack: AckCallback);

    /// Ask the service for the ports it can open
    fn get_ports(&self, ack: AckCallback);

    /// Run a named command on the machine connection `ident`
    fn command(&self, ident: &str, command: &str, args: Vec<Value>, ack: Option<AckCallback>);

    /// Write raw data to the machine connection `ident`
    fn write(&self, ident: &str, data: &str, context: Option<Value>);

    /// Write data followed by a newline to the machine connection `ident`
    fn writeln(&self, ident: &str, data: &str, context: Option<Value>);
}

/// Factory for live transports
pub trait TransportConnector: Send + Sync {
    /// Connect to `host`. Every event the service pushes on the returned
    /// transport must be delivered through `events`.
    fn connect(&self, host: &str, options: &ConnectOptions, events: EventSink)
        -> Arc<dyn Transport>;
}
