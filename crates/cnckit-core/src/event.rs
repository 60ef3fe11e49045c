//! Event names and listener handles
//!
//! The controller service pushes a fixed set of named events. They are
//! modelled as a closed enum so an unknown name can only enter through
//! [`EventName::from_str`], which rejects it.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

macro_rules! event_names {
    ($($(#[$doc:meta])* $variant:ident => $wire:literal,)+) => {
        /// Every event the controller service can push
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum EventName {
            $($(#[$doc])* $variant,)+
        }

        impl EventName {
            /// All event names, in declaration order
            pub const ALL: &'static [EventName] = &[$(EventName::$variant,)+];

            /// Name used on the wire
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(EventName::$variant => $wire,)+
                }
            }
        }

        impl FromStr for EventName {
            type Err = UnknownEventName;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(EventName::$variant),)+
                    other => Err(UnknownEventName(other.to_string())),
                }
            }
        }
    };
}

event_names! {
    /// Transport connected, including after a reconnection
    Connect => "connect",
    /// Transport connection error
    ConnectError => "connect_error",
    /// Transport connection timeout
    ConnectTimeout => "connect_timeout",
    /// Transport error
    Error => "error",
    /// Transport disconnected
    Disconnect => "disconnect",
    /// Transport reconnected
    Reconnect => "reconnect",
    /// Transport is attempting to reconnect
    ReconnectAttempt => "reconnect_attempt",
    /// Transport is reconnecting
    Reconnecting => "reconnecting",
    /// A reconnection attempt failed
    ReconnectError => "reconnect_error",
    /// Transport gave up reconnecting
    ReconnectFailed => "reconnect_failed",
    /// One-time service greeting with supported controllers and baud rates
    Startup => "startup",
    /// Port list
    Ports => "ports",
    /// Service configuration changed
    ConfigChange => "config:change",
    /// Task started
    TaskStart => "task:start",
    /// Task finished
    TaskFinish => "task:finish",
    /// Task failed
    TaskError => "task:error",
    /// Controller family reported
    ControllerType => "controller:type",
    /// Controller firmware settings reported
    ControllerSettings => "controller:settings",
    /// Controller live state reported
    ControllerState => "controller:state",
    /// A machine connection opened
    ConnectionOpen => "connection:open",
    /// A machine connection closed
    ConnectionClose => "connection:close",
    /// A machine connection changed
    ConnectionChange => "connection:change",
    /// A machine connection failed
    ConnectionError => "connection:error",
    /// Data read from the machine
    ConnectionRead => "connection:read",
    /// Data written to the machine
    ConnectionWrite => "connection:write",
    /// G-code program loaded
    GcodeLoad => "gcode:load",
    /// G-code program unloaded
    GcodeUnload => "gcode:unload",
    /// Feeder status
    FeederStatus => "feeder:status",
    /// Sender status
    SenderStatus => "sender:status",
    /// Workflow state changed
    WorkflowState => "workflow:state",
    /// Free-form service message
    Message => "message",
}

impl EventName {
    /// Events after which the transport is gone and derived state must reset
    pub fn is_disconnect(&self) -> bool {
        matches!(self, EventName::Disconnect | EventName::ReconnectFailed)
    }

    /// Events that update derived state before being relayed
    pub fn mutates_state(&self) -> bool {
        matches!(
            self,
            EventName::ControllerType
                | EventName::ControllerSettings
                | EventName::ControllerState
                | EventName::ConnectionOpen
                | EventName::ConnectionClose
                | EventName::WorkflowState
                | EventName::Startup
        ) || self.is_disconnect()
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a name outside the known event set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown event name: {0}")]
pub struct UnknownEventName(pub String);

/// An event as delivered by the transport
#[derive(Debug, Clone, PartialEq)]
pub struct RelayedEvent {
    /// Event name
    pub name: EventName,
    /// Event arguments, in order
    pub args: Vec<Value>,
}

impl RelayedEvent {
    /// Create a relayed event
    pub fn new(name: EventName, args: Vec<Value>) -> Self {
        Self { name, args }
    }

    /// Argument at `index`, if present
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }
}

/// Identity of a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({})", &self.0.to_string()[..8])
    }
}

type ListenerFn = dyn Fn(&[Value]) + Send + Sync;

/// A subscriber callback.
///
/// Clones share the same identity, so the handle used to register a
/// listener can later remove it.
#[derive(Clone)]
pub struct Listener {
    id: ListenerId,
    callback: Arc<ListenerFn>,
}

impl Listener {
    /// Wrap a callback in a new listener with a fresh identity
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        Self {
            id: ListenerId::new(),
            callback: Arc::new(callback),
        }
    }

    /// Identity of this listener
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Invoke the callback
    pub fn call(&self, args: &[Value]) {
        (self.callback)(args)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener").field(&self.id).finish()
    }
}
