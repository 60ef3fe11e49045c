//! # CNCKit Communication
//!
//! Client side of a controller service session:
//! - the transport contract the reconnecting event link must satisfy
//! - the listener registry that relays pushed events to the application
//! - connection session tracking
//! - per-firmware interpretation of Grbl, Smoothieware and TinyG reports
//! - the [`ControllerFacade`] tying them together

pub mod command;
pub mod controller;
pub mod firmware;
pub mod registry;
pub mod session;
pub mod transport;

pub use command::Command;
pub use controller::{
    ControllerFacade, ControllerFacadeBuilder, LinkState, StartupInfo, DEFAULT_EVENT_CAPACITY,
};
pub use firmware::{
    interpreter_for, ControllerReport, ControllerStateModel, GrblInterpreter, PositionInterpreter,
    SmoothieInterpreter, TinyGInterpreter,
};
pub use registry::{invoke_isolated, ListenerRegistry};
pub use session::{ConnectionSession, OpenDefaults, OpenOptions};
pub use transport::{ConnectOptions, Transport, TransportConnector};
