//! # CNCKit Core
//!
//! Core types shared by the CNCKit controller client:
//! positions and unit conversion, controller and connection identifiers,
//! event names, listener handles and the error taxonomy.

pub mod data;
pub mod error;
pub mod event;
pub mod types;
pub mod units;

pub use data::{
    ConnectionKind, ControllerFamily, Position, Session, WorkflowState, AXES, DEFAULT_AXIS_VALUE,
};

pub use data::values::ValueMap;

pub use error::{ConnectionError, ControllerError, Error, RemoteError, Result};

pub use event::{EventName, Listener, ListenerId, RelayedEvent, UnknownEventName};

pub use types::{
    thread_safe, thread_safe_rw, AckCallback, AckResult, EventSink, ReadyCallback, ThreadSafe,
    ThreadSafeRw,
};

pub use units::{inches_to_millimeters, MeasurementSystem, MM_PER_INCH};
