//! # CNCKit
//!
//! Client for a CNC controller service. The service owns the serial and
//! network links to the machines; this library keeps one live session with
//! it and presents:
//! - a relay from the service's pushed events to application listeners
//! - the open machine connection and its identifier
//! - firmware-aware machine and work positions, always in millimeters
//!   (Grbl, Smoothieware, TinyG)
//! - forwarding of commands and raw writes to the open connection
//!
//! ## Architecture
//!
//! 1. **cnckit-core** - Positions, identifiers, event names, units, errors
//! 2. **cnckit-communication** - Transport contract, listener registry,
//!    sessions, firmware interpreters and the [`ControllerFacade`]
//! 3. **cnckit-settings** - Configuration files
//! 4. **cnckit** - Re-exports and logging setup

pub use cnckit_communication::firmware;
pub use cnckit_core::data;

pub use cnckit_core::{
    inches_to_millimeters, ConnectionError, ConnectionKind, ControllerError, ControllerFamily,
    Error, EventName, Listener, ListenerId, MeasurementSystem, Position, RelayedEvent,
    RemoteError, Result, Session, WorkflowState,
};

pub use cnckit_communication::{
    Command, ConnectOptions, ControllerFacade, ControllerFacadeBuilder, LinkState,
    ListenerRegistry, OpenDefaults, OpenOptions, StartupInfo, Transport, TransportConnector,
};

pub use cnckit_settings::{Config, ConnectionSettings, ServerSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Initialize logging as one JSON object per line, for log collectors
pub fn init_json_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_current_span(false))
        .try_init()?;

    Ok(())
}
