//! CNCKit Settings Crate
//!
//! Loads, validates and saves the client configuration: where the controller
//! service lives, how the transport reconnects, and the defaults applied when
//! opening a machine connection.

pub mod config;
pub mod error;

pub use config::{Config, ConnectionSettings, ServerSettings, DEFAULT_HOST};
pub use error::{Result, SettingsError};
