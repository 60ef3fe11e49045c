//! Client configuration
//!
//! Configuration is organized into two sections:
//! - Server settings (controller service URL, transport reconnection)
//! - Connection defaults (controller family, connection kind, baud rate,
//!   network port)
//!
//! Files are JSON or TOML, chosen by extension.

use crate::error::{Result, SettingsError};
use cnckit_communication::{ConnectOptions, OpenDefaults, OpenOptions};
use cnckit_communication::session::{DEFAULT_BAUD_RATE, DEFAULT_NETWORK_PORT};
use cnckit_core::{ConnectionKind, ControllerFamily};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Controller service URL used when none is configured
pub const DEFAULT_HOST: &str = "http://localhost:8000";

const APP_DIR: &str = "cnckit";
const CONFIG_FILE: &str = "config.toml";

/// Where the controller service lives and how to reach it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Service URL
    pub host: String,
    /// Options handed to the transport
    pub options: ConnectOptions,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            options: ConnectOptions::default(),
        }
    }
}

/// Defaults for opening a machine connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Controller family to open
    pub family: ControllerFamily,
    /// Serial or network connection
    pub kind: ConnectionKind,
    /// Baud rate for serial connections
    pub baud_rate: u32,
    /// Port for network connections
    pub port: u16,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            family: ControllerFamily::Grbl,
            kind: ConnectionKind::Serial,
            baud_rate: DEFAULT_BAUD_RATE,
            port: DEFAULT_NETWORK_PORT,
        }
    }
}

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Controller service settings
    pub server: ServerSettings,
    /// Machine connection defaults
    pub connection: ConnectionSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location under the platform config directory
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("No configuration directory on this platform".into())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load config from file, or the defaults if the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(SettingsError::invalid("server.host", "must not be empty"));
        }

        if self.server.options.timeout_ms == 0 {
            return Err(SettingsError::invalid("server.options.timeout_ms", "must be > 0"));
        }

        if self.connection.baud_rate == 0 {
            return Err(SettingsError::invalid("connection.baud_rate", "must be > 0"));
        }

        if self.connection.port == 0 {
            return Err(SettingsError::invalid("connection.port", "must be > 0"));
        }

        Ok(())
    }

    /// Defaults applied to open requests
    pub fn open_defaults(&self) -> OpenDefaults {
        OpenDefaults {
            baud_rate: self.connection.baud_rate,
            port: self.connection.port,
        }
    }

    /// Open options for `target` (a serial path or network host) using the
    /// configured connection kind
    pub fn open_options(&self, target: &str) -> OpenOptions {
        match self.connection.kind {
            ConnectionKind::Serial => OpenOptions::serial(target),
            ConnectionKind::Network => OpenOptions::network(target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(SettingsError::UnsupportedFormat(format!(
                "{} (expected .json or .toml)",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert!(config.server.options.reconnection);
        assert_eq!(config.connection.family, ControllerFamily::Grbl);
        assert_eq!(config.connection.baud_rate, 115200);
        assert_eq!(config.connection.port, 23);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zeroes() {
        let mut config = Config::new();
        config.connection.baud_rate = 0;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { ref key, .. }) if key == "connection.baud_rate"
        ));

        let mut config = Config::new();
        config.connection.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.server.options.timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.server.host = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_format_by_extension() {
        assert_eq!(Format::of(Path::new("a.json")).unwrap(), Format::Json);
        assert_eq!(Format::of(Path::new("a.toml")).unwrap(), Format::Toml);
        assert!(matches!(
            Format::of(Path::new("a.yaml")),
            Err(SettingsError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_open_defaults_and_options() {
        let mut config = Config::new();
        config.connection.baud_rate = 250_000;
        config.connection.kind = ConnectionKind::Network;

        assert_eq!(config.open_defaults().baud_rate, 250_000);
        assert_eq!(config.open_options("10.0.0.2").kind(), ConnectionKind::Network);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[connection]\nbaud_rate = 9600\n").unwrap();
        assert_eq!(config.connection.baud_rate, 9600);
        assert_eq!(config.connection.port, 23);
        assert_eq!(config.server.host, DEFAULT_HOST);
    }
}
