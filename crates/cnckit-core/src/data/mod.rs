//! Data models for positions, sessions and controller identity
//!
//! This module provides:
//! - Six-axis positions kept as fixed-precision display strings
//! - Controller family and connection kind identifiers
//! - Workflow state
//! - The live connection session record
//! - Lenient helpers for opaque report payloads

pub mod values;

use crate::error::ConnectionError;
use crate::units::inches_to_millimeters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use values::{scalar_text, ValueMap};

pub use values::{coerce_number, ensure_array, map_values, non_empty_str, sub_map};

/// Axis names of a position, in display order
pub const AXES: [&str; 6] = ["x", "y", "z", "a", "b", "c"];

/// Value of an axis that has not been reported
pub const DEFAULT_AXIS_VALUE: &str = "0.000";

/// A machine or work position.
///
/// Components are decimal strings (`"12.500"`), not numbers: consumers
/// display them as reported. A position always carries the six axes
/// `x y z a b c`; reports may add further axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position {
    axes: BTreeMap<String, String>,
}

impl Position {
    /// Create the all-zero position
    pub fn new() -> Self {
        Self {
            axes: AXES
                .iter()
                .map(|axis| (axis.to_string(), DEFAULT_AXIS_VALUE.to_string()))
                .collect(),
        }
    }

    /// Build a position from an optional report sub-map, starting from zero
    pub fn from_report(report: Option<&ValueMap>) -> Self {
        match report {
            Some(report) => Self::new().overlay(report),
            None => Self::new(),
        }
    }

    /// Replace axes with the values present in `report`.
    ///
    /// String and numeric values are taken as reported; other shapes keep
    /// the current value.
    pub fn overlay(mut self, report: &ValueMap) -> Self {
        for (axis, value) in report {
            if let Some(text) = scalar_text(value) {
                self.axes.insert(axis.clone(), text);
            }
        }
        self
    }

    /// Apply `f` to every axis value
    pub fn map_values<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        Self {
            axes: map_values(&self.axes, |value| f(value.as_str())),
        }
    }

    /// Convert every axis from inches to millimeters
    pub fn to_millimeters(&self) -> Self {
        self.map_values(inches_to_millimeters)
    }

    /// Set one axis value
    pub fn with_axis(mut self, axis: &str, value: impl Into<String>) -> Self {
        self.axes.insert(axis.to_string(), value.into());
        self
    }

    /// Get an axis value
    pub fn get(&self, axis: &str) -> Option<&str> {
        self.axes.get(axis).map(String::as_str)
    }

    fn axis_or_default(&self, axis: &str) -> &str {
        self.get(axis).unwrap_or(DEFAULT_AXIS_VALUE)
    }

    /// X-axis value
    pub fn x(&self) -> &str {
        self.axis_or_default("x")
    }

    /// Y-axis value
    pub fn y(&self) -> &str {
        self.axis_or_default("y")
    }

    /// Z-axis value
    pub fn z(&self) -> &str {
        self.axis_or_default("z")
    }

    /// A-axis value
    pub fn a(&self) -> &str {
        self.axis_or_default("a")
    }

    /// B-axis value
    pub fn b(&self) -> &str {
        self.axis_or_default("b")
    }

    /// C-axis value
    pub fn c(&self) -> &str {
        self.axis_or_default("c")
    }

    /// Iterate over all axes
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.axes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of axes
    pub fn len(&self) -> usize {
        self.axes.len()
    }

    /// Whether the position carries no axes
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X:{} Y:{} Z:{} A:{} B:{} C:{}",
            self.x(),
            self.y(),
            self.z(),
            self.a(),
            self.b(),
            self.c()
        )
    }
}

/// Controller firmware family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControllerFamily {
    /// No controller reported yet
    #[default]
    None,
    /// Grbl
    Grbl,
    /// Smoothieware
    Smoothie,
    /// TinyG / g2core
    TinyG,
}

impl ControllerFamily {
    /// Families a session can be opened with
    pub const KNOWN: [ControllerFamily; 3] = [Self::Grbl, Self::Smoothie, Self::TinyG];

    /// Resolve a family from the name used on the wire.
    ///
    /// Unrecognized names resolve to `None`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Grbl" => Self::Grbl,
            "Smoothie" => Self::Smoothie,
            "TinyG" => Self::TinyG,
            _ => Self::None,
        }
    }

    /// Name used on the wire (empty for `None`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Grbl => "Grbl",
            Self::Smoothie => "Smoothie",
            Self::TinyG => "TinyG",
        }
    }

    /// Whether this is one of the supported families
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for ControllerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Physical connection kind of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// Serial/USB port
    #[serde(rename = "serial")]
    Serial,
    /// Network socket
    #[serde(rename = "socket", alias = "network")]
    Network,
}

impl ConnectionKind {
    /// Resolve a kind from the name used on the wire
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "serial" => Some(Self::Serial),
            "socket" | "network" => Some(Self::Network),
            _ => None,
        }
    }

    /// Name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::Network => "socket",
        }
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionKind {
    type Err = ConnectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ConnectionError::UnknownKind {
            kind: s.to_string(),
        })
    }
}

/// Program execution state reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowState {
    /// Nothing running
    #[default]
    Idle,
    /// A program is running
    Running,
    /// A program is paused
    Paused,
}

impl WorkflowState {
    /// Resolve a state from the name used on the wire
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "idle" => Some(Self::Idle),
            "running" => Some(Self::Running),
            "paused" => Some(Self::Paused),
            _ => None,
        }
    }

    /// Name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The live connection session.
///
/// An empty identifier means no connection is open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Identifier issued by the service when the connection opened
    pub ident: String,
    /// Connection kind
    pub kind: Option<ConnectionKind>,
    /// Connection-specific settings (port, baud rate, host, ...)
    pub settings: ValueMap,
}

impl Session {
    /// Whether a connection is open
    pub fn is_open(&self) -> bool {
        !self.ident.is_empty()
    }

    /// Forget the session
    pub fn clear(&mut self) {
        self.ident.clear();
        self.kind = None;
        self.settings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_position() {
        let pos = Position::default();
        assert_eq!(pos.len(), 6);
        for axis in AXES {
            assert_eq!(pos.get(axis), Some(DEFAULT_AXIS_VALUE));
        }
    }

    #[test]
    fn test_overlay_keeps_missing_axes() {
        let report = json!({"x": "10.000", "z": 3.5, "y": null});
        let pos = Position::from_report(report.as_object());
        assert_eq!(pos.x(), "10.000");
        assert_eq!(pos.y(), "0.000");
        assert_eq!(pos.z(), "3.5");
        assert_eq!(pos.c(), "0.000");
    }

    #[test]
    fn test_overlay_keeps_extra_axes() {
        let report = json!({"u": "1.000"});
        let pos = Position::from_report(report.as_object());
        assert_eq!(pos.len(), 7);
        assert_eq!(pos.get("u"), Some("1.000"));
    }

    #[test]
    fn test_to_millimeters() {
        let pos = Position::new().with_axis("x", "1.000");
        let mm = pos.to_millimeters();
        assert_eq!(mm.x(), "25.400");
        assert_eq!(mm.y(), "0.000");
    }

    #[test]
    fn test_position_display() {
        let pos = Position::new().with_axis("x", "1.000");
        assert_eq!(
            pos.to_string(),
            "X:1.000 Y:0.000 Z:0.000 A:0.000 B:0.000 C:0.000"
        );
    }

    #[test]
    fn test_family_names() {
        assert_eq!(ControllerFamily::from_name("Grbl"), ControllerFamily::Grbl);
        assert_eq!(
            ControllerFamily::from_name("Smoothie"),
            ControllerFamily::Smoothie
        );
        assert_eq!(ControllerFamily::from_name("TinyG"), ControllerFamily::TinyG);
        assert_eq!(ControllerFamily::from_name("Marlin"), ControllerFamily::None);
        assert!(!ControllerFamily::None.is_known());
        assert_eq!(ControllerFamily::None.as_str(), "");
    }

    #[test]
    fn test_connection_kind_names() {
        assert_eq!(ConnectionKind::from_name("serial"), Some(ConnectionKind::Serial));
        assert_eq!(ConnectionKind::from_name("socket"), Some(ConnectionKind::Network));
        assert_eq!(ConnectionKind::from_name("usb"), None);
        assert_eq!("network".parse::<ConnectionKind>(), Ok(ConnectionKind::Network));
        assert_eq!(
            "usb".parse::<ConnectionKind>(),
            Err(ConnectionError::UnknownKind {
                kind: "usb".to_string()
            })
        );
        assert_eq!(
            serde_json::to_value(ConnectionKind::Network).unwrap(),
            json!("socket")
        );
    }

    #[test]
    fn test_session_clear() {
        let mut session = Session {
            ident: "abc".to_string(),
            kind: Some(ConnectionKind::Serial),
            settings: json!({"path": "/dev/ttyUSB0"}).as_object().unwrap().clone(),
        };
        assert!(session.is_open());
        session.clear();
        assert!(!session.is_open());
        assert_eq!(session, Session::default());
    }
}
