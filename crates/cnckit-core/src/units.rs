//! Unit conversion utilities
//!
//! Handles conversion between Metric (mm) and Imperial (inch) systems for
//! positions reported as fixed-precision decimal strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    #[default]
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl MeasurementSystem {
    /// Resolve the modal units word reported by a controller.
    ///
    /// `G20` selects inches and `G21` selects millimeters. Anything else is
    /// unknown and yields `None`.
    pub fn from_modal(word: &str) -> Option<Self> {
        match word {
            "G20" => Some(Self::Imperial),
            "G21" => Some(Self::Metric),
            _ => None,
        }
    }

}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

/// Format a length to three decimal places
pub fn format_length(value: f64) -> String {
    format!("{:.3}", value)
}

/// Convert an inch-valued decimal string to a millimeter decimal string.
///
/// The result is formatted to three decimal places, matching the way
/// controllers report positions. Input that does not parse as a number, or
/// whose conversion is not finite, is returned unchanged.
pub fn inches_to_millimeters(inches: &str) -> String {
    match inches.trim().parse::<f64>().map(|value| value * MM_PER_INCH) {
        Ok(millimeters) if millimeters.is_finite() => format_length(millimeters),
        _ => inches.to_string(),
    }
}
