//! Firmware-specific interpretation of controller reports
//!
//! Supported controllers:
//! - Grbl: positions follow the `$13` report-inches setting
//! - Smoothieware: positions follow the modal units
//! - TinyG: machine position is always millimeters, work position follows
//!   the modal units
//!
//! Each family implements [`PositionInterpreter`]; [`interpreter_for`] is
//! the lookup from [`ControllerFamily`] to its implementation.

pub mod grbl;
pub mod smoothieware;
pub mod state;
pub mod tinyg;

pub use grbl::GrblInterpreter;
pub use smoothieware::SmoothieInterpreter;
pub use state::ControllerStateModel;
pub use tinyg::TinyGInterpreter;

use cnckit_core::data::{non_empty_str, sub_map, values::scalar_text};
use cnckit_core::{ControllerFamily, MeasurementSystem, Position, ValueMap};

/// Work coordinate system reported when none is known
pub const DEFAULT_WCS: &str = "G54";

/// The last settings and state reported by a controller
#[derive(Debug, Clone, Copy)]
pub struct ControllerReport<'a> {
    /// Firmware settings
    pub settings: &'a ValueMap,
    /// Live machine state
    pub state: &'a ValueMap,
}

impl<'a> ControllerReport<'a> {
    /// Create a report view
    pub fn new(settings: &'a ValueMap, state: &'a ValueMap) -> Self {
        Self { settings, state }
    }

    /// The modal group sub-map of the state
    pub fn modal(&self) -> Option<&'a ValueMap> {
        sub_map(self.state, "modal")
    }

    /// Units selected by the modal group (`G20`/`G21`)
    pub fn modal_units(&self) -> Option<MeasurementSystem> {
        self.modal()
            .and_then(|modal| non_empty_str(modal, "units"))
            .and_then(MeasurementSystem::from_modal)
    }

    /// Reported position sub-map (`mpos` or `wpos`).
    ///
    /// Falls back to the same key under a nested `status` report.
    pub fn position(&self, key: &str) -> Option<&'a ValueMap> {
        sub_map(self.state, key).or_else(|| {
            sub_map(self.state, "status").and_then(|status| sub_map(status, key))
        })
    }
}

/// Per-family interpretation of a controller report
pub trait PositionInterpreter: Send + Sync {
    /// Family this interpreter handles
    fn family(&self) -> ControllerFamily;

    /// Machine position in millimeters
    fn machine_position(&self, report: &ControllerReport<'_>) -> Position;

    /// Work position in millimeters
    fn work_position(&self, report: &ControllerReport<'_>) -> Position;

    /// Machine state as reported (e.g. `Idle`, `Run`, `Alarm`)
    fn machine_state(&self, report: &ControllerReport<'_>) -> String {
        report
            .state
            .get("machineState")
            .and_then(scalar_text)
            .unwrap_or_default()
    }

    /// Active work coordinate system (G54-G59)
    fn work_coordinate_system(&self, report: &ControllerReport<'_>) -> String {
        report
            .modal()
            .and_then(|modal| non_empty_str(modal, "wcs"))
            .unwrap_or(DEFAULT_WCS)
            .to_string()
    }
}

static GRBL: GrblInterpreter = GrblInterpreter;
static SMOOTHIE: SmoothieInterpreter = SmoothieInterpreter;
static TINYG: TinyGInterpreter = TinyGInterpreter;

/// Interpreter for `family`, or `None` when no controller is known
pub fn interpreter_for(family: ControllerFamily) -> Option<&'static dyn PositionInterpreter> {
    match family {
        ControllerFamily::Grbl => Some(&GRBL),
        ControllerFamily::Smoothie => Some(&SMOOTHIE),
        ControllerFamily::TinyG => Some(&TINYG),
        ControllerFamily::None => None,
    }
}

/// Overlay `reported` on the zero position, converting to millimeters when
/// the values are in inches
pub(crate) fn normalize(reported: Option<&ValueMap>, units: Option<MeasurementSystem>) -> Position {
    let position = Position::from_report(reported);
    match units {
        Some(MeasurementSystem::Imperial) => position.to_millimeters(),
        _ => position,
    }
}
