//! Grbl report handling
//!
//! Grbl reports positions in millimeters unless the `$13` setting
//! (report in inches) is enabled.

use super::{normalize, ControllerReport, PositionInterpreter};
use cnckit_core::data::{coerce_number, sub_map};
use cnckit_core::{ControllerFamily, MeasurementSystem, Position};

/// Setting that switches status reports to inches
pub const REPORT_INCHES_SETTING: &str = "$13";

/// Position interpreter for Grbl
#[derive(Debug, Clone, Copy, Default)]
pub struct GrblInterpreter;

impl GrblInterpreter {
    /// Whether the controller reports positions in inches.
    ///
    /// Reads `$13` from the nested `settings` map, then from the top level.
    /// Missing or non-numeric values count as zero.
    pub fn reports_inches(report: &ControllerReport<'_>) -> bool {
        let value = sub_map(report.settings, "settings")
            .and_then(|settings| settings.get(REPORT_INCHES_SETTING))
            .or_else(|| report.settings.get(REPORT_INCHES_SETTING));
        coerce_number(value) > 0.0
    }

    fn report_units(report: &ControllerReport<'_>) -> MeasurementSystem {
        if Self::reports_inches(report) {
            MeasurementSystem::Imperial
        } else {
            MeasurementSystem::Metric
        }
    }
}

impl PositionInterpreter for GrblInterpreter {
    fn family(&self) -> ControllerFamily {
        ControllerFamily::Grbl
    }

    fn machine_position(&self, report: &ControllerReport<'_>) -> Position {
        normalize(report.position("mpos"), Some(Self::report_units(report)))
    }

    fn work_position(&self, report: &ControllerReport<'_>) -> Position {
        normalize(report.position("wpos"), Some(Self::report_units(report)))
    }
}
