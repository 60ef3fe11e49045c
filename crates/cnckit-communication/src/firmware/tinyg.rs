//! TinyG report handling
//!
//! TinyG reports the canonical machine position in millimeters with no
//! offsets, whatever units are selected. The work position is reported in
//! the selected units with offsets applied, so only it is converted.

use super::{normalize, ControllerReport, PositionInterpreter};
use cnckit_core::{ControllerFamily, MeasurementSystem, Position};

/// Position interpreter for TinyG
#[derive(Debug, Clone, Copy, Default)]
pub struct TinyGInterpreter;

impl PositionInterpreter for TinyGInterpreter {
    fn family(&self) -> ControllerFamily {
        ControllerFamily::TinyG
    }

    fn machine_position(&self, report: &ControllerReport<'_>) -> Position {
        normalize(report.position("mpos"), Some(MeasurementSystem::Metric))
    }

    fn work_position(&self, report: &ControllerReport<'_>) -> Position {
        normalize(report.position("wpos"), report.modal_units())
    }
}
