//! Smoothieware report handling
//!
//! Smoothieware reports both positions in the currently selected units.

use super::{normalize, ControllerReport, PositionInterpreter};
use cnckit_core::{ControllerFamily, Position};

/// Position interpreter for Smoothieware
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothieInterpreter;

impl PositionInterpreter for SmoothieInterpreter {
    fn family(&self) -> ControllerFamily {
        ControllerFamily::Smoothie
    }

    fn machine_position(&self, report: &ControllerReport<'_>) -> Position {
        normalize(report.position("mpos"), report.modal_units())
    }

    fn work_position(&self, report: &ControllerReport<'_>) -> Position {
        normalize(report.position("wpos"), report.modal_units())
    }
}
