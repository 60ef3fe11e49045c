//! Controller state model
//!
//! Holds the last controller family, firmware settings and live state the
//! service reported, and derives normalized readings from them.

use super::{interpreter_for, ControllerReport, PositionInterpreter, DEFAULT_WCS};
use cnckit_core::{ControllerFamily, Position, ValueMap};
use serde_json::Value;

/// Last-known controller identity, settings and state
#[derive(Debug, Clone, Default)]
pub struct ControllerStateModel {
    family: ControllerFamily,
    settings: ValueMap,
    state: ValueMap,
}

impl ControllerStateModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Current controller family
    pub fn family(&self) -> ControllerFamily {
        self.family
    }

    /// Last reported firmware settings
    pub fn settings(&self) -> &ValueMap {
        &self.settings
    }

    /// Last reported live state
    pub fn state(&self) -> &ValueMap {
        &self.state
    }

    /// Record the family named in a controller event
    pub fn set_family(&mut self, name: Option<&Value>) {
        self.family = name
            .and_then(Value::as_str)
            .map(ControllerFamily::from_name)
            .unwrap_or_default();
    }

    /// Replace the firmware settings
    pub fn replace_settings(&mut self, settings: Option<&Value>) {
        self.settings = settings.and_then(Value::as_object).cloned().unwrap_or_default();
    }

    /// Replace the live state. Reports are never merged.
    pub fn replace_state(&mut self, state: Option<&Value>) {
        self.state = state.and_then(Value::as_object).cloned().unwrap_or_default();
    }

    /// Forget everything reported so far
    pub fn reset(&mut self) {
        self.family = ControllerFamily::None;
        self.settings.clear();
        self.state.clear();
    }

    fn interpreter(&self) -> Option<&'static dyn PositionInterpreter> {
        interpreter_for(self.family)
    }

    fn report(&self) -> ControllerReport<'_> {
        ControllerReport::new(&self.settings, &self.state)
    }

    /// Machine state, or an empty string when no controller is known or no
    /// session is open
    pub fn machine_state(&self, session_open: bool) -> String {
        match self.interpreter() {
            Some(interpreter) if session_open => interpreter.machine_state(&self.report()),
            _ => String::new(),
        }
    }

    /// Machine position in millimeters
    pub fn machine_position(&self) -> Position {
        self.interpreter()
            .map(|interpreter| interpreter.machine_position(&self.report()))
            .unwrap_or_default()
    }

    /// Work position in millimeters
    pub fn work_position(&self) -> Position {
        self.interpreter()
            .map(|interpreter| interpreter.work_position(&self.report()))
            .unwrap_or_default()
    }

    /// Active work coordinate system, `G54` when unknown
    pub fn work_coordinate_system(&self) -> String {
        self.interpreter()
            .map(|interpreter| interpreter.work_coordinate_system(&self.report()))
            .unwrap_or_else(|| DEFAULT_WCS.to_string())
    }
}
