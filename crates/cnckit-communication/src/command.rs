//! Well-known command names
//!
//! [`crate::ControllerFacade::command`] accepts any string; these are the
//! commands the controller service understands out of the box.

use std::fmt;

/// A command understood by the controller service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Load a G-code program: `(name, gcode, context?)`
    GcodeLoad,
    /// Unload the G-code program
    GcodeUnload,
    /// Start sending the loaded program
    GcodeStart,
    /// Stop sending: `({force})?`
    GcodeStop,
    /// Pause sending
    GcodePause,
    /// Resume sending
    GcodeResume,
    /// Run raw G-code: `(gcode, context?)`
    Gcode,
    /// Feed the next queued line
    FeederFeed,
    /// Start the feeder
    FeederStart,
    /// Stop the feeder
    FeederStop,
    /// Feed hold
    FeedHold,
    /// Cycle start
    CycleStart,
    /// Request a status report
    StatusReport,
    /// Run the homing cycle
    Homing,
    /// Enter sleep mode
    Sleep,
    /// Clear an alarm lock
    Unlock,
    /// Soft reset
    Reset,
    /// Adjust the feed override
    FeedOverride,
    /// Adjust the spindle override
    SpindleOverride,
    /// Adjust the rapid override
    RapidOverride,
    /// Energize the motors
    EnergizeMotorsOn,
    /// De-energize the motors
    EnergizeMotorsOff,
    /// Load a macro: `(macro_id, context?)`
    MacroLoad,
    /// Run a macro: `(macro_id, context?)`
    MacroRun,
    /// Load a file from a watch directory: `(path)`
    WatchDirLoad,
}

impl Command {
    /// Name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GcodeLoad => "gcode:load",
            Self::GcodeUnload => "gcode:unload",
            Self::GcodeStart => "gcode:start",
            Self::GcodeStop => "gcode:stop",
            Self::GcodePause => "gcode:pause",
            Self::GcodeResume => "gcode:resume",
            Self::Gcode => "gcode",
            Self::FeederFeed => "feeder:feed",
            Self::FeederStart => "feeder:start",
            Self::FeederStop => "feeder:stop",
            Self::FeedHold => "feedhold",
            Self::CycleStart => "cyclestart",
            Self::StatusReport => "statusreport",
            Self::Homing => "homing",
            Self::Sleep => "sleep",
            Self::Unlock => "unlock",
            Self::Reset => "reset",
            Self::FeedOverride => "feedOverride",
            Self::SpindleOverride => "spindleOverride",
            Self::RapidOverride => "rapidOverride",
            Self::EnergizeMotorsOn => "energizeMotors:on",
            Self::EnergizeMotorsOff => "energizeMotors:off",
            Self::MacroLoad => "macro:load",
            Self::MacroRun => "macro:run",
            Self::WatchDirLoad => "watchdir:load",
        }
    }
}

impl AsRef<str> for Command {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
