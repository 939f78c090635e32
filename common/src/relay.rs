use crate::{
    schedule::ScheduleWindow,
    types::{Level, OperatingMode, OutputId},
};

/// Scheduler decision flag as it appears in telemetry: 0 = ON, 1 = OFF.
/// The value tracks the last *scheduled* decision only; manual toggles do
/// not touch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayFlag {
    On,
    Off,
}

impl RelayFlag {
    pub fn as_digit(self) -> u8 {
        match self {
            Self::On => 0,
            Self::Off => 1,
        }
    }
}

/// Snapshot of everything the status page and the diagnostic log need,
/// cloned out while the engine lock is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlugStatus {
    pub indicator: Level,
    pub relay: Level,
    pub mode: OperatingMode,
    pub window: ScheduleWindow,
}

/// All volatile controller state: output levels, operating mode, schedule
/// window, and the scheduler's last decision.
///
/// Ownership discipline: while the mode is `Manual` only the control surface
/// changes the relay; while `Scheduled`, only `apply_schedule` does (a manual
/// toggle is still honored immediately, but the next scheduled pass may
/// overwrite it).
#[derive(Debug, Clone)]
pub struct RelayEngine {
    mode: OperatingMode,
    window: ScheduleWindow,
    indicator: Level,
    relay: Level,
    relay_flag: RelayFlag,
}

impl RelayEngine {
    /// Boot state mirrors the hardware defaults: both outputs driven High
    /// (relay de-energized), time-based control active.
    pub fn new(window: ScheduleWindow) -> Self {
        Self {
            mode: OperatingMode::Scheduled,
            window,
            indicator: Level::High,
            relay: Level::High,
            relay_flag: RelayFlag::On,
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn window(&self) -> ScheduleWindow {
        self.window
    }

    pub fn level(&self, id: OutputId) -> Level {
        match id {
            OutputId::Indicator => self.indicator,
            OutputId::Relay => self.relay,
        }
    }

    /// The relay is active-low.
    pub fn relay_is_on(&self) -> bool {
        self.relay == Level::Low
    }

    pub fn relay_flag(&self) -> RelayFlag {
        self.relay_flag
    }

    /// Manual escape hatch: inverts the output unconditionally, even while
    /// scheduled control is active.
    pub fn toggle_output(&mut self, id: OutputId) {
        match id {
            OutputId::Indicator => self.indicator = self.indicator.toggled(),
            OutputId::Relay => self.relay = self.relay.toggled(),
        }
    }

    pub fn set_mode(&mut self, mode: OperatingMode) -> bool {
        if self.mode != mode {
            self.mode = mode;
            true
        } else {
            false
        }
    }

    /// Overwrites the window verbatim. Hours are not range-checked; the
    /// comparison in `ScheduleWindow::contains` takes them as-is.
    pub fn set_window(&mut self, start_hour: i32, end_hour: i32) {
        self.window = ScheduleWindow {
            start_hour,
            end_hour,
        };
    }

    /// One scheduler pass. In `Manual` mode the relay is left exactly as
    /// last commanded and `None` is returned; in `Scheduled` mode the relay
    /// is driven from the window and the decision is recorded for telemetry.
    pub fn apply_schedule(&mut self, hour: i32) -> Option<RelayFlag> {
        if self.mode == OperatingMode::Manual {
            return None;
        }

        if self.window.contains(hour) {
            self.relay = Level::Low;
            self.relay_flag = RelayFlag::On;
        } else {
            self.relay = Level::High;
            self.relay_flag = RelayFlag::Off;
        }
        Some(self.relay_flag)
    }

    pub fn status(&self) -> PlugStatus {
        PlugStatus {
            indicator: self.indicator,
            relay: self.relay,
            mode: self.mode,
            window: self.window,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn engine() -> RelayEngine {
        RelayEngine::new(ScheduleWindow::default())
    }

    #[test]
    fn scheduled_relay_follows_window_for_every_hour() {
        let mut engine = engine();
        for hour in 0..24 {
            engine.apply_schedule(hour);
            assert_eq!(engine.relay_is_on(), (12..18).contains(&hour), "hour {hour}");
        }
    }

    #[test]
    fn afternoon_window_scenarios() {
        let mut engine = engine();

        assert_eq!(engine.apply_schedule(14), Some(RelayFlag::On));
        assert!(engine.relay_is_on());
        assert_eq!(engine.relay_flag().as_digit(), 0);

        assert_eq!(engine.apply_schedule(20), Some(RelayFlag::Off));
        assert!(!engine.relay_is_on());
        assert_eq!(engine.relay_flag().as_digit(), 1);
    }

    #[test]
    fn manual_mode_freezes_relay_across_passes() {
        let mut engine = engine();
        engine.set_mode(OperatingMode::Manual);
        engine.toggle_output(OutputId::Relay);
        assert!(engine.relay_is_on());

        for pass in 0..100 {
            let hour = 10 + (pass / 10) as i32; // clock drifting from 10 to 19
            assert_eq!(engine.apply_schedule(hour), None);
            assert!(engine.relay_is_on(), "pass {pass}");
        }
    }

    #[test]
    fn toggle_flips_exactly_one_output() {
        let mut engine = engine();
        engine.toggle_output(OutputId::Indicator);

        assert_eq!(engine.level(OutputId::Indicator), Level::Low);
        assert_eq!(engine.level(OutputId::Relay), Level::High);
    }

    #[test]
    fn toggle_pair_is_idempotent() {
        let mut engine = engine();
        let before = engine.level(OutputId::Relay);

        engine.toggle_output(OutputId::Relay);
        engine.toggle_output(OutputId::Relay);

        assert_eq!(engine.level(OutputId::Relay), before);
    }

    #[test]
    fn manual_toggle_in_scheduled_mode_is_honored_then_reverted() {
        let mut engine = engine();
        engine.apply_schedule(20);
        assert!(!engine.relay_is_on());

        // Direct flip lands immediately even though scheduling is active...
        engine.toggle_output(OutputId::Relay);
        assert!(engine.relay_is_on());

        // ...and the next scheduled pass takes the relay back.
        engine.apply_schedule(20);
        assert!(!engine.relay_is_on());
    }

    #[test]
    fn relay_flag_ignores_manual_toggles() {
        let mut engine = engine();
        engine.apply_schedule(14);
        assert_eq!(engine.relay_flag(), RelayFlag::On);

        engine.set_mode(OperatingMode::Manual);
        engine.toggle_output(OutputId::Relay);
        engine.apply_schedule(20);

        assert_eq!(engine.relay_flag(), RelayFlag::On);
    }

    #[test]
    fn set_mode_reports_change() {
        let mut engine = engine();
        assert!(engine.set_mode(OperatingMode::Manual));
        assert!(!engine.set_mode(OperatingMode::Manual));
        assert!(engine.set_mode(OperatingMode::Scheduled));
    }

    #[test]
    fn set_window_accepts_out_of_range_hours_verbatim() {
        let mut engine = engine();
        engine.set_window(25, -3);

        assert_eq!(
            engine.window(),
            ScheduleWindow {
                start_hour: 25,
                end_hour: -3
            }
        );
        engine.apply_schedule(14);
        assert!(!engine.relay_is_on());
    }
}
