#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    Manual,
    Scheduled,
}

impl OperatingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "MANUAL",
            Self::Scheduled => "SCHEDULED",
        }
    }
}

/// The two controllable outputs. The pin number doubles as the wire
/// identifier in `/toggle?pin=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputId {
    Indicator,
    Relay,
}

impl OutputId {
    pub fn pin(self) -> u8 {
        match self {
            Self::Indicator => 2,
            Self::Relay => 12,
        }
    }

    /// Anything other than the two known pin numbers is rejected; the
    /// control surface treats that as a silent no-op.
    pub fn from_pin(pin: i64) -> Option<Self> {
        match pin {
            2 => Some(Self::Indicator),
            12 => Some(Self::Relay),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Indicator => "INDICATOR",
            Self::Relay => "RELAY",
        }
    }
}

/// Logical level of an output pin. The relay is wired active-low, so
/// `Low` means the relay coil is energized (ON).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn toggled(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }

    /// What a digital read of the pin would return.
    pub fn as_digit(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }
}

/// One reading of the five measurement accessors the energy sensor exposes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterSample {
    pub active_power_w: f32,
    pub voltage_v: f32,
    pub current_a: f32,
    pub apparent_power_va: f32,
    pub power_factor: f32,
}
