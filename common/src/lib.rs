pub mod config;
pub mod relay;
pub mod reporter;
pub mod schedule;
pub mod telemetry;
pub mod types;

pub use config::{ControllerConfig, TelemetryConfig};
pub use relay::{PlugStatus, RelayEngine, RelayFlag};
pub use reporter::MeteringReporter;
pub use schedule::ScheduleWindow;
pub use telemetry::{
    MeteringRecord, TelemetryError, TelemetryFields, TelemetrySink, VOLTAGE_PLACEHOLDER,
};
pub use types::{Level, MeterSample, OperatingMode, OutputId};
