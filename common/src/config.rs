use crate::schedule::ScheduleWindow;

/// Compiled-in controller defaults. Nothing here is persisted; a restart
/// returns every field to these values. Deployment-specific overrides come
/// from environment variables read at startup.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Minimum elapsed time between telemetry report cycles.
    pub report_interval_ms: u64,
    pub default_window: ScheduleWindow,
    pub http_port: u16,
    pub timezone: String,
    pub telemetry: TelemetryConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            report_interval_ms: 2_000,
            default_window: ScheduleWindow::default(),
            http_port: 8080,
            timezone: "America/Los_Angeles".to_string(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub endpoint: String,
    pub channel_id: u64,
    pub write_key: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.thingspeak.com".to_string(),
            channel_id: 0,
            write_key: String::new(),
        }
    }
}
