use crate::{
    relay::RelayFlag,
    telemetry::MeteringRecord,
    types::MeterSample,
};

/// Gates the metering cycle to at most one report per interval.
///
/// Timestamps are millisecond counters from an arbitrary epoch; the elapsed
/// check uses wrapping subtraction so a counter rollover cannot stall the
/// reporter.
#[derive(Debug, Clone, Copy)]
pub struct MeteringReporter {
    interval_ms: u64,
    last_report_ms: u64,
}

impl MeteringReporter {
    pub fn new(interval_ms: u64, now_ms: u64) -> Self {
        Self {
            interval_ms,
            last_report_ms: now_ms,
        }
    }

    pub fn due(&self, now_ms: u64) -> bool {
        now_ms.wrapping_sub(self.last_report_ms) > self.interval_ms
    }

    pub fn mark_reported(&mut self, now_ms: u64) {
        self.last_report_ms = now_ms;
    }

    pub fn build_record(
        &self,
        sample: &MeterSample,
        relay_flag: RelayFlag,
        hour: i32,
    ) -> MeteringRecord {
        MeteringRecord::from_sample(sample, relay_flag, hour)
    }
}
