use serde::Serialize;
use thiserror::Error;

use crate::{relay::RelayFlag, types::MeterSample};

/// The metered voltage is not trusted upstream; the channel carries a fixed
/// nominal mains value instead.
pub const VOLTAGE_PLACEHOLDER: &str = "230";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("telemetry transport error: {0}")]
    Transport(String),
    #[error("telemetry endpoint rejected update (status {0})")]
    Rejected(u16),
}

/// One report cycle's snapshot. Built fresh each cycle and handed straight
/// to the sink; nothing retains it afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeteringRecord {
    pub active_power_w: f32,
    pub current_a: f32,
    pub apparent_power_va: f32,
    pub power_factor: f32,
    pub relay_flag: RelayFlag,
    pub hour: i32,
}

impl MeteringRecord {
    pub fn from_sample(sample: &MeterSample, relay_flag: RelayFlag, hour: i32) -> Self {
        Self {
            active_power_w: sample.active_power_w,
            current_a: sample.current_a,
            apparent_power_va: sample.apparent_power_va,
            power_factor: sample.power_factor,
            relay_flag,
            hour,
        }
    }

    pub fn fields(&self) -> TelemetryFields {
        TelemetryFields {
            field1: self.active_power_w,
            field2: VOLTAGE_PLACEHOLDER,
            field3: self.current_a,
            field4: self.apparent_power_va,
            field5: self.power_factor,
            field6: self.relay_flag.as_digit(),
            field7: self.hour,
        }
    }
}

/// The seven channel fields, in their fixed wire order. Field numbering is
/// part of the channel contract and must not shift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetryFields {
    pub field1: f32,
    pub field2: &'static str,
    pub field3: f32,
    pub field4: f32,
    pub field5: f32,
    pub field6: u8,
    pub field7: i32,
}

/// Seam for the telemetry transport. Submission is fire-and-forget at the
/// call site; a retry/backoff decorator can wrap a sink without the control
/// loop noticing.
pub trait TelemetrySink {
    fn submit(
        &self,
        record: &MeteringRecord,
    ) -> impl std::future::Future<Output = Result<(), TelemetryError>> + Send;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> MeterSample {
        MeterSample {
            active_power_w: 1150.0,
            voltage_v: 236.4,
            current_a: 5.1,
            apparent_power_va: 1205.0,
            power_factor: 0.95,
        }
    }

    #[test]
    fn measured_voltage_is_replaced_by_placeholder() {
        let record = MeteringRecord::from_sample(&sample(), RelayFlag::On, 14);
        let fields = record.fields();

        assert_eq!(fields.field2, "230");
        assert_eq!(fields.field1, 1150.0);
        assert_eq!(fields.field3, 5.1);
    }

    #[test]
    fn field_order_and_naming_are_stable() {
        let record = MeteringRecord::from_sample(&sample(), RelayFlag::Off, 20);
        let value = serde_json::to_value(record.fields()).unwrap();
        let object = value.as_object().unwrap();

        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "field1", "field2", "field3", "field4", "field5", "field6", "field7"
            ]
        );
        assert_eq!(object["field6"], 1);
        assert_eq!(object["field7"], 20);
    }
}
