use powerplug_common::MeterSample;

/// Read access to the pulse-counting energy monitor. The chip measures
/// voltage and current through a shared pulse pin, so it samples one of the
/// two at a time; `toggle_mode` flips the active phase and is invoked once
/// after every report cycle.
pub trait PowerMeter {
    fn sample(&mut self) -> MeterSample;
    fn toggle_mode(&mut self);
}

/// Host stand-in for the metering chip.
pub struct SimulatedMeter {
    tick: u64,
    current_phase: bool,
}

impl SimulatedMeter {
    pub fn new() -> Self {
        Self {
            tick: 0,
            current_phase: true,
        }
    }
}

impl PowerMeter for SimulatedMeter {
    fn sample(&mut self) -> MeterSample {
        self.tick = self.tick.wrapping_add(1);

        // Hardware integration point:
        // replace these simulated readings with the HLW8012 pulse driver on
        // the device build.
        let active_power_w = 1_100.0 + ((self.tick % 8) as f32 * 3.5);
        // Only the side currently sampled through the shared pulse pin
        // shows fresh jitter, like the real chip.
        let jitter = (self.tick % 5) as f32 * 0.4;
        let voltage_v = if self.current_phase { 229.0 } else { 229.0 + jitter };
        let apparent_power_va = active_power_w * 1.04;

        MeterSample {
            active_power_w,
            voltage_v,
            current_a: apparent_power_va / voltage_v,
            apparent_power_va,
            power_factor: active_power_w / apparent_power_va,
        }
    }

    fn toggle_mode(&mut self) {
        self.current_phase = !self.current_phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_readings_stay_plausible() {
        let mut meter = SimulatedMeter::new();
        for _ in 0..20 {
            let sample = meter.sample();
            assert!(sample.active_power_w > 0.0);
            assert!((0.0..=1.0).contains(&sample.power_factor));
            assert!(sample.apparent_power_va >= sample.active_power_w);
        }
    }

    #[test]
    fn toggle_mode_alternates_phase() {
        let mut meter = SimulatedMeter::new();
        assert!(meter.current_phase);
        meter.toggle_mode();
        assert!(!meter.current_phase);
        meter.toggle_mode();
        assert!(meter.current_phase);
    }
}
