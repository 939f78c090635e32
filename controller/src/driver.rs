use std::{
    sync::OnceLock,
    time::{Duration, Instant},
};

use chrono::Timelike;
use chrono_tz::Tz;
use tokio::time::interval;
use tracing::{debug, warn};

use powerplug_common::{MeteringRecord, MeteringReporter, OutputId, RelayEngine, TelemetrySink};

use crate::{app::AppState, meter::PowerMeter, pins::OutputPins};

/// Loop pass pacing. Re-entry is effectively immediate at this cadence; the
/// only real timing threshold is the reporter's own 2000 ms gate.
const PASS_INTERVAL_MS: u64 = 250;

/// One cooperative control pass, in fixed order: relay scheduling, output
/// level sync, metering gate. Control-surface mutations that landed before
/// the pass are visible to all three steps because the caller holds the
/// engine lock across the whole pass.
///
/// Returns the metering record when the report gate fired; submitting it
/// and then flipping the meter phase is the caller's job
/// (`finish_report_cycle`) so this stays free of IO.
pub(crate) fn control_pass<M, P>(
    engine: &mut RelayEngine,
    reporter: &mut MeteringReporter,
    meter: &mut M,
    pins: &mut P,
    hour: i32,
    now_ms: u64,
) -> Option<MeteringRecord>
where
    M: PowerMeter,
    P: OutputPins,
{
    if let Some(decision) = engine.apply_schedule(hour) {
        debug!("relay is {:?} (time-based), hour {hour}", decision);
    }

    pins.write(OutputId::Indicator, engine.level(OutputId::Indicator));
    pins.write(OutputId::Relay, engine.level(OutputId::Relay));

    if !reporter.due(now_ms) {
        return None;
    }

    let sample = meter.sample();
    debug!(
        "[meter] active {:.1} W, voltage {:.1} V, current {:.3} A, apparent {:.1} VA, pf {:.2}",
        sample.active_power_w,
        sample.voltage_v,
        sample.current_a,
        sample.apparent_power_va,
        sample.power_factor
    );

    let record = reporter.build_record(&sample, engine.relay_flag(), hour);
    reporter.mark_reported(now_ms);
    Some(record)
}

/// Tail of the metering cycle: submit the record, then flip the meter's
/// sampling phase. Submission is fire-and-forget (a failure is logged and
/// dropped), and the phase toggle runs regardless of the outcome.
pub(crate) async fn finish_report_cycle<M, S>(record: &MeteringRecord, meter: &mut M, sink: &S)
where
    M: PowerMeter,
    S: TelemetrySink,
{
    if let Err(err) = sink.submit(record).await {
        warn!("telemetry submit failed: {err}");
    }
    meter.toggle_mode();
}

pub(crate) fn spawn_control_loop<M, P, S>(state: AppState, mut meter: M, mut pins: P, sink: S)
where
    M: PowerMeter + Send + 'static,
    P: OutputPins + Send + 'static,
    S: TelemetrySink + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut reporter =
            MeteringReporter::new(state.config.report_interval_ms, monotonic_ms());
        let mut ticker = interval(Duration::from_millis(PASS_INTERVAL_MS));
        // Whatever the clock last held; zero until the first successful read.
        let mut last_hour: i32 = 0;

        loop {
            ticker.tick().await;
            let now_ms = monotonic_ms();

            if let Some((hour, minute)) = local_hour_minute(&state.config.timezone) {
                last_hour = hour;
                debug!("time: {hour}:{minute:02}");
            }

            let record = {
                let mut engine = state.engine.lock().await;
                control_pass(
                    &mut engine,
                    &mut reporter,
                    &mut meter,
                    &mut pins,
                    last_hour,
                    now_ms,
                )
            };

            if let Some(record) = record {
                finish_report_cycle(&record, &mut meter, &sink).await;
            }
        }
    });
}

fn local_hour_minute(timezone: &str) -> Option<(i32, u32)> {
    let tz: Tz = timezone.parse().ok()?;
    let now = chrono::Utc::now().with_timezone(&tz);
    Some((now.hour() as i32, now.minute()))
}

pub(crate) fn monotonic_ms() -> u64 {
    static START: OnceLock<Instant> = OnceLock::new();
    START
        .get_or_init(Instant::now)
        .elapsed()
        .as_millis()
        .try_into()
        .unwrap_or(u64::MAX)
}
