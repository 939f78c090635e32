use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use tokio::{net::TcpListener, sync::Mutex};
use tracing::{debug, info};

use powerplug_common::{
    ControllerConfig, OperatingMode, OutputId, PlugStatus, RelayEngine,
};

use crate::{driver, meter::SimulatedMeter, pins::LogPins, telemetry::ThingSpeakSink};

#[derive(Clone)]
pub(crate) struct AppState {
    pub engine: Arc<Mutex<RelayEngine>>,
    pub config: Arc<ControllerConfig>,
}

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Arc::new(config_from_env());
    let state = AppState {
        engine: Arc::new(Mutex::new(RelayEngine::new(config.default_window))),
        config: config.clone(),
    };

    let sink = ThingSpeakSink::new(&config.telemetry);
    driver::spawn_control_loop(state.clone(), SimulatedMeter::new(), LogPins::new(), sink);

    let app = Router::new()
        .route("/", get(handle_root))
        .route("/toggle", get(handle_toggle))
        .route("/manual", get(handle_manual))
        .route("/settime", get(handle_settime))
        .route("/update", get(handle_update))
        .with_state(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind control surface at {addr}"))?;

    info!("control surface listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Compiled-in defaults with per-deployment environment overrides.
fn config_from_env() -> ControllerConfig {
    let mut config = ControllerConfig::default();
    if let Some(port) = env_parse("HTTP_PORT") {
        config.http_port = port;
    }
    if let Ok(timezone) = std::env::var("PLUG_TZ") {
        config.timezone = timezone;
    }
    if let Ok(endpoint) = std::env::var("TELEMETRY_ENDPOINT") {
        config.telemetry.endpoint = endpoint;
    }
    if let Some(channel) = env_parse("TELEMETRY_CHANNEL") {
        config.telemetry.channel_id = channel;
    }
    if let Ok(key) = std::env::var("TELEMETRY_WRITE_KEY") {
        config.telemetry.write_key = key;
    }
    config
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|value| value.parse().ok())
}

async fn handle_root(State(state): State<AppState>) -> Html<String> {
    render_state(&state).await
}

/// `GET /toggle?pin=<id>` — flips the named output if the pin number is one
/// of the two known identifiers; anything else is a silent no-op. Honored
/// even while scheduled control is active (the next pass may revert it).
async fn handle_toggle(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let id = params
        .get("pin")
        .and_then(|value| value.parse::<i64>().ok())
        .and_then(OutputId::from_pin);

    if let Some(id) = id {
        let mut engine = state.engine.lock().await;
        engine.toggle_output(id);
        info!("{} toggled via control surface", id.as_str());
    }

    render_state(&state).await
}

/// `GET /manual?state=<0|1>` — `1` selects manual control, any other value
/// returns to time-based control; a missing parameter changes nothing.
async fn handle_manual(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    if let Some(value) = params.get("state") {
        let mode = if value == "1" {
            OperatingMode::Manual
        } else {
            OperatingMode::Scheduled
        };
        let mut engine = state.engine.lock().await;
        if engine.set_mode(mode) {
            info!("operating mode set to {}", mode.as_str());
        }
    }

    render_state(&state).await
}

/// `GET /settime?starthour=<int>&endhour=<int>` — both values must be
/// present and parseable or the window is left alone. Accepted values are
/// stored verbatim, out-of-range included.
async fn handle_settime(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let start = params
        .get("starthour")
        .and_then(|value| value.parse::<i32>().ok());
    let end = params
        .get("endhour")
        .and_then(|value| value.parse::<i32>().ok());

    if let (Some(start), Some(end)) = (start, end) {
        let mut engine = state.engine.lock().await;
        engine.set_window(start, end);
        info!("time-based operation set from {start} to {end}");
    }

    render_state(&state).await
}

/// Firmware-update surface. Opaque to the controller; the host build only
/// mounts a placeholder alongside the control routes.
async fn handle_update() -> Html<String> {
    Html(
        "<html><body><h1>Firmware Update</h1>\
         <p>Firmware update is only available on the device build.</p>\
         <a href=\"/\">Back</a></body></html>"
            .to_string(),
    )
}

async fn render_state(state: &AppState) -> Html<String> {
    let status = state.engine.lock().await.status();
    debug!(
        "INDICATOR (GPIO 2): {}, RELAY (GPIO 12): {}",
        status.indicator.as_digit(),
        status.relay.as_digit()
    );
    Html(render_status_page(&status))
}

fn render_status_page(status: &PlugStatus) -> String {
    let (mode_target, mode_label) = match status.mode {
        OperatingMode::Manual => ("0", "Switch to Time-based Control"),
        OperatingMode::Scheduled => ("1", "Switch to Manual Control"),
    };

    format!(
        "<html><body><h1>GPIO Control</h1>\
         <p>INDICATOR (GPIO 2): {indicator}</p>\
         <p>RELAY (GPIO 12): {relay}</p>\
         <a href=\"/toggle?pin=2\">Toggle Indicator</a><br>\
         <a href=\"/toggle?pin=12\">Toggle Relay</a><br>\
         <a href=\"/manual?state={mode_target}\">{mode_label}</a><br>\
         <form action=\"/settime\" method=\"get\">\
         Start Hour: <input type=\"number\" name=\"starthour\" value=\"{start}\"><br>\
         End Hour: <input type=\"number\" name=\"endhour\" value=\"{end}\"><br>\
         <input type=\"submit\" value=\"Set Time\">\
         </form>\
         <a href=\"/update\">Update Firmware</a><br>\
         </body></html>",
        indicator = status.indicator.as_digit(),
        relay = status.relay.as_digit(),
        start = status.window.start_hour,
        end = status.window.end_hour,
    )
}
