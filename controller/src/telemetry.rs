use powerplug_common::{MeteringRecord, TelemetryConfig, TelemetryError, TelemetrySink};

/// HTTP channel-update sink: one GET per report cycle carrying the write
/// key, channel id, and the seven named fields as query parameters.
pub struct ThingSpeakSink {
    client: reqwest::Client,
    update_url: String,
    channel_id: u64,
    write_key: String,
}

impl ThingSpeakSink {
    pub fn new(config: &TelemetryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            update_url: format!("{}/update", config.endpoint.trim_end_matches('/')),
            channel_id: config.channel_id,
            write_key: config.write_key.clone(),
        }
    }
}

impl TelemetrySink for ThingSpeakSink {
    async fn submit(&self, record: &MeteringRecord) -> Result<(), TelemetryError> {
        let response = self
            .client
            .get(&self.update_url)
            .query(&[
                ("api_key", self.write_key.clone()),
                ("channel_id", self.channel_id.to_string()),
            ])
            .query(&record.fields())
            .send()
            .await
            .map_err(|err| TelemetryError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(TelemetryError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}
