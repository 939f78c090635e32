mod app;
mod driver;
mod meter;
mod pins;
mod telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
