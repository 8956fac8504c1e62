use anyhow::{anyhow, Context};
use studycamp_api::{run_server, telemetry};
use studycamp_core::StudyCampConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the environment directly.
    dotenv::dotenv().ok();

    let config = StudyCampConfig::load().context("failed to load configuration")?;

    telemetry::init_logging(&config.logging)
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    if let Err(err) = run_server(config).await {
        tracing::error!(error = %err, "Server terminated with error");
        return Err(err.into());
    }

    Ok(())
}
