use probe_core::{run_scenario, ApiClient, ProbeConfig, ProbeError, ScenarioOptions, UreqTransport};
use tracing::level_filters::LevelFilter;

fn run() -> Result<(), ProbeError> {
    let config = ProbeConfig::from_env()?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        timeout = ?config.timeout,
        "probing attendance service"
    );
    let client = ApiClient::new(
        &config.host,
        config.port,
        UreqTransport::new(config.timeout),
    );
    run_scenario(&client, &ScenarioOptions::from(&config))?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::INFO)
        .with_target(false)
        .init();

    if let Err(e) = run() {
        tracing::error!("probe failed: {e}");
    }
}
