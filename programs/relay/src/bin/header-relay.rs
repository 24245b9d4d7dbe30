use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use header_relay::cli::{Commands, RelayCli, StartArgs};
use header_relay_chain::api::BridgeChainApi;
use header_relay_chain::config::ChainConfig;
use header_relay_core::config::{parse_config, RelayConfig};
use header_relay_core::sequencer::{RunOutcome, Sequencer};
use header_relay_core::strategy::Strategy;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = RelayCli::parse();
    match cli.command {
        Commands::Start(args) => start(args).await,
    }
}

async fn start(args: StartArgs) -> anyhow::Result<()> {
    let config_bz = std::fs::read(&args.config)?;
    let config: RelayConfig = serde_json::from_slice(&config_bz)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            config.log_level().to_string().to_lowercase(),
        ))
        .init();

    let strategy_name = args
        .strategy
        .unwrap_or_else(|| config.strategy.clone());
    let Ok(strategy) = Strategy::from_str(&strategy_name) else {
        // An unknown strategy is a no-op run, not an error.
        info!(strategy = %strategy_name, "unrecognized strategy, nothing to run");
        return Ok(());
    };

    let dynamic = args.dynamic || config.dynamic;
    let steps = strategy.expand(dynamic);
    info!(strategy = %strategy_name, dynamic, ?steps, "starting relay run");

    let chain_config = parse_config::<ChainConfig>(config.chain.clone())?;
    let api = BridgeChainApi::connect(chain_config).await?;

    let sequencer = Sequencer::new(Arc::new(api), steps, &config.queue);
    match sequencer.run().await {
        RunOutcome::Completed => {
            info!("relay queue drained, all steps completed");
            Ok(())
        }
        RunOutcome::Failed => Err(anyhow::anyhow!("relay queue drained unsuccessfully")),
    }
}
