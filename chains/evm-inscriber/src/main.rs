mod config;
mod submitter;

use anyhow::{Context, Result};
use broadcast_core::{setup_logger, NetworkRegistry, RunController, Submitter};
use clap::Parser;
use config::InscriberConfig;
use dotenv::dotenv;
use std::sync::Arc;
use submitter::EthersSubmitter;
use tokio::signal;
use tokio::time::{interval, Duration};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Broadcast one inscription transaction per wallet, every cycle, until stopped", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Key file, one private key per line (overrides PRIVATE_KEYS and private_key_file)
    #[arg(short, long)]
    keys: Option<String>,

    /// Export metrics JSON to this path periodically and on shutdown
    #[arg(long)]
    export_metrics: Option<String>,

    /// Metrics export interval in seconds
    #[arg(long, default_value = "30")]
    metrics_interval: u64,

    /// Print selectable networks and exit
    #[arg(long)]
    list_networks: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let _guard = setup_logger("logs");
    let args = Args::parse();

    if args.list_networks {
        for network in NetworkRegistry::builtin().iter() {
            println!("{:>8}  {:<18} {}", network.id, network.name, network.default_rpc);
        }
        return Ok(());
    }

    info!("Loading config from: {}", args.config);
    let config = InscriberConfig::load(&args.config)
        .with_context(|| format!("Failed to load config: {}", args.config))?;

    let registry = config.registry()?;
    let rpc_url = config.rpc_url(&registry)?;
    let keys = config.load_keys(args.keys.as_deref())?;

    info!("Using RPC {} for chain {}", rpc_url, config.chain_id);

    if rpc_url.starts_with("ws://") || rpc_url.starts_with("wss://") {
        let submitter = EthersSubmitter::ws(&rpc_url, config.request_timeout()).await?;
        run(submitter, registry, &config, &keys, &args).await
    } else {
        let submitter = EthersSubmitter::http(&rpc_url, config.request_timeout())?;
        run(submitter, registry, &config, &keys, &args).await
    }
}

async fn run<S: Submitter + 'static>(
    submitter: S,
    registry: NetworkRegistry,
    config: &InscriberConfig,
    keys: &str,
    args: &Args,
) -> Result<()> {
    let controller = Arc::new(RunController::new(submitter, registry));
    config.apply(&controller).await?;

    let import = controller.set_keys(keys).await?;
    info!(
        target: "task_result",
        "Loaded {} keys ({} lines rejected).",
        import.accepted, import.rejected
    );

    if let Err(e) = controller.start().await {
        error!("Cannot start: {}", e);
        return Ok(());
    }
    let start_time = std::time::Instant::now();

    let metrics_task = args.export_metrics.clone().map(|path| {
        let controller = Arc::clone(&controller);
        let interval_secs = args.metrics_interval.max(1);
        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(interval_secs));
            loop {
                interval.tick().await;
                let snapshot = controller.metrics().await;
                if let Err(e) = snapshot.export_to_file(&path).await {
                    error!("Metrics export failed: {}", e);
                }
            }
        })
    });

    match signal::ctrl_c().await {
        Ok(()) => info!("🛑 Received Ctrl+C. Stopping after the current cycle..."),
        Err(err) => error!("Unable to listen for shutdown signal: {}", err),
    }

    controller.stop().await;
    controller.drain().await;

    if let Some(task) = metrics_task {
        task.abort();
    }

    let metrics = controller.metrics().await;
    info!(target: "task_result", "🛑 Shutdown Complete.");
    info!(
        target: "task_result",
        "Total Time: {:.1}s | Cycles: {} | Total Success: {} | Total Fail: {} | Success Rate: {:.2}%",
        start_time.elapsed().as_secs_f64(),
        metrics.cycles,
        metrics.success,
        metrics.failed,
        metrics.success_rate
    );

    if let Some(path) = &args.export_metrics {
        match metrics.export_to_file(path).await {
            Ok(_) => info!("Final metrics exported to {}", path),
            Err(e) => error!("Failed to export final metrics: {}", e),
        }
    }

    Ok(())
}
