use clap::Parser;
use pkg_controllers::delegation::DelegationController;
use pkg_controllers::expiry::ExpiryScheduler;
use pkg_controllers::tenant::TenantController;
use pkg_state::client::StateStore;
use pkg_types::config::{ControllerConfigFile, load_config_file};
use tokio::sync::watch;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "nestns-controller", about = "nestns multi-tenancy controller")]
struct Cli {
    /// Path to YAML config file
    #[arg(long, short, default_value = "/etc/nestns/config.yaml")]
    config: String,

    /// Directory for SlateDB state storage
    #[arg(long)]
    data_dir: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    // Load config file (returns defaults if file not found)
    let file_cfg: ControllerConfigFile = load_config_file(&cli.config)?;
    info!("Config file: {}", cli.config);

    // Merge: CLI args > config file > defaults
    let data_dir = cli
        .data_dir
        .or(file_cfg.data_dir)
        .unwrap_or_else(|| "/tmp/nestns-data".to_string());

    info!("Starting nestns-controller");
    info!("  Data dir: {}", data_dir);

    let store = StateStore::new(&data_dir).await?;

    let mut delegation = DelegationController::new(store.clone());
    if let Some(secs) = file_cfg.resync_interval_secs {
        delegation = delegation.with_resync_interval(std::time::Duration::from_secs(secs));
    }
    let delegation_handle = delegation.start();
    let tenant_handle = TenantController::new(store.clone()).start();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = ExpiryScheduler::new(store.clone());
    let scheduler_handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    let _ = shutdown_tx.send(true);
    scheduler_handle.await?;
    delegation_handle.abort();
    tenant_handle.abort();

    store.close().await?;
    Ok(())
}
