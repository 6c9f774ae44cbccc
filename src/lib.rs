pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod parser;
pub mod server;
pub mod services;
pub mod session;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
use cli::{Cli, Commands};
pub use config::Config;
use db::Store;
use server::Server;
use services::{Registry, SeaOrmRegistry};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run(cli: Cli, mut config: Config) -> anyhow::Result<()> {
    init_tracing(&config);
    config.validate()?;

    match cli.command {
        None => run_server(config).await,

        Some(Commands::Serve { bind, database }) => {
            if let Some(bind) = bind {
                let addr: std::net::SocketAddr = bind
                    .parse()
                    .with_context(|| format!("Invalid bind address: {bind}"))?;
                config.server.bind_address = addr.ip().to_string();
                config.server.port = addr.port();
            }
            if let Some(database) = database {
                config.general.database_path = database;
            }
            run_server(config).await
        }

        Some(Commands::Init) => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists.");
            }
            Ok(())
        }

        Some(Commands::Clients { current }) => cli::cmd_list_clients(&config, current).await,

        Some(Commands::Disks) => cli::cmd_list_disks(&config).await,

        Some(Commands::Stats) => cli::cmd_stats(&config).await,

        Some(Commands::Remove { client_id }) => cli::cmd_remove_machine(&config, &client_id).await,
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_metrics(config: &Config) -> anyhow::Result<()> {
    if !config.observability.metrics_enabled {
        return Ok(());
    }

    use metrics_exporter_prometheus::PrometheusBuilder;
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], config.observability.metrics_port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("Failed to install Prometheus exporter")?;

    info!("Prometheus metrics exporter listening on http://{}", addr);
    Ok(())
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!("vmhost v{} starting...", env!("CARGO_PKG_VERSION"));

    init_metrics(&config)?;

    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;
    store
        .ping()
        .await
        .context("Database did not answer after opening")?;

    let registry: Arc<dyn Registry> = Arc::new(SeaOrmRegistry::new(store));

    let server = Server::bind(
        &config.server.listen_addr(),
        registry,
        config.server.max_line_bytes,
    )
    .await?;

    server
        .run_until(async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Error listening for shutdown: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!("Server stopped");
    Ok(())
}
