pub mod api;
pub mod cli;
pub mod clock;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;

use tokio::signal;

use anyhow::Context;
pub use cli::{Cli, Commands};
pub use config::Config;
use services::SessionPurger;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Folds `--database-url` / `--port` (or their env vars) over the file config.
pub fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.database_url {
        config.database.url.clone_from(url);
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    config.validate()?;

    init_tracing(&config);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::Migrate => cli::cmd_migrate(&config).await,
        Commands::PurgeSessions => cli::cmd_purge_sessions(&config).await,
        Commands::DeleteUser { username, yes } => {
            cli::cmd_delete_user(&config, &username, yes).await
        }
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let json = config.general.log_json;

    tracing_subscriber::registry()
        .with(env_filter)
        .with((!json).then(tracing_subscriber::fmt::layer))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .init();
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!("Folio v{} starting...", env!("CARGO_PKG_VERSION"));

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let purge_interval = config.sessions.purge_interval_minutes;

    let api_state = api::create_app_state_from_config(config, prometheus_handle).await?;

    let purge_handle = SessionPurger::new(api_state.sessions.clone(), purge_interval).spawn();

    let app = api::router(api_state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web server running at http://{}", addr);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(handle) = purge_handle {
        handle.abort();
    }

    if let Err(e) = &result {
        error!("Web server error: {}", e);
    }
    info!("Server stopped");

    result.map_err(Into::into)
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}
