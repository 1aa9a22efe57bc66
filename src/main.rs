use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use order_service::config::{Config, LogFormat};
use order_service::context::AppContext;
use order_service::http::start_api_server;
use order_service::metrics::start_metrics_server;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    // RUST_LOG overrides the default filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,order_service=debug"));
    let (pretty, json) = match config.log_format {
        LogFormat::Pretty => (Some(fmt::layer().with_target(true).with_thread_ids(true)), None),
        LogFormat::Json => (None, Some(fmt::layer().json().with_target(true).with_thread_ids(true))),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();

    tracing::info!("🚀 Starting order service");

    let context = AppContext::build(&config).await?;
    tracing::info!(
        "📊 Metrics registry created with {} metric families",
        context.metrics.registry().gather().len()
    );

    let (host, port) = config.api_addr();
    let api = start_api_server(context.clone(), host.clone(), port);
    let metrics = start_metrics_server(context.metrics.clone(), host, config.metrics_port);

    tokio::try_join!(api, metrics)?;

    tracing::info!("Order service stopped");
    Ok(())
}
