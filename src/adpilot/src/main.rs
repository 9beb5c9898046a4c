//! AdPilot: guided campaign creation with generated content and hard-cap budget control.

use adpilot_api::ApiServer;
use adpilot_core::config::AppConfig;
use adpilot_genai::{GeminiClient, GenerationCollaborator, OfflineCollaborator};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "adpilot")]
#[command(about = "Campaign wizard and budget-capped campaign dashboard")]
#[command(version)]
struct Cli {
    /// Bind address (overrides config)
    #[arg(long, env = "ADPILOT__API__HOST")]
    host: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "ADPILOT__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Metrics port (overrides config)
    #[arg(long, env = "ADPILOT__METRICS__PORT")]
    metrics_port: Option<u16>,

    /// Generative AI API key (overrides config)
    #[arg(long, env = "ADPILOT__GENAI__API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Use the offline collaborator even when an API key is configured
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Start with an empty campaign list
    #[arg(long, default_value_t = false)]
    no_demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adpilot=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("AdPilot starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(host) = cli.host {
        config.api.host = host;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(port) = cli.metrics_port {
        config.metrics.port = port;
    }
    if let Some(key) = cli.api_key {
        config.genai.api_key = Some(key);
    }
    if cli.no_demo {
        config.wizard.seed_demo_data = false;
    }

    info!(
        http_port = config.api.http_port,
        metrics_port = config.metrics.port,
        auto_populate = config.wizard.auto_populate,
        seed_demo_data = config.wizard.seed_demo_data,
        "Configuration loaded"
    );

    let (collaborator, name) = select_collaborator(&config, cli.offline);
    let api_server = ApiServer::new(config, collaborator, name);

    if let Err(e) = api_server.start_metrics() {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("AdPilot is ready to serve traffic");

    api_server.start_http().await?;

    Ok(())
}

fn select_collaborator(
    config: &AppConfig,
    force_offline: bool,
) -> (Arc<dyn GenerationCollaborator>, &'static str) {
    if force_offline || !config.genai.has_api_key() {
        info!("Using offline collaborator");
        return (Arc::new(OfflineCollaborator::new()), "offline");
    }
    match GeminiClient::new(&config.genai) {
        Ok(client) => {
            info!(model = %config.genai.text_model, "Using Gemini collaborator");
            (Arc::new(client), "gemini")
        }
        Err(e) => {
            error!(error = %e, "Failed to build Gemini client, falling back to offline collaborator");
            (Arc::new(OfflineCollaborator::new()), "offline")
        }
    }
}
