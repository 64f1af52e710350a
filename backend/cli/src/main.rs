use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use logging::init_logger;
use media::{HttpImageFetcher, HttpImageHost};
use recibo_config::{config_dir, config_file_path, ReciboConfig};
use recibo_extract::ValidationTargets;
use recibo_gateway::{start_server, GatewayState};
use recibo_inbox::{AttachmentResolver, InboxHttpClient};
use recibo_ledger::SheetsLedger;
use recibo_ocr::OcrSpaceClient;
use recibo_pipeline::ReceiptPipeline;

#[derive(Parser)]
#[command(name = "recibo")]
#[command(about = "recibo — payment-receipt ingestion from inbound email")]
#[command(version)]
struct Cli {
    /// Path to config.yaml (default: the recibo config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook gateway and receipt pipeline
    Serve {
        /// Override the bind address from the config
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
    /// Load and validate the config, printing a redacted snapshot
    CheckConfig,
}

fn resolve_config_path(cli_path: Option<PathBuf>) -> PathBuf {
    cli_path.unwrap_or_else(|| config_file_path(&config_dir()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config);

    match cli.command {
        Commands::Serve { bind } => {
            let config = recibo_config::load_and_prepare(&config_path).await?;
            init_logger(config.server.log_dir.as_deref(), &config.server.log_level);
            let addr = match bind {
                Some(addr) => addr,
                None => config
                    .server
                    .bind_address
                    .parse()
                    .context("Invalid bind address in config")?,
            };
            run_server(config, addr).await?;
        }
        Commands::CheckConfig => {
            init_logger(None, "info");
            check_config(&config_path).await?;
        }
    }

    Ok(())
}

async fn run_server(config: ReciboConfig, addr: SocketAddr) -> Result<()> {
    info!(bind = %addr, "Starting recibo gateway");

    let client = reqwest::Client::new();

    let inbox_api = Arc::new(InboxHttpClient::new(
        client.clone(),
        &config.inbox.base_url,
        &config.inbox.api_key,
    ));
    let resolver = AttachmentResolver::new(inbox_api);

    let fetcher = Arc::new(HttpImageFetcher::new(client.clone()));
    let image_host = Arc::new(HttpImageHost::new(
        client.clone(),
        &config.image_host.endpoint,
        &config.image_host.api_key,
    ));
    let ocr = Arc::new(OcrSpaceClient::new(
        client.clone(),
        &config.ocr.endpoint,
        &config.ocr.api_key,
        &config.ocr.language,
        config.ocr.engine,
    ));
    let ledger = Arc::new(SheetsLedger::new(
        client,
        &config.ledger.endpoint,
        &config.ledger.sheet_id,
        &config.ledger.token,
    ));

    let targets = ValidationTargets {
        name_pattern: config.validation.target_name.clone(),
        phone: config.validation.target_phone.clone(),
    };

    let pipeline = Arc::new(ReceiptPipeline::new(
        resolver, fetcher, image_host, ocr, ledger, targets,
    ));

    let state = GatewayState {
        pipeline,
        webhook_secret: config.webhook.secret.clone(),
    };

    start_server(addr, state).await
}

/// Load, substitute, and validate the config; print findings and a
/// redacted snapshot so operators can eyeball what the service would run
/// with, without leaking secrets into their terminal.
async fn check_config(path: &std::path::Path) -> Result<()> {
    let raw = recibo_config::load_config(path).await?;
    let value = serde_json::to_value(&raw).context("Failed to serialize config")?;
    let value = recibo_config::resolve_env_vars(&value)?;
    let config: ReciboConfig =
        serde_json::from_value(value.clone()).context("Config has the wrong shape")?;

    let report = recibo_config::validate(&config);
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    for error in &report.errors {
        println!("error: {error}");
    }

    let snapshot = serde_yaml::to_string(&recibo_config::redact(&value))?;
    println!("{snapshot}");

    if report.is_valid() {
        println!("Config OK: {}", path.display());
        Ok(())
    } else {
        anyhow::bail!("Config has {} error(s)", report.errors.len())
    }
}
