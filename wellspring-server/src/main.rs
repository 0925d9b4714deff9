//! Wellspring Server - Headless Gateway Daemon
//!
//! Holds the provider credential and serves:
//! - `POST /inference` and `POST|GET /media-job` (the gateway)
//! - `/health`, `/healthz`, `/version`
//!
//! Access via: http://localhost:8787

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wellspring_core::gateway::{GatewayContext, ProviderCredential, CREDENTIAL_ENV};
use wellspring_types::GatewayConfig;

mod cli;
mod config;
mod router;
mod server_utils;

use cli::{Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let gateway_config = config::finalize(
        config::load_config(cli.config.as_deref())?,
        cli.host.clone(),
        cli.port,
    )?;

    match cli.command {
        None | Some(Commands::Serve) => serve(gateway_config).await,
        Some(Commands::Config(ConfigCommands::Show { json })) => show_config(&gateway_config, json),
        Some(Commands::Config(ConfigCommands::Check)) => {
            ProviderCredential::from_env()?;
            println!("{} Configuration valid, {} is set", "✓".green(), CREDENTIAL_ENV);
            Ok(())
        },
    }
}

async fn serve(gateway_config: GatewayConfig) -> Result<()> {
    // Read once; from here on the credential only lives inside the context.
    let credential = ProviderCredential::from_env()?;

    info!("🚀 Wellspring gateway starting...");
    info!(
        provider = %gateway_config.provider_base(),
        timeout_secs = gateway_config.request_timeout_secs,
        "Upstream configured"
    );

    let listener = server_utils::create_listener(&gateway_config).await?;
    let ctx = GatewayContext::new(gateway_config, credential)?;
    let app = router::build_router(ctx);

    info!("🌐 Gateway listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).with_graceful_shutdown(server_utils::shutdown_signal()).await?;

    info!("👋 Gateway stopped");
    Ok(())
}

fn show_config(gateway_config: &GatewayConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(gateway_config)?);
        return Ok(());
    }

    println!("{}", "Gateway Configuration:".cyan().bold());
    println!("  Listen: {}", gateway_config.socket_addr());
    println!("  Provider: {}", gateway_config.provider_base());
    println!("  Timeout: {}s", gateway_config.request_timeout_secs);
    println!("  Body limit: {} bytes", gateway_config.max_body_bytes);
    println!("  Default voice: {}", gateway_config.default_voice);
    println!("{}", "Tier models:".cyan().bold());
    for tier in wellspring_types::ModelTier::ALL {
        println!("  {:<16} {}", tier.as_str(), gateway_config.models.model_for(tier));
    }
    let credential =
        if std::env::var_os(CREDENTIAL_ENV).is_some() { "set".green() } else { "missing".red() };
    println!("  {}: {}", CREDENTIAL_ENV, credential);
    Ok(())
}
