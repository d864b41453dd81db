use std::path::Path;

use clap::Parser;
use cococtel_gateway::{
    GatewayServices, MetricsRecorder, build_http_client, build_router,
    config::{GatewayConfig, GatewayConfigValidator, load_config},
    metrics, tracing_setup,
    utils::GracefulShutdown,
};
use color_eyre::{Result, eyre::Context};
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(subcommand)]
    command: Option<Commands>,

    /// Configuration file (YAML, JSON or TOML). Environment variables are
    /// applied on top, so the file is optional.
    #[clap(short, long, global = true)]
    config: Option<String>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Start the gateway server (default)
    Serve,
    /// Load and validate the configuration, then exit
    Validate,
    /// Write a starter configuration file
    Init {
        /// Output path for the new config file
        #[clap(short, long, default_value = "gateway.toml")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let config_path = args.config.as_deref();

    match args.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config_path).await,
        Commands::Validate => validate_config_command(config_path),
        Commands::Init { output } => init_config_command(&output).await,
    }
}

async fn serve(config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    GatewayConfigValidator::validate(&config).context("Invalid gateway configuration")?;

    tracing_setup::init_from_config(&config.logging)?;
    let prometheus = metrics::init_metrics()?;

    for (name, url) in config.upstreams.entries() {
        tracing::info!(upstream = name, url, "Upstream configured");
    }

    let http = build_http_client(config.request_timeout())?;
    let recorder = MetricsRecorder::new();
    let services = GatewayServices::from_upstreams(&config.upstreams, http, &recorder);
    let app = build_router(services, config.api_keys.clone(), Some(prometheus));

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    tracing::info!(
        listen_addr = %config.listen_addr,
        api_keys = config.api_keys.len(),
        timeout_secs = config.request_timeout_secs,
        "Gateway listening"
    );

    let shutdown = GracefulShutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move { signal_shutdown.run_signal_handler().await });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let reason = shutdown.wait().await;
            tracing::info!(?reason, "Draining in-flight requests");
        })
        .await
        .context("Gateway server error")?;

    tracing::info!("Graceful shutdown completed");
    Ok(())
}

/// Validate configuration and exit
fn validate_config_command(config_path: Option<&str>) -> Result<()> {
    match config_path {
        Some(path) => println!("🔍 Validating configuration file: {path}"),
        None => println!("🔍 Validating configuration from environment"),
    }

    let config = match load_config(config_path) {
        Ok(config) => {
            println!("✅ Configuration parsing: OK");
            config
        }
        Err(e) => {
            eprintln!("❌ Configuration parsing failed:");
            eprintln!("   {e:#}");
            std::process::exit(1);
        }
    };

    match GatewayConfigValidator::validate(&config) {
        Ok(()) => {
            print_summary(&config);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed:");
            eprintln!("{e}");
            println!();
            println!("💡 Common fixes:");
            println!("   • Set every MS_*_DOMAIN variable or upstreams.* entry");
            println!("   • Ensure all upstream URLs start with http:// or https://");
            println!("   • Provide at least one key in VALID_API_KEYS or api_keys");
            std::process::exit(1);
        }
    }
}

fn print_summary(config: &GatewayConfig) {
    println!("✅ Configuration validation: OK");
    println!();
    println!("📋 Configuration Summary:");
    println!("   • Listen Address: {}", config.listen_addr);
    println!("   • API Keys: {}", config.api_keys.len());
    println!("   • Request Timeout: {}s", config.request_timeout_secs);
    for (name, url) in config.upstreams.entries() {
        println!("   • Upstream {name}: {url}");
    }
}

/// Initialize a new configuration file
async fn init_config_command(output: &str) -> Result<()> {
    let path = Path::new(output);
    if path.exists() {
        eprintln!("❌ Error: Configuration file '{output}' already exists");
        std::process::exit(1);
    }

    let default_config = r#"# Cococtel API Gateway Configuration

listen_addr = "0.0.0.0:8080"

# Keys accepted in the x-api-key header (VALID_API_KEYS overrides this list)
api_keys = ["change-me"]

# Deadline for each upstream call
request_timeout_secs = 30

# Upstream base URLs (MS_*_DOMAIN variables override these)
[upstreams]
auth = "http://localhost:8081"
catalog = "http://localhost:8082"
ai = "http://localhost:8083"
image_recognition = "http://localhost:8084/extract"
scrapping = "http://localhost:8085"
posts = "http://localhost:8086"

[logging]
level = "info"
json = false
"#;

    tokio::fs::write(path, default_config)
        .await
        .context("Failed to write config file")?;
    println!("✅ Created default configuration at: {output}");
    println!("   Run 'cococtel-gateway --config {output} serve' to start the gateway");
    Ok(())
}
