/*
[INPUT]:  CLI arguments, YAML configuration file, SAPI_* environment, OS shutdown signals
[OUTPUT]: One query result printed to stdout
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sapi_adapter::SapiClient;
use sapi_cli::{render, run, CliConfig, Command, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "sapi-cli", version, about = "Broker, BSwap and deposit REST queries")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    log_level: String,
    #[arg(long = "output", value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,
    /// Validate configuration and exit without sending a request
    #[arg(long = "dry-run")]
    dry_run: bool,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = CliConfig::load(args.config_path.as_deref())?;
    info!(
        environment = ?config.environment,
        base_url = ?config.base_url,
        dry_run = args.dry_run,
        "configuration loaded"
    );

    if args.command.requires_credentials() && !config.has_credentials() {
        bail!("{:?} needs api_key and secret_key (config file or SAPI_API_KEY/SAPI_SECRET_KEY)", args.command);
    }

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let client = SapiClient::with_config(config.credentials(), config.client_config())
        .context("create client")?;
    let opts = config.request_options();

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    let value = run(&client, &args.command, &opts, &shutdown).await?;

    println!("{}", render(&value, args.output)?);
    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
