use anyhow::Result;
use arc_swap::ArcSwap;
use clap::{Parser, Subcommand};
use pbiembed_config::{Config, ConfigWatcher, LogConfig, LogFormat};
use pbiembed_server::AppState;
use pbiembed_types::ResponseEnvelope;
use std::{path::PathBuf, sync::Arc};

#[derive(Parser, Debug)]
#[command(name = "pbiembed", about = "pbiembed: Power BI embed token service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Path to the YAML configuration file (watched for changes).
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Override the listening port (default: 8018).
        #[arg(short, long)]
        port: Option<u16>,
        /// Override the listening address (default: 127.0.0.1).
        #[arg(long)]
        host: Option<String>,
    },
    /// Mint one embed token and print the response envelope.
    Token {
        /// Path to the YAML configuration file.
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Effective identity to scope the token to.
        #[arg(short, long)]
        username: Option<String>,
        /// Comma-separated roles for the effective identity.
        #[arg(short, long)]
        roles: Option<String>,
    },
    /// Validate the configuration without contacting any service.
    Check {
        /// Path to the YAML configuration file.
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, port, host } => cmd_serve(config, port, host).await,
        Commands::Token {
            config,
            username,
            roles,
        } => cmd_token(config, username, roles).await,
        Commands::Check { config } => cmd_check(config),
    }
}

fn init_tracing(log: &LogConfig) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    Config::load(path.map(PathBuf::as_path)).map_err(|e| anyhow::anyhow!("config error: {e}"))
}

async fn cmd_serve(
    config_path: Option<PathBuf>,
    port: Option<u16>,
    host: Option<String>,
) -> Result<()> {
    let config = if let Some(path) = config_path {
        let watcher = Arc::new(
            ConfigWatcher::new(path).map_err(|e| anyhow::anyhow!("config error: {e}"))?,
        );
        let arc = watcher.arc();
        watcher.watch();
        arc
    } else {
        Arc::new(ArcSwap::from_pointee(load_config(None)?))
    };

    let snapshot = config.load_full();
    init_tracing(&snapshot.log);
    if let Err(issue) = snapshot.validate() {
        tracing::warn!(%issue, "configuration incomplete; requests will report it");
    }

    let addr = format!(
        "{}:{}",
        host.unwrap_or_else(|| snapshot.host.clone()),
        port.unwrap_or(snapshot.port)
    );
    let state = AppState::new(config);
    let app = pbiembed_server::make_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "pbiembed listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn cmd_token(
    config_path: Option<PathBuf>,
    username: Option<String>,
    roles: Option<String>,
) -> Result<()> {
    let config = load_config(config_path.as_ref())?;
    init_tracing(&config.log);

    let state = AppState::new(Arc::new(ArcSwap::from_pointee(config)));
    let snapshot = state.config.load_full();
    let result = state
        .embed
        .get_embed_config(&snapshot, username, roles)
        .await;
    println!(
        "{}",
        serde_json::to_string_pretty(&ResponseEnvelope::success(result))?
    );
    Ok(())
}

fn cmd_check(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_ref())?;
    match config.validate() {
        Ok(()) => {
            println!("configuration OK");
            Ok(())
        }
        Err(issue) => anyhow::bail!("{issue}"),
    }
}
