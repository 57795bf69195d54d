use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sharedir::{routes, AppState, Config, Registry};

#[derive(Parser, Debug)]
#[command(name = "sharedir")]
#[command(about = "Small local-network file sharing web server")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "SHAREDIR_PORT", default_value = "5000")]
    port: u16,

    /// Address to bind to
    #[arg(short, long, env = "SHAREDIR_BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Share a single directory (overrides the shares file)
    #[arg(short, long, env = "SHAREDIR_ROOT", conflicts_with = "shares")]
    root: Option<PathBuf>,

    /// Newline-delimited file of directories to share
    #[arg(short, long, env = "SHAREDIR_SHARES", default_value = "shares.txt")]
    shares: PathBuf,

    /// Config file path (optional)
    #[arg(short, long, env = "SHAREDIR_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, env = "SHAREDIR_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "sharedir=debug,tower_http=debug"
    } else {
        "sharedir=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config from file if provided, otherwise use defaults
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    // Build the registry: one directory from the CLI, or a shares file
    let registry = if let Some(root) = &cli.root {
        let root_dir = root.canonicalize().unwrap_or_else(|_| root.clone());

        if !root_dir.is_dir() {
            return Err(format!("Shared path is not a directory: {}", root_dir.display()).into());
        }

        Registry::single(root_dir)
    } else {
        Registry::load_from_file(&cli.shares)?
    };

    if registry.is_empty() {
        warn!("No directories are registered; pages will be empty");
    }
    for dir in registry.dirs() {
        let desc = registry.describe(dir);
        if desc.available {
            info!("Sharing {} ({} files)", dir.display(), desc.file_count);
        } else {
            warn!("Sharing {} (currently unavailable)", dir.display());
        }
    }

    let state = AppState::with_config(registry, config);

    // Build router
    let app = Router::new()
        .merge(routes::share_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port).parse()?;
    info!("Starting sharedir on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
