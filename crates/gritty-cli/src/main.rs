//! gritty — attach the local terminal to a remote shell served over a
//! gritty WebSocket endpoint.
//!
//! Connects to `<origin><prefix>`, performs the `terminal`/`resize`
//! handshake, and pipes the local terminal's input and output through the
//! session bridge until the user detaches with Ctrl+].

mod config;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};

use gritty_client::BridgeConfig;

/// gritty — remote shell in your terminal
#[derive(Parser)]
#[command(
    name = "gritty",
    version,
    about = "Attach the local terminal to a remote shell over WebSocket"
)]
struct Cli {
    /// Server origin, e.g. http://localhost:1337
    origin: Option<String>,

    /// Server namespace prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Transport mount sub-path
    #[arg(long = "socket-path")]
    socket_path: Option<String>,

    /// Environment variable for the remote shell (KEY=VALUE, repeatable)
    #[arg(short, long = "env", value_name = "KEY=VALUE")]
    env: Vec<String>,

    /// Config file path
    #[arg(long)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr: stdout belongs to the remote shell.
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("gritty=debug,gritty_cli=debug,gritty_client=debug,gritty_core=debug")
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("gritty=warn,gritty_cli=warn")
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let config_path = cli.config.clone().unwrap_or_else(|| {
        let home = dirs::home_dir().unwrap_or_default();
        home.join(".gritty")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    });
    let cfg = config::Config::load(&config_path).unwrap_or_default();

    if let Err(e) = run(cli, cfg).await {
        error!("{:#}", e);
        eprintln!("gritty: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, cfg: config::Config) -> Result<()> {
    let origin = cli
        .origin
        .or_else(|| {
            let host = cfg.default.host.clone();
            (!host.is_empty()).then_some(host)
        })
        .context("no server origin given (pass one or set `default.host` in the config)")?;

    let mut env = cfg.default.env.clone();
    for pair in &cli.env {
        let (key, value) = config::parse_env_pair(pair)?;
        env.insert(key, value);
    }

    let bridge_config = BridgeConfig {
        socket_path: cli
            .socket_path
            .unwrap_or_else(|| cfg.default.socket_path.clone()),
        prefix: cli.prefix.unwrap_or_else(|| cfg.default.prefix.clone()),
        env,
        ..Default::default()
    };

    let (surface_tx, surface_rx) = mpsc::unbounded_channel();
    let (viewport_tx, viewport_rx) = mpsc::unbounded_channel();
    let (quit_tx, mut quit_rx) = mpsc::channel::<()>(1);

    let guard = terminal::RawModeGuard::enter()?;
    let surface = Box::new(terminal::CrosstermSurface::new(surface_tx.clone()));
    let reader = terminal::spawn_event_reader(surface_tx, viewport_tx, quit_tx);

    let handle = gritty_client::open(bridge_config, &origin, surface, surface_rx, viewport_rx);
    info!(%origin, "bridge started");

    // Block until the user detaches with Ctrl+].
    let _ = quit_rx.recv().await;
    info!("detach requested");

    handle.shutdown().await;
    reader.abort();
    drop(guard);

    eprintln!("\r\nConnection to {origin} closed.");
    Ok(())
}
