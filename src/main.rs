//! SSO dev proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────┐
//!                    │                     DEV SERVER                        │
//!  Browser request   │  ┌─────────┐   ┌─────────┐   ┌───────────────────┐   │
//!  ──────────────────┼─▶│  http   │──▶│ routing │──▶│ policy hooks      │   │
//!                    │  │ server  │   │ (prefix)│   │ bypass / req / res│   │
//!                    │  └─────────┘   └─────────┘   └─────────┬─────────┘   │
//!                    │                                        │             │
//!                    │        ┌───────────────────┬───────────┴──────┐      │
//!                    │        ▼                   ▼                  ▼      │
//!                    │  ┌───────────┐      ┌────────────┐     ┌──────────┐  │
//!                    │  │root gate  │      │ forward to │     │  static  │  │
//!                    │  │302 /login │      │ API / SSO  │     │  files   │  │
//!                    │  └───────────┘      └─────┬──────┘     └──────────┘  │
//!                    │                           │                          │
//!                    │                   ┌───────▼───────┐                  │
//!                    │                   │ cookie store  │                  │
//!                    │                   │ (per UA jar)  │                  │
//!                    │                   └───────────────┘                  │
//!                    └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use sso_dev_proxy::config::{load_config, ConfigOverrides};
use sso_dev_proxy::lifecycle::{signals, startup, Shutdown};
use sso_dev_proxy::observability::{logging, metrics};
use sso_dev_proxy::{CookieStore, HttpServer};

#[derive(Parser)]
#[command(name = "sso-dev-proxy")]
#[command(about = "Local dev server that relays SSO cookies to API upstreams", long_about = None)]
struct Cli {
    /// TOML config file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override upstreams.api.
    #[arg(long)]
    api: Option<String>,

    /// Override upstreams.sso.
    #[arg(long)]
    sso: Option<String>,

    /// Override dev_server.static_dir.
    #[arg(long)]
    static_dir: Option<String>,

    /// Do not open a browser on startup.
    #[arg(long)]
    no_open: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind_address: self.bind.clone(),
            api: self.api.clone(),
            sso: self.sso.clone(),
            static_dir: self.static_dir.clone(),
            no_open: self.no_open,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), &cli.overrides())?;

    logging::init_logging(&config.observability)?;

    tracing::info!("sso-dev-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        api = %config.upstreams.api,
        sso = %config.upstreams.sso,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let open = config.dev_server.open;
    let landing = config.auth.landing_path.clone();
    let server = HttpServer::new(config, CookieStore::new())?;

    if open {
        let url = startup::browser_url(local_addr, &landing);
        if let Err(e) = startup::open_browser(&url) {
            tracing::warn!(url = %url, error = %e, "Failed to open browser");
        }
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
