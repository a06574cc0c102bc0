//! scribe-server: the content assistant gateway.
//!
//! Boot sequence: configuration (environment, then flags), tracing, shared
//! clients, and finally the HTTP listener, which drains on SIGINT / SIGTERM.
//! Chat histories load per client on first request.

mod clients;
mod config;
mod error;
mod logging;
mod middleware;
mod routes;
mod schemas;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::state::AppState;

/// Content assistant gateway: chat proxy, Drive proxy and social statistics.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Address to bind, overrides `SCRIBE_BIND`.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Session history directory, overrides `SCRIBE_SESSIONS_DIR`.
    #[arg(long, value_name = "DIR")]
    sessions_dir: Option<PathBuf>,

    /// Emit newline-delimited JSON logs.
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn apply(self, cfg: &mut Config) {
        if let Some(bind) = self.bind {
            cfg.bind_address = bind;
        }
        if let Some(dir) = self.sessions_dir {
            cfg.sessions_dir = dir;
        }
        cfg.log_json |= self.log_json;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cfg = Config::from_env();
    Cli::parse().apply(&mut cfg);

    let _log_guard = logging::init(&cfg);
    info!(version = env!("CARGO_PKG_VERSION"), "scribe-server starting");
    if cfg.backend_url.is_none() {
        warn!("BACKEND_URL not set; chat answers with demo content and Drive is unavailable");
    }

    let state = Arc::new(AppState::new(cfg.clone()).context("building HTTP client")?);
    info!(dir = %state.sessions.dir().display(), "session store ready");

    let listener = TcpListener::bind(cfg.bind_address.as_str())
        .await
        .with_context(|| format!("binding {}", cfg.bind_address))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, routes::build(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("scribe-server stopped");
    Ok(())
}

/// Completes on the first of Ctrl-C or (on Unix) SIGTERM. A handler that
/// cannot be installed never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("shutting down");
}
