//! Assessment Data Retriever server — Canvas proxy for the grading frontend.
//!
//! Serves the frontend, proxies Canvas (courses, assignments, submissions,
//! grading), computes per-section analytics and extracts majors from
//! uploaded photo-roster PDFs. Holds no state between requests.
//!
//! Usage:
//!   CANVAS_BASE_URL=https://usflearn.instructure.com assessment-server
//!
//! Or with args:
//!   assessment-server --config /path/to/settings.json --bind 127.0.0.1:8765

use assessment_bridge_lib::http_server::{router, AppState};
use assessment_bridge_lib::settings::{self, Settings};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "assessment-server", version, about = "Canvas LMS proxy with roster PDF major lookup")]
struct Args {
    /// Settings file (default: $ASSESSMENT_CONFIG or the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Bind address, overrides settings and ASSESSMENT_BIND
    #[arg(long)]
    bind: Option<String>,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() {
    assessment_bridge_lib::init_logging("info,tower_http=info");
    let args = Args::parse();

    let config_path = settings::find_settings_file(args.config.as_deref());
    let mut settings = Settings::load(&config_path).with_env_overrides();
    if let Some(bind) = args.bind {
        settings.bind = bind;
    }

    tracing::info!(config = %config_path.display(), "settings loaded");
    tracing::info!(canvas = %settings.api_base(), frontend = %settings.frontend_dir.display(), "upstream configured");

    let state = match AppState::from_settings(&settings) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "failed to build Canvas client");
            std::process::exit(1);
        }
    };
    let app = router(state, &settings);

    let listener = match tokio::net::TcpListener::bind(&settings.bind).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(bind = %settings.bind, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(bind = %settings.bind, "listening");
    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
