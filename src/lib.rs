pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{Orchestrator, SourceKind, SourceState};
use crate::providers::HttpBackend;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Commands that talk to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// All four sources. `interactive` enables the retry prompt when every
    /// source fails.
    Dashboard { interactive: bool },
    Market,
    Forecast,
    Sentiment,
    Health,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Economic stability dashboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let base_url = config.backend.base_url.as_str();
    let backend = Arc::new(HttpBackend::from_config(&config.backend, &config.indicators)?);
    let deadline = config.backend.timeout();

    match command {
        AppCommand::Dashboard { interactive } => {
            let orchestrator = Orchestrator::for_dashboard(backend, deadline);
            cli::dashboard::run(&orchestrator, base_url, interactive).await
        }
        AppCommand::Market => {
            run_page(backend, SourceKind::Market, deadline, |state| {
                cli::market::render(state, true)
            })
            .await
        }
        AppCommand::Forecast => {
            run_page(backend, SourceKind::Forecast, deadline, cli::forecast::render_page).await
        }
        AppCommand::Sentiment => {
            run_page(backend, SourceKind::Sentiment, deadline, cli::sentiment::render_page).await
        }
        AppCommand::Health => cli::health::run(&backend, base_url).await,
    }
}

/// Fetches a single source and prints its page. A failed source is shown
/// inline and then reported as the command's error.
async fn run_page(
    backend: Arc<HttpBackend>,
    kind: SourceKind,
    deadline: std::time::Duration,
    render: impl Fn(Option<&SourceState>) -> String,
) -> Result<()> {
    let orchestrator = Orchestrator::new(backend, &[kind], deadline);
    let view = cli::dashboard::fetch_with_progress(&orchestrator).await;
    let state = view.get(kind);
    println!("{}", render(state));

    match state.and_then(SourceState::error) {
        Some(e) => Err(anyhow::Error::new(e.clone()).context(format!("Failed to load {kind}"))),
        None => Ok(()),
    }
}
