use super::{forecast, market, sentiment, stability, ui};
use crate::core::{AggregatedView, Orchestrator, SourceKind, SourceState};
use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Starts a fetch cycle and shows one spinner per source until every source
/// has settled. Each spinner finishes as soon as its own source does.
pub async fn fetch_with_progress(orchestrator: &Orchestrator) -> AggregatedView {
    let mut rx = orchestrator.subscribe();
    let cycle = orchestrator.start();

    let multi = MultiProgress::new();
    let mut spinners: BTreeMap<SourceKind, ProgressBar> = orchestrator
        .sources()
        .iter()
        .map(|kind| (*kind, ui::new_spinner(&multi, format!("Fetching {kind}..."))))
        .collect();

    let view = loop {
        let view = rx.borrow_and_update().clone();
        for (kind, state) in view.sources() {
            if !state.is_terminal() {
                continue;
            }
            if let Some(pb) = spinners.remove(&kind) {
                let status = match state {
                    SourceState::Failed(_) => "failed",
                    _ => "loaded",
                };
                pb.finish_with_message(format!("{kind} {status}"));
            }
        }
        if view.cycle == cycle && view.is_ready() {
            break view;
        }
        if rx.changed().await.is_err() {
            break orchestrator.current_view();
        }
    };

    if let Err(e) = multi.clear() {
        debug!(error = %e, "Failed to clear progress bars");
    }
    view
}

fn degraded_banner(view: &AggregatedView) -> String {
    let failed: Vec<String> = view
        .sources()
        .filter(|(_, state)| matches!(state, SourceState::Failed(_)))
        .map(|(kind, _)| kind.to_string())
        .collect();
    ui::style_text(
        &format!(
            "⚠ Some data could not be loaded ({}). Showing what is available.",
            failed.join(", ")
        ),
        ui::StyleType::Warning,
    )
}

/// Composes the dashboard from whatever the view holds. Sections that are
/// still pending or failed render their own inline state.
pub fn render_dashboard(view: &AggregatedView) -> String {
    let mut sections = vec![ui::style_text(
        "Economic Stability Dashboard",
        ui::StyleType::Title,
    )];
    if view.is_degraded() {
        sections.push(degraded_banner(view));
    }
    sections.push(stability::render(view.get(SourceKind::Stability)));
    sections.push(market::render(view.get(SourceKind::Market), false));
    sections.push(forecast::render_card(view.get(SourceKind::Forecast)));
    sections.push(sentiment::render_card(view.get(SourceKind::Sentiment)));
    sections.join("\n\n")
}

/// The full-page error shown when no source could be loaded.
pub fn render_blocked(view: &AggregatedView, base_url: &str) -> String {
    let mut output = ui::style_text("Unable to Load Dashboard", ui::StyleType::Title);
    output.push_str("\n\n");
    for (kind, state) in view.sources() {
        if let Some(e) = state.error() {
            output.push_str(&format!(
                "  {} {}\n",
                ui::style_text(&format!("{kind}:"), ui::StyleType::Label),
                ui::style_text(&e.to_string(), ui::StyleType::Error)
            ));
        }
    }
    output.push('\n');
    output.push_str(&ui::style_text("Troubleshooting", ui::StyleType::Label));
    output.push_str(&format!(
        "\n  1. Make sure the backend is running at {base_url}\n  \
         2. Run `esd health` to check that it responds\n  \
         3. The first load can take a minute while the forecast model warms up\n  \
         4. Check `backend.base_url` in your configuration file"
    ));
    output
}

/// Asks whether to retry. Anything but `r` (or a non-interactive terminal)
/// means no.
async fn prompt_retry() -> bool {
    let answer = tokio::task::spawn_blocking(|| {
        let term = console::Term::stderr();
        term.write_line("\nPress 'r' to retry, any other key to quit.")
            .and_then(|_| term.read_key())
    })
    .await;
    matches!(answer, Ok(Ok(console::Key::Char('r' | 'R'))))
}

/// Fetches every source and prints the dashboard. When all sources fail the
/// blocking error page is shown, offering a retry when `interactive`.
pub async fn run(orchestrator: &Orchestrator, base_url: &str, interactive: bool) -> Result<()> {
    loop {
        let view = fetch_with_progress(orchestrator).await;
        info!(cycle = view.cycle, health = ?view.health(), "Dashboard fetch finished");

        if !view.is_fully_blocked() {
            println!("{}", render_dashboard(&view));
            return Ok(());
        }

        println!("{}", render_blocked(&view, base_url));
        if interactive && prompt_retry().await {
            warn!("Retrying after all sources failed");
            ui::print_separator();
            continue;
        }
        anyhow::bail!("All {} data sources failed to load", view.sources().count());
    }
}
