//! Concurrent, failure-isolated fetching of dashboard sources.
//!
//! Each `start()` opens a new cycle: every source is reset to `Pending` and
//! one attempt per source is spawned. Attempts settle their own source only,
//! and only if their cycle is still the current one, so a slow attempt from
//! an earlier cycle can never overwrite a newer result.

use super::source::{AggregatedView, DashboardClient, FetchError, SourceKind, SourceState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

pub struct Orchestrator {
    client: Arc<dyn DashboardClient>,
    sources: Vec<SourceKind>,
    deadline: Duration,
    view: Arc<watch::Sender<AggregatedView>>,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn DashboardClient>, sources: &[SourceKind], deadline: Duration) -> Self {
        let mut sources = sources.to_vec();
        sources.sort();
        sources.dedup();
        let (tx, _) = watch::channel(AggregatedView::new(&sources));
        Self {
            client,
            sources,
            deadline,
            view: Arc::new(tx),
        }
    }

    /// An orchestrator over all four dashboard sources.
    pub fn for_dashboard(client: Arc<dyn DashboardClient>, deadline: Duration) -> Self {
        Self::new(client, &SourceKind::ALL, deadline)
    }

    pub fn sources(&self) -> &[SourceKind] {
        &self.sources
    }

    /// Starts a new fetch cycle and returns its number. Must be called from
    /// within a tokio runtime.
    pub fn start(&self) -> u64 {
        let mut cycle = 0;
        self.view.send_modify(|view| {
            cycle = view.cycle + 1;
            view.reset(cycle);
        });
        debug!(cycle, sources = ?self.sources, "Starting fetch cycle");

        for kind in &self.sources {
            let client = Arc::clone(&self.client);
            let view = Arc::clone(&self.view);
            tokio::spawn(run_attempt(client, view, *kind, cycle, self.deadline));
        }
        cycle
    }

    pub fn current_view(&self) -> AggregatedView {
        self.view.borrow().clone()
    }

    /// Receives a notification on every state change.
    pub fn subscribe(&self) -> watch::Receiver<AggregatedView> {
        self.view.subscribe()
    }

    /// Waits until every source of the current cycle has settled.
    pub async fn wait_until_ready(&self) -> AggregatedView {
        let mut rx = self.subscribe();
        match rx.wait_for(AggregatedView::is_ready).await {
            Ok(view) => view.clone(),
            // Unreachable while `self` holds the sender
            Err(_) => self.current_view(),
        }
    }
}

#[instrument(name = "SourceAttempt", skip(client, view, deadline), fields(source = %kind))]
async fn run_attempt(
    client: Arc<dyn DashboardClient>,
    view: Arc<watch::Sender<AggregatedView>>,
    kind: SourceKind,
    cycle: u64,
    deadline: Duration,
) {
    let outcome = match tokio::time::timeout(deadline, client.fetch(kind)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::timeout()),
    };

    match &outcome {
        Ok(_) => debug!("Source fetched"),
        Err(e) => warn!(kind = ?e.kind, error = %e, "Source failed"),
    }

    let state = SourceState::from(outcome);
    let applied = view.send_if_modified(|view| view.settle(cycle, kind, state));
    if !applied {
        debug!("Discarding outcome of superseded cycle");
    }
}
