//! Data sources, their per-cycle state and the aggregated view

use super::payload::{ForecastData, MarketData, SentimentData, StabilityData};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use thiserror::Error;

pub const TIMEOUT_MESSAGE: &str =
    "Request timed out. Backend may be busy (first load can take a minute). Try refreshing.";
pub const REMOTE_FALLBACK_MESSAGE: &str = "Failed to load data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Market,
    Forecast,
    Sentiment,
    Stability,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Market,
        SourceKind::Forecast,
        SourceKind::Sentiment,
        SourceKind::Stability,
    ];

    /// Endpoint path on the backend, without query parameters.
    pub fn path(&self) -> &'static str {
        match self {
            SourceKind::Market => "/market-data",
            SourceKind::Forecast => "/forecast",
            SourceKind::Sentiment => "/sentiment",
            SourceKind::Stability => "/stability-score",
        }
    }
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SourceKind::Market => "market",
                SourceKind::Forecast => "forecast",
                SourceKind::Sentiment => "sentiment",
                SourceKind::Stability => "stability",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The request was aborted or its deadline elapsed.
    Timeout,
    /// The endpoint could not be reached at all.
    Unreachable,
    /// The backend answered with a failure.
    Remote,
    Unknown,
}

/// A fetch failure, classified once where it happens.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout, TIMEOUT_MESSAGE)
    }

    /// A failure reported by the backend. `detail` is the message found in
    /// the response body, if any.
    pub fn remote(detail: Option<String>) -> Self {
        Self::new(
            ErrorKind::Remote,
            detail.unwrap_or_else(|| REMOTE_FALLBACK_MESSAGE.to_string()),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourcePayload {
    Market(MarketData),
    Forecast(ForecastData),
    Sentiment(SentimentData),
    Stability(StabilityData),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SourceState {
    #[default]
    Pending,
    Succeeded(SourcePayload),
    Failed(FetchError),
}

impl SourceState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SourceState::Pending)
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            SourceState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Result<SourcePayload, FetchError>> for SourceState {
    fn from(result: Result<SourcePayload, FetchError>) -> Self {
        match result {
            Ok(payload) => SourceState::Succeeded(payload),
            Err(e) => SourceState::Failed(e),
        }
    }
}

/// Overall condition of a view, as seen by presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewHealth {
    /// Some sources are still pending and none has failed.
    Loading,
    /// Every source succeeded.
    Healthy,
    /// At least one source failed and at least one succeeded.
    Degraded,
    /// Every source failed.
    Blocked,
    /// Failures only, but some sources are still pending.
    Failing,
}

/// Snapshot of every source's state for one fetch cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregatedView {
    pub cycle: u64,
    states: BTreeMap<SourceKind, SourceState>,
}

impl AggregatedView {
    pub fn new(sources: &[SourceKind]) -> Self {
        Self {
            cycle: 0,
            states: sources
                .iter()
                .map(|kind| (*kind, SourceState::Pending))
                .collect(),
        }
    }

    pub fn get(&self, kind: SourceKind) -> Option<&SourceState> {
        self.states.get(&kind)
    }

    pub fn sources(&self) -> impl Iterator<Item = (SourceKind, &SourceState)> {
        self.states.iter().map(|(kind, state)| (*kind, state))
    }

    /// Resets every source to `Pending` under a new cycle number.
    pub(crate) fn reset(&mut self, cycle: u64) {
        self.cycle = cycle;
        for state in self.states.values_mut() {
            *state = SourceState::Pending;
        }
    }

    /// Records an outcome for `kind`. Returns false when the outcome belongs
    /// to a superseded cycle, the source is unknown, or it already settled.
    pub(crate) fn settle(&mut self, cycle: u64, kind: SourceKind, state: SourceState) -> bool {
        if cycle != self.cycle {
            return false;
        }
        match self.states.get_mut(&kind) {
            Some(current) if !current.is_terminal() => {
                *current = state;
                true
            }
            _ => false,
        }
    }

    fn count(&self, predicate: impl Fn(&SourceState) -> bool) -> usize {
        self.states.values().filter(|s| predicate(s)).count()
    }

    pub fn succeeded_count(&self) -> usize {
        self.count(|s| matches!(s, SourceState::Succeeded(_)))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, SourceState::Failed(_)))
    }

    pub fn is_ready(&self) -> bool {
        self.states.values().all(SourceState::is_terminal)
    }

    pub fn is_degraded(&self) -> bool {
        self.failed_count() > 0 && self.succeeded_count() > 0
    }

    pub fn is_fully_blocked(&self) -> bool {
        !self.states.is_empty() && self.failed_count() == self.states.len()
    }

    pub fn health(&self) -> ViewHealth {
        if self.is_fully_blocked() {
            ViewHealth::Blocked
        } else if self.is_degraded() {
            ViewHealth::Degraded
        } else if self.failed_count() > 0 {
            ViewHealth::Failing
        } else if self.is_ready() {
            ViewHealth::Healthy
        } else {
            ViewHealth::Loading
        }
    }
}

/// Fetches one source's payload from wherever the dashboard data lives.
#[async_trait]
pub trait DashboardClient: Send + Sync {
    async fn fetch(&self, kind: SourceKind) -> Result<SourcePayload, FetchError>;
}
