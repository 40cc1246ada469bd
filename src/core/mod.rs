//! Core business logic abstractions

pub mod config;
pub mod localize;
pub mod log;
pub mod orchestrator;
pub mod payload;
pub mod source;

// Re-export main types for cleaner imports
pub use orchestrator::Orchestrator;
pub use source::{
    AggregatedView, DashboardClient, ErrorKind, FetchError, SourceKind, SourcePayload,
    SourceState, ViewHealth,
};
