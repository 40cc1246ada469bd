pub mod dashboard;
pub mod forecast;
pub mod health;
pub mod market;
pub mod sentiment;
pub mod setup;
pub mod stability;
pub mod ui;

use crate::core::{SourcePayload, SourceState};

/// Renders one source's section: a loading line while pending, the inline
/// error once failed, or the payload through `render`.
pub(crate) fn render_section<T>(
    state: Option<&SourceState>,
    extract: impl Fn(&SourcePayload) -> Option<&T>,
    loading: &str,
    error_prefix: &str,
    render: impl Fn(&T) -> String,
) -> String {
    match state {
        Some(SourceState::Pending) => ui::style_text(loading, ui::StyleType::Subtle),
        Some(SourceState::Failed(e)) => {
            ui::style_text(&format!("{error_prefix}: {e}"), ui::StyleType::Error)
        }
        Some(SourceState::Succeeded(payload)) => match extract(payload) {
            Some(data) => render(data),
            None => ui::style_text("Data unavailable.", ui::StyleType::Error),
        },
        None => ui::style_text("Data unavailable.", ui::StyleType::Error),
    }
}
