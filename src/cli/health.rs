use super::ui;
use crate::core::payload::HealthStatus;
use crate::providers::HttpBackend;
use anyhow::{Context, Result};

pub fn render(status: &HealthStatus, base_url: &str) -> String {
    let state = status.status.as_deref().unwrap_or("unknown");
    let styled = if state.eq_ignore_ascii_case("healthy") {
        ui::style_text(state, ui::StyleType::Value)
    } else {
        ui::style_text(state, ui::StyleType::Warning)
    };
    format!(
        "{}\n  Backend: {base_url}\n  Status: {styled}\n  Checked At: {}",
        ui::style_text("Backend Health", ui::StyleType::Title),
        status.timestamp.as_deref().unwrap_or(ui::PLACEHOLDER)
    )
}

pub async fn run(backend: &HttpBackend, base_url: &str) -> Result<()> {
    let status = backend
        .health()
        .await
        .with_context(|| format!("Backend at {base_url} is not healthy"))?;
    println!("{}", render(&status, base_url));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let status = HealthStatus {
            status: Some("healthy".to_string()),
            timestamp: Some("2025-06-30T10:00:00".to_string()),
        };
        let output = render(&status, "http://127.0.0.1:8000");
        assert!(output.contains("Backend: http://127.0.0.1:8000"));
        assert!(output.contains("healthy"));
        assert!(output.contains("Checked At: 2025-06-30T10:00:00"));

        let output = render(&HealthStatus::default(), "http://x");
        assert!(output.contains("unknown"));
        assert!(output.contains("Checked At: --"));
    }
}
