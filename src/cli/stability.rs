use super::{render_section, ui};
use crate::core::localize::StabilityCategory;
use crate::core::payload::StabilityData;
use crate::core::{SourcePayload, SourceState};

const GAUGE_WIDTH: usize = 30;
const COMPONENT_WIDTH: usize = 20;

fn extract(payload: &SourcePayload) -> Option<&StabilityData> {
    match payload {
        SourcePayload::Stability(data) => Some(data),
        _ => None,
    }
}

fn category_badge(category: StabilityCategory) -> String {
    let text = format!("[{category}]");
    match category {
        StabilityCategory::Stable => ui::style_text(&text, ui::StyleType::Value),
        StabilityCategory::Moderate => ui::style_text(&text, ui::StyleType::Warning),
        StabilityCategory::Unstable => ui::style_text(&text, ui::StyleType::Error),
        StabilityCategory::Unknown => ui::style_text(&text, ui::StyleType::Subtle),
    }
}

fn component_line(name: &str, value: Option<f64>) -> String {
    format!(
        "  {name:<22} {} {}",
        ui::percent_bar(value, COMPONENT_WIDTH),
        ui::format_optional(value, 1)
    )
}

/// Renders the stability gauge with its category and component breakdown.
pub fn render(state: Option<&SourceState>) -> String {
    render_section(
        state,
        extract,
        "Calculating Stability...",
        "Error loading stability score",
        |data| {
            let Some(score) = data.stability_score else {
                return ui::style_text(
                    "Invalid Data: Missing stability_score",
                    ui::StyleType::Error,
                );
            };
            let category = StabilityCategory::parse(data.category.as_deref());

            let mut output = format!(
                "{}\n\n  {} / 100  {}\n  {}\n",
                ui::style_text("Economic Stability Score", ui::StyleType::Title),
                ui::style_text(&format!("{score:.1}"), ui::StyleType::Value),
                category_badge(category),
                ui::percent_bar(Some(score), GAUGE_WIDTH)
            );
            if let Some(interpretation) = &data.interpretation {
                output.push_str(&format!("  {interpretation}\n"));
            }

            if let Some(components) = &data.components {
                output.push('\n');
                output.push_str(&ui::style_text("Components", ui::StyleType::Label));
                output.push('\n');
                output.push_str(
                    &[
                        component_line("Market Trend", components.market_trend),
                        component_line("Sentiment", components.sentiment),
                        component_line("Economic Indicators", components.economic_indicators),
                    ]
                    .join("\n"),
                );
            }
            output
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::payload::StabilityComponents;
    use crate::core::FetchError;

    fn succeeded(data: StabilityData) -> SourceState {
        SourceState::Succeeded(SourcePayload::Stability(data))
    }

    #[test]
    fn test_render_gauge() {
        let data = StabilityData {
            stability_score: Some(72.46),
            category: Some("Stable".to_string()),
            interpretation: Some("Markets are calm".to_string()),
            components: Some(StabilityComponents {
                market_trend: Some(80.0),
                sentiment: None,
                economic_indicators: Some(65.0),
            }),
        };
        let output = render(Some(&succeeded(data)));
        assert!(output.contains("Economic Stability Score"));
        assert!(output.contains("72.5"));
        assert!(output.contains("[Stable]"));
        assert!(output.contains("Markets are calm"));
        assert!(output.contains("Market Trend"));
        assert!(output.contains("80.0"));
        assert!(output.contains("Sentiment"));
        assert!(output.contains("--"));
    }

    #[test]
    fn test_unrecognized_category() {
        let data = StabilityData {
            stability_score: Some(40.0),
            category: Some("volatile".to_string()),
            ..Default::default()
        };
        let output = render(Some(&succeeded(data)));
        assert!(output.contains("[Unknown]"));
        assert!(!output.contains("Components"));
    }

    #[test]
    fn test_missing_score() {
        let output = render(Some(&succeeded(StabilityData::default())));
        assert!(output.contains("Invalid Data: Missing stability_score"));
    }

    #[test]
    fn test_states() {
        assert!(render(Some(&SourceState::Pending)).contains("Calculating Stability..."));
        let failed = SourceState::Failed(FetchError::timeout());
        assert!(render(Some(&failed)).contains("Request timed out"));
    }
}
