use super::{render_section, ui};
use crate::core::payload::{ForecastData, ForecastPoint};
use crate::core::{SourcePayload, SourceState};
use chrono::NaiveDate;
use comfy_table::Cell;

fn extract(payload: &SourcePayload) -> Option<&ForecastData> {
    match payload {
        SourcePayload::Forecast(data) => Some(data),
        _ => None,
    }
}

/// Reformats an ISO date with `format`, keeping unparseable input as is.
fn format_date(date: Option<&str>, format: &str) -> String {
    match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map(|parsed| parsed.format(format).to_string())
            .unwrap_or_else(|_| d.to_string()),
        None => ui::PLACEHOLDER.to_string(),
    }
}

fn rupees(value: Option<f64>) -> String {
    value.map_or(ui::PLACEHOLDER.to_string(), |v| {
        format!("₹{}", ui::format_number(v, 2))
    })
}

fn forecast_table(points: &[ForecastPoint], date_format: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Predicted"),
        ui::header_cell("Lower Bound"),
        ui::header_cell("Upper Bound"),
        ui::header_cell("Confidence"),
    ]);
    for point in points {
        table.add_row(vec![
            Cell::new(format_date(point.date.as_deref(), date_format)),
            ui::format_optional_cell(point.predicted, |v| rupees(Some(v))),
            ui::format_optional_cell(point.lower, |v| rupees(Some(v))),
            ui::format_optional_cell(point.upper, |v| rupees(Some(v))),
            ui::format_optional_cell(point.confidence, |v| format!("{v:.1}%")),
        ]);
    }
    table.to_string()
}

/// Compact forecast card for the dashboard.
pub fn render_card(state: Option<&SourceState>) -> String {
    render_section(state, extract, "Loading Forecast...", "Error", |data| {
        if data.forecast.is_empty() {
            return ui::style_text("No forecast data available", ui::StyleType::Subtle);
        }
        let trend = data
            .summary
            .as_ref()
            .and_then(|s| s.trend.as_deref())
            .unwrap_or("Forecast created");
        let score = data
            .forecast_score
            .map_or(ui::PLACEHOLDER.to_string(), |s| s.to_string());

        let mut output = format!(
            "{}\n\nCurrent Value: {}   Forecast Score: {}\nTrend: {}\n\n",
            ui::style_text("7-Day Market Forecast (NIFTY 50)", ui::StyleType::Title),
            ui::style_text(&rupees(data.current_value), ui::StyleType::Value),
            ui::style_text(&score, ui::StyleType::Label),
            trend
        );
        output.push_str(&forecast_table(&data.forecast, "%b %-d"));
        output.push('\n');
        output.push_str(&ui::style_text(
            data.note.as_deref().unwrap_or("AI-generated prediction"),
            ui::StyleType::Subtle,
        ));
        output
    })
}

/// Full forecast page with summary statistics and model details.
pub fn render_page(state: Option<&SourceState>) -> String {
    render_section(
        state,
        extract,
        "Generating 7-Day Market Forecast...",
        "Error",
        |data| {
            let summary = data.summary.clone().unwrap_or_default();
            let score = ui::format_percent(data.forecast_score, 2);

            let mut output = format!(
                "{}\n\n{}\nCurrent Value: {} | Forecast Score: {}\n\n",
                ui::style_text("7-Day Market Forecast", ui::StyleType::Title),
                ui::style_text("NIFTY 50 Forecast", ui::StyleType::Label),
                rupees(data.current_value),
                score
            );

            output.push_str(&ui::style_text("Forecast Summary", ui::StyleType::Label));
            output.push_str(&format!(
                "\n  Trend: {}\n  Average Confidence: {}\n  Volatility: {}\n\n",
                summary.trend.as_deref().unwrap_or(ui::PLACEHOLDER),
                ui::format_percent(summary.avg_confidence, 1),
                ui::format_optional(summary.volatility, 2)
            ));

            output.push_str(&ui::style_text("Model Information", ui::StyleType::Label));
            output.push_str(&format!(
                "\n  Model: {}\n  Note: {}\n\n",
                data.model.as_deref().unwrap_or("Unknown"),
                data.note.as_deref().unwrap_or(ui::PLACEHOLDER)
            ));

            output.push_str(&ui::style_text("Forecast Details", ui::StyleType::Label));
            output.push('\n');
            output.push_str(&forecast_table(&data.forecast, "%d/%m/%Y"));
            output
        },
    )
}
