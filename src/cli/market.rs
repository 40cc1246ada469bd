use super::{render_section, ui};
use crate::core::localize::{
    self, CommodityKind, FxRate, LocalizedMetric, change_label, historical_returns,
};
use crate::core::payload::{MarketData, RawQuote};
use crate::core::{SourcePayload, SourceState};
use comfy_table::Cell;

fn extract(payload: &SourcePayload) -> Option<&MarketData> {
    match payload {
        SourcePayload::Market(data) => Some(data),
        _ => None,
    }
}

/// Instruments shown on the market card, in display order.
fn instruments(data: &MarketData, detailed: bool) -> Vec<(&'static str, CommodityKind, Option<&RawQuote>)> {
    let mut rows = vec![
        ("NIFTY 50", CommodityKind::Index, data.nifty.as_ref()),
        ("SENSEX", CommodityKind::Index, data.sensex.as_ref()),
    ];
    if detailed {
        rows.extend([
            ("Gold (India 24K)", CommodityKind::Gold, data.gold.as_ref()),
            ("Silver (India)", CommodityKind::Silver, data.silver.as_ref()),
            ("Crude Oil (WTI)", CommodityKind::Oil, data.oil.as_ref()),
            ("USD / INR", CommodityKind::Fx, data.inr.as_ref()),
        ]);
    }
    rows
}

pub fn render(state: Option<&SourceState>, detailed: bool) -> String {
    render_section(
        state,
        extract,
        "Fetching Market Data...",
        "Error loading market data",
        |data| render_market(data, detailed),
    )
}

fn price(metric: &LocalizedMetric) -> String {
    let decimals = match metric.kind {
        CommodityKind::Gold => 0,
        CommodityKind::Silver => 1,
        _ => 2,
    };
    match metric.hero_value {
        Some(v) => format!("{}{}", metric.hero_unit.symbol(), ui::format_number(v, decimals)),
        None => ui::PLACEHOLDER.to_string(),
    }
}

/// The per-unit breakdown shown under gold and silver.
fn localized_block(name: &str, metric: &LocalizedMetric) -> String {
    let hero_decimals = if metric.kind == CommodityKind::Silver { 1 } else { 0 };
    let mut parts = vec![format!(
        "{}: ₹{}",
        metric.hero_unit,
        ui::format_optional(metric.hero_value, hero_decimals)
    )];
    if let Some(alternate) = &metric.alternate {
        parts.push(format!(
            "{}: ₹{}",
            alternate.unit,
            ui::format_optional(alternate.value, 0)
        ));
    }
    parts.push(format!(
        "Global Spot (Raw): ${} {}",
        ui::format_optional(metric.global_spot_value, 2),
        metric.global_spot_unit
    ));
    format!("{}  {}", ui::style_text(name, ui::StyleType::Label), parts.join(" | "))
}

fn history_line(name: &str, quote: &RawQuote) -> Option<String> {
    let history = historical_returns(quote)?;
    let fmt = |v: Option<f64>| v.map_or(ui::PLACEHOLDER.to_string(), |v| format!("{v:+}%"));
    Some(format!(
        "{}  1 Mo: {} | 1 Yr: {} | 5 Yr: {}",
        ui::style_text(name, ui::StyleType::Label),
        fmt(history.one_month),
        fmt(history.one_year),
        fmt(history.five_years)
    ))
}

pub fn render_market(data: &MarketData, detailed: bool) -> String {
    let title = if detailed {
        "Detailed Economic Indicators"
    } else {
        "Market Overview"
    };
    let mut output = ui::style_text(title, ui::StyleType::Title);
    match data.is_live {
        Some(true) => output.push_str(&format!("  {}", ui::style_text("● Live Data", ui::StyleType::Value))),
        Some(false) => output.push_str(&format!(
            "  {}",
            ui::style_text("● Simulated Data", ui::StyleType::Warning)
        )),
        None => {}
    }
    output.push('\n');
    output.push_str(&ui::style_text(
        "Auto-updates: Market Close (3:30 PM IST)",
        ui::StyleType::Subtle,
    ));
    output.push_str("\n\n");

    let fx = FxRate::from_market(Some(data));
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Instrument"),
        ui::header_cell("Price"),
        ui::header_cell("Change"),
        ui::header_cell("Open"),
        ui::header_cell("High"),
        ui::header_cell("Low"),
        ui::header_cell("Volatility"),
    ]);

    let mut localized = Vec::new();
    let mut history = Vec::new();
    for (name, kind, quote) in instruments(data, detailed) {
        let (Some(quote), Some(metric)) = (quote, localize::localize(kind, quote, fx)) else {
            table.add_row(vec![Cell::new(name), Cell::new(ui::PLACEHOLDER)]);
            continue;
        };

        let symbol = metric.global_spot_unit.symbol();
        table.add_row(vec![
            Cell::new(name),
            Cell::new(price(&metric)).set_alignment(comfy_table::CellAlignment::Right),
            ui::change_cell(change_label(quote)),
            ui::format_optional_cell(quote.open, |v| format!("{symbol}{}", ui::format_number(v, 2))),
            ui::format_optional_cell(quote.high, |v| format!("{symbol}{}", ui::format_number(v, 2))),
            ui::format_optional_cell(quote.low, |v| format!("{symbol}{}", ui::format_number(v, 2))),
            ui::format_optional_cell(quote.volatility, |v| format!("{v:.2}%")),
        ]);

        if metric.alternate.is_some() {
            localized.push(localized_block(name, &metric));
        }
        if let Some(line) = history_line(name, quote) {
            history.push(line);
        }
    }
    output.push_str(&table.to_string());

    if !localized.is_empty() {
        output.push_str("\n\n");
        output.push_str(&localized.join("\n"));
        if !fx.is_live() {
            output.push('\n');
            output.push_str(&ui::style_text(
                &format!(
                    "Converted at default rate ₹{:.2}/USD (live rate unavailable)",
                    fx.value()
                ),
                ui::StyleType::Warning,
            ));
        }
    }
    if !history.is_empty() {
        output.push_str("\n\n");
        output.push_str(&ui::style_text("Historical Returns", ui::StyleType::Label));
        output.push('\n');
        output.push_str(&history.join("\n"));
    }

    let date = data
        .date
        .clone()
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
    output.push_str("\n\n");
    output.push_str(&ui::style_text(
        &format!("Data Sources: NSE, BSE, COMEX via Yahoo Finance • Last Updated: {date}"),
        ui::StyleType::Subtle,
    ));
    if data.is_live == Some(false) {
        if let Some(note) = &data.note {
            output.push('\n');
            output.push_str(&ui::style_text(note, ui::StyleType::Warning));
        }
    }
    output
}
