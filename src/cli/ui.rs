use crate::core::localize::ChangeLabel;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Shown wherever a value is missing.
pub const PLACEHOLDER: &str = "--";

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Value,
    Error,
    Warning,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Value => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Warning => style(text).yellow(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as the placeholder.
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new(PLACEHOLDER)
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Creates a cell for a change label with color coding. Quotes without a
/// complete change render an empty cell.
pub fn change_cell(label: Option<ChangeLabel>) -> Cell {
    match label {
        Some(label) => {
            let color = if label.is_positive() {
                Color::Green
            } else {
                Color::Red
            };
            Cell::new(label.to_string())
                .fg(color)
                .set_alignment(CellAlignment::Right)
        }
        None => Cell::new(""),
    }
}

/// Formats `value` with `decimals` fractional digits and grouped thousands.
pub fn format_number(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Formats an optional number, falling back to the placeholder.
pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or(PLACEHOLDER.to_string(), |v| format_number(v, decimals))
}

/// Formats an optional percentage, falling back to the placeholder.
pub fn format_percent(value: Option<f64>, decimals: usize) -> String {
    value.map_or(PLACEHOLDER.to_string(), |v| format!("{v:.decimals$}%"))
}

/// Renders a horizontal bar for a percentage in `[0, 100]`.
pub fn percent_bar(value: Option<f64>, width: usize) -> String {
    let filled = value
        .map(|v| ((v.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize)
        .unwrap_or(0);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Creates a spinner attached to `multi` for one pending fetch.
pub fn new_spinner(multi: &MultiProgress, message: String) -> ProgressBar {
    let pb = multi.add(ProgressBar::new_spinner());
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")
    {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    println!("\n{}", "─".repeat(term_width()));
}

pub fn term_width() -> usize {
    console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(69975.0, 0), "69,975");
        assert_eq!(format_number(22000.5, 2), "22,000.50");
        assert_eq!(format_number(87.5, 1), "87.5");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-1500.0, 0), "-1,500");
        assert_eq!(format_number(-0.001, 2), "0.00");
    }

    #[test]
    fn test_optional_formatting() {
        assert_eq!(format_optional(None, 2), PLACEHOLDER);
        assert_eq!(format_optional(Some(1.234), 2), "1.23");
        assert_eq!(format_percent(Some(64.26), 1), "64.3%");
        assert_eq!(format_percent(None, 1), PLACEHOLDER);
    }

    #[test]
    fn test_percent_bar() {
        assert_eq!(percent_bar(Some(50.0), 4), "██░░");
        assert_eq!(percent_bar(Some(150.0), 2), "██");
        assert_eq!(percent_bar(None, 3), "░░░");
    }
}
