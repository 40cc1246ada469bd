use super::{render_section, ui};
use crate::core::localize::Outlook;
use crate::core::payload::{Article, SentimentData};
use crate::core::{SourcePayload, SourceState};
use comfy_table::{Cell, Color};

const HEADLINES_ON_CARD: usize = 5;

fn extract(payload: &SourcePayload) -> Option<&SentimentData> {
    match payload {
        SourcePayload::Sentiment(data) => Some(data),
        _ => None,
    }
}

fn outlook_color(outlook: Outlook) -> Color {
    match outlook {
        Outlook::Positive => Color::Green,
        Outlook::Neutral => Color::Yellow,
        Outlook::Negative => Color::Red,
    }
}

fn label_glyph(label: &str) -> &'static str {
    match label {
        "positive" => "📈",
        "negative" => "📉",
        _ => "➡️",
    }
}

fn compound_cell(article: &Article, decimals: usize) -> Cell {
    match article.sentiment.as_ref().and_then(|s| s.compound) {
        Some(c) => Cell::new(format!("{c:.decimals$}")).fg(outlook_color(Outlook::from_compound(c))),
        None => Cell::new("N/A").fg(Color::DarkGrey),
    }
}

fn text_or_placeholder(value: Option<&str>) -> &str {
    value.unwrap_or(ui::PLACEHOLDER)
}

/// Compact sentiment card for the dashboard.
pub fn render_card(state: Option<&SourceState>) -> String {
    render_section(
        state,
        extract,
        "Analyzing Sentiment...",
        "Error loading sentiment",
        |data| {
            let compound = data
                .aggregate
                .as_ref()
                .and_then(|a| a.compound)
                .unwrap_or(0.0);
            let outlook = Outlook::from_compound(compound);
            let score = data
                .sentiment_score
                .map_or(ui::PLACEHOLDER.to_string(), |s| s.to_string());

            let mut output = format!(
                "{}\n\nSentiment Score: {}/100 ({} Outlook)\n\n",
                ui::style_text("Economic Sentiment Analysis", ui::StyleType::Title),
                ui::style_text(&score, ui::StyleType::Value),
                outlook
            );

            let mut table = ui::new_styled_table();
            table.set_header(vec![
                ui::header_cell("Recent Headlines"),
                ui::header_cell("Score"),
                ui::header_cell("Source"),
            ]);
            for article in data.articles.iter().take(HEADLINES_ON_CARD) {
                table.add_row(vec![
                    Cell::new(text_or_placeholder(article.title.as_deref())),
                    compound_cell(article, 2),
                    Cell::new(text_or_placeholder(article.source.as_deref())),
                ]);
            }
            output.push_str(&table.to_string());
            output
        },
    )
}

/// Full sentiment page with counts and every analyzed article.
pub fn render_page(state: Option<&SourceState>) -> String {
    render_section(
        state,
        extract,
        "Processing Economic News...",
        "Error",
        |data| {
            let aggregate = data.aggregate.clone().unwrap_or_default();
            let count = |c: Option<u32>| c.map_or(ui::PLACEHOLDER.to_string(), |c| c.to_string());

            let mut output = format!(
                "{}\n\n{}\n  Sentiment Score: {} / 100\n  Positive: {}  Neutral: {}  Negative: {}  Total Articles: {}\n\n",
                ui::style_text("News Sentiment Analysis", ui::StyleType::Title),
                ui::style_text("Overall Sentiment", ui::StyleType::Label),
                ui::format_optional(data.sentiment_score, 1),
                count(aggregate.positive_count),
                count(aggregate.neutral_count),
                count(aggregate.negative_count),
                count(aggregate.total_articles),
            );

            let mut table = ui::new_styled_table();
            table.set_header(vec![
                ui::header_cell("Sentiment"),
                ui::header_cell("Title"),
                ui::header_cell("Source"),
                ui::header_cell("Compound"),
                ui::header_cell("Pos / Neu / Neg"),
                ui::header_cell("Link"),
            ]);
            for article in &data.articles {
                let sentiment = article.sentiment.clone().unwrap_or_default();
                let label = sentiment.label.as_deref().unwrap_or("neutral");
                // Detailed scores are only present on newer backends
                let breakdown = match sentiment.positive {
                    Some(pos) => format!(
                        "{:.0}% / {:.0}% / {:.0}%",
                        pos * 100.0,
                        sentiment.neutral.unwrap_or(0.0) * 100.0,
                        sentiment.negative.unwrap_or(0.0) * 100.0
                    ),
                    None => ui::PLACEHOLDER.to_string(),
                };
                let link = article
                    .link
                    .as_deref()
                    .filter(|l| !l.is_empty() && *l != "#")
                    .unwrap_or("");
                table.add_row(vec![
                    Cell::new(format!("{} {}", label_glyph(label), label.to_uppercase())),
                    Cell::new(text_or_placeholder(article.title.as_deref())),
                    Cell::new(text_or_placeholder(article.source.as_deref())),
                    compound_cell(article, 3),
                    Cell::new(breakdown),
                    Cell::new(link),
                ]);
            }
            output.push_str(&ui::style_text("News Articles", ui::StyleType::Label));
            output.push('\n');
            output.push_str(&table.to_string());

            output.push_str(&format!(
                "\n\n{}\n  Analyzer: {}\n  Total Articles Analyzed: {}\n  {}",
                ui::style_text("Analysis Information", ui::StyleType::Label),
                data.analyzer.as_deref().unwrap_or("VADER Sentiment Analysis"),
                aggregate.total_articles.unwrap_or(0),
                ui::style_text(
                    "Sentiment derived from recent economic news headlines.",
                    ui::StyleType::Subtle
                )
            ));
            output
        },
    )
}
