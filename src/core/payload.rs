//! Response shapes of the dashboard backend.
//!
//! Every field is optional: the backend has shipped several revisions of
//! these payloads and the client renders whatever subset arrives. Naming
//! variants are resolved here, during deserialization, so consumers only
//! ever see one canonical shape.

use serde::{Deserialize, Deserializer, Serialize};

/// Reads a list that may be missing or `null` as an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Historical percentage returns attached to some quotes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalReturns {
    #[serde(rename = "1mo", default)]
    pub one_month: Option<f64>,
    #[serde(rename = "1y", default)]
    pub one_year: Option<f64>,
    #[serde(rename = "5y", default)]
    pub five_years: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawQuote {
    pub current: Option<f64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub volume: Option<f64>,
    pub volatility: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub history: Option<HistoricalReturns>,
}

/// Payload of `/market-data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketData {
    pub nifty: Option<RawQuote>,
    pub sensex: Option<RawQuote>,
    pub gold: Option<RawQuote>,
    pub silver: Option<RawQuote>,
    pub oil: Option<RawQuote>,
    /// USD/INR exchange rate quote.
    pub inr: Option<RawQuote>,
    pub is_live: Option<bool>,
    pub date: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct RawForecastPoint {
    date: Option<String>,
    predicted: Option<f64>,
    upper: Option<f64>,
    upper_bound: Option<f64>,
    lower: Option<f64>,
    lower_bound: Option<f64>,
    confidence: Option<f64>,
}

/// One forecast day. Accepts both `upper`/`lower` and
/// `upper_bound`/`lower_bound`, preferring the short names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawForecastPoint")]
pub struct ForecastPoint {
    pub date: Option<String>,
    pub predicted: Option<f64>,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
    pub confidence: Option<f64>,
}

impl From<RawForecastPoint> for ForecastPoint {
    fn from(raw: RawForecastPoint) -> Self {
        ForecastPoint {
            date: raw.date,
            predicted: raw.predicted,
            upper: raw.upper.or(raw.upper_bound),
            lower: raw.lower.or(raw.lower_bound),
            confidence: raw.confidence,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSummary {
    pub trend: Option<String>,
    pub avg_confidence: Option<f64>,
    pub volatility: Option<f64>,
}

/// Payload of `/forecast`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastData {
    #[serde(deserialize_with = "null_as_empty")]
    pub forecast: Vec<ForecastPoint>,
    pub current_value: Option<f64>,
    pub forecast_score: Option<f64>,
    pub summary: Option<ForecastSummary>,
    pub model: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct RawSentimentAggregate {
    compound: Option<f64>,
    avg_compound: Option<f64>,
    positive_count: Option<u32>,
    neutral_count: Option<u32>,
    negative_count: Option<u32>,
    total_articles: Option<u32>,
}

/// Aggregate sentiment. The backend reports the mean compound score as
/// `avg_compound`; older revisions used `compound`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSentimentAggregate")]
pub struct SentimentAggregate {
    pub compound: Option<f64>,
    pub positive_count: Option<u32>,
    pub neutral_count: Option<u32>,
    pub negative_count: Option<u32>,
    pub total_articles: Option<u32>,
}

impl From<RawSentimentAggregate> for SentimentAggregate {
    fn from(raw: RawSentimentAggregate) -> Self {
        SentimentAggregate {
            compound: raw.compound.or(raw.avg_compound),
            positive_count: raw.positive_count,
            neutral_count: raw.neutral_count,
            negative_count: raw.negative_count,
            total_articles: raw.total_articles,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleSentiment {
    pub compound: Option<f64>,
    pub positive: Option<f64>,
    pub neutral: Option<f64>,
    pub negative: Option<f64>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    pub title: Option<String>,
    pub link: Option<String>,
    pub source: Option<String>,
    pub sentiment: Option<ArticleSentiment>,
}

/// Payload of `/sentiment`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentData {
    pub sentiment_score: Option<f64>,
    pub aggregate: Option<SentimentAggregate>,
    #[serde(deserialize_with = "null_as_empty")]
    pub articles: Vec<Article>,
    pub analyzer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityComponents {
    pub market_trend: Option<f64>,
    pub sentiment: Option<f64>,
    pub economic_indicators: Option<f64>,
}

/// Payload of `/stability-score`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityData {
    pub stability_score: Option<f64>,
    pub category: Option<String>,
    pub interpretation: Option<String>,
    pub components: Option<StabilityComponents>,
}

/// Payload of `/health`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: Option<String>,
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_bounds_accept_both_names() {
        let json = r#"{
            "forecast": [
                {"date": "2025-01-02", "predicted": 100.0, "upper": 110.0, "lower": 90.0, "confidence": 80.0},
                {"date": "2025-01-03", "predicted": 101.0, "upper_bound": 112.0, "lower_bound": 91.0},
                {"date": "2025-01-04", "predicted": 102.0, "upper": 113.0, "upper_bound": 999.0}
            ]
        }"#;
        let data: ForecastData = serde_json::from_str(json).unwrap();

        assert_eq!(data.forecast.len(), 3);
        assert_eq!(data.forecast[0].upper, Some(110.0));
        assert_eq!(data.forecast[0].lower, Some(90.0));
        assert_eq!(data.forecast[1].upper, Some(112.0));
        assert_eq!(data.forecast[1].lower, Some(91.0));
        assert!(data.forecast[1].confidence.is_none());
        // Short name wins when both are present
        assert_eq!(data.forecast[2].upper, Some(113.0));
        assert!(data.forecast[2].lower.is_none());
    }

    #[test]
    fn test_market_data_with_missing_fields() {
        let json = r#"{
            "date": "2025-06-30",
            "note": "Sample data - Yahoo Finance API unavailable",
            "nifty": {"current": 22000.5, "open": 21950.25, "change": 50.25},
            "gold": {"current": 2000.0, "history": {"1mo": 2.1, "1y": 14.2}}
        }"#;
        let data: MarketData = serde_json::from_str(json).unwrap();

        let nifty = data.nifty.unwrap();
        assert_eq!(nifty.current, Some(22000.5));
        assert!(nifty.change_percent.is_none());
        assert!(nifty.history.is_none());
        assert!(data.sensex.is_none());
        assert!(data.is_live.is_none());

        let history = data.gold.unwrap().history.unwrap();
        assert_eq!(history.one_month, Some(2.1));
        assert_eq!(history.one_year, Some(14.2));
        assert!(history.five_years.is_none());
    }

    #[test]
    fn test_sentiment_aggregate_compound_variants() {
        let json = r#"{
            "sentiment_score": 61.5,
            "aggregate": {"avg_compound": 0.12, "positive_count": 3, "total_articles": 5},
            "articles": [{"title": "RBI holds rates", "sentiment": {"compound": 0.2, "label": "positive"}}]
        }"#;
        let data: SentimentData = serde_json::from_str(json).unwrap();
        let aggregate = data.aggregate.unwrap();
        assert_eq!(aggregate.compound, Some(0.12));
        assert_eq!(aggregate.positive_count, Some(3));
        assert!(aggregate.negative_count.is_none());
        assert_eq!(data.articles.len(), 1);
        assert!(data.articles[0].sentiment.as_ref().unwrap().positive.is_none());

        let json = r#"{"aggregate": {"compound": -0.3}}"#;
        let data: SentimentData = serde_json::from_str(json).unwrap();
        assert_eq!(data.aggregate.unwrap().compound, Some(-0.3));
        assert!(data.articles.is_empty());
    }

    #[test]
    fn test_null_lists_are_empty() {
        let json = r#"{"sentiment_score": 50.0, "articles": null}"#;
        let data: SentimentData = serde_json::from_str(json).unwrap();
        assert_eq!(data.sentiment_score, Some(50.0));
        assert!(data.articles.is_empty());

        let json = r#"{"current_value": 22000.0, "forecast": null}"#;
        let data: ForecastData = serde_json::from_str(json).unwrap();
        assert_eq!(data.current_value, Some(22000.0));
        assert!(data.forecast.is_empty());
    }

    #[test]
    fn test_stability_data_tolerates_extra_and_missing_fields() {
        let json = r#"{
            "status": "success",
            "stability_score": 64.2,
            "category": "Moderate",
            "components": {"market_trend": 55.0},
            "disclaimer": "Educational project. Not financial advice."
        }"#;
        let data: StabilityData = serde_json::from_str(json).unwrap();
        assert_eq!(data.stability_score, Some(64.2));
        assert!(data.interpretation.is_none());
        let components = data.components.unwrap();
        assert_eq!(components.market_trend, Some(55.0));
        assert!(components.sentiment.is_none());
    }
}
