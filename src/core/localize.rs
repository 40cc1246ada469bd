//! Consumer-facing metrics derived from raw quotes.
//!
//! Everything here is pure: inputs are read by reference and fresh values are
//! returned. Missing numeric fields propagate as `None` and are rendered as a
//! placeholder by the caller.

use super::payload::{HistoricalReturns, MarketData, RawQuote};
use std::fmt::Display;

/// Import duty, consumption tax and dealer premium, applied as one factor.
pub const TAX_FACTOR: f64 = 1.22;
pub const TROY_OUNCE_IN_GRAMS: f64 = 31.1035;
/// INR per USD used when no live rate is available.
pub const DEFAULT_FX_RATE: f64 = 89.20;

const GOLD_HERO_GRAMS: f64 = 10.0;
const SOVEREIGN_GRAMS: f64 = 8.0;
const GRAMS_PER_KG: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommodityKind {
    Gold,
    Silver,
    /// Equity index, quoted in index points.
    Index,
    /// Crude oil, quoted in USD per barrel.
    Oil,
    /// The USD/INR rate itself.
    Fx,
}

/// The USD/INR rate a conversion used, and whether it was live.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FxRate {
    Live(f64),
    Fallback,
}

impl FxRate {
    pub fn value(&self) -> f64 {
        match self {
            FxRate::Live(rate) => *rate,
            FxRate::Fallback => DEFAULT_FX_RATE,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, FxRate::Live(_))
    }

    /// Resolves the rate from the market payload's `inr` quote, if any.
    pub fn from_market(market: Option<&MarketData>) -> Self {
        market
            .and_then(|m| m.inr.as_ref())
            .and_then(|q| q.current)
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .map_or(FxRate::Fallback, FxRate::Live)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    InrPer10Grams,
    InrPerSovereign,
    InrPerGram,
    InrPerKilogram,
    UsdPerOunce,
    UsdPerBarrel,
    IndexPoints,
    InrPerUsd,
}

impl Unit {
    /// Currency symbol shown in front of a value in this unit.
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::UsdPerOunce | Unit::UsdPerBarrel => "$",
            Unit::InrPer10Grams
            | Unit::InrPerSovereign
            | Unit::InrPerGram
            | Unit::InrPerKilogram
            | Unit::IndexPoints
            | Unit::InrPerUsd => "₹",
        }
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Unit::InrPer10Grams => "10 Grams (24K)",
                Unit::InrPerSovereign => "1 Sovereign (8g)",
                Unit::InrPerGram => "1 Gram",
                Unit::InrPerKilogram => "1 Kilogram",
                Unit::UsdPerOunce => "/ oz",
                Unit::UsdPerBarrel => "/ bbl",
                Unit::IndexPoints => "pts",
                Unit::InrPerUsd => "per USD",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlternateValue {
    pub value: Option<f64>,
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalizedMetric {
    pub kind: CommodityKind,
    pub hero_value: Option<f64>,
    pub hero_unit: Unit,
    pub alternate: Option<AlternateValue>,
    pub global_spot_value: Option<f64>,
    pub global_spot_unit: Unit,
    /// Rate used for the conversion; `None` for pass-through quotes.
    pub fx: Option<FxRate>,
}

/// Retail price per gram in INR, tax included.
pub fn per_gram_inr(spot_usd_per_ounce: f64, fx: FxRate) -> f64 {
    (spot_usd_per_ounce * fx.value()) / TROY_OUNCE_IN_GRAMS * TAX_FACTOR
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn native_unit(kind: CommodityKind) -> Unit {
    match kind {
        CommodityKind::Gold | CommodityKind::Silver => Unit::UsdPerOunce,
        CommodityKind::Index => Unit::IndexPoints,
        CommodityKind::Oil => Unit::UsdPerBarrel,
        CommodityKind::Fx => Unit::InrPerUsd,
    }
}

/// Converts a raw quote into the figures shown for `kind`.
///
/// Returns `None` only when there is no quote at all.
pub fn localize(kind: CommodityKind, quote: Option<&RawQuote>, fx: FxRate) -> Option<LocalizedMetric> {
    let quote = quote?;
    let spot = quote.current.filter(|v| v.is_finite());
    let per_gram = spot.map(|s| per_gram_inr(s, fx));

    let metric = match kind {
        CommodityKind::Gold => LocalizedMetric {
            kind,
            hero_value: per_gram.map(|g| (g * GOLD_HERO_GRAMS).round()),
            hero_unit: Unit::InrPer10Grams,
            alternate: Some(AlternateValue {
                value: per_gram.map(|g| (g * SOVEREIGN_GRAMS).round()),
                unit: Unit::InrPerSovereign,
            }),
            global_spot_value: spot,
            global_spot_unit: native_unit(kind),
            fx: Some(fx),
        },
        CommodityKind::Silver => LocalizedMetric {
            kind,
            hero_value: per_gram.map(round_to_tenth),
            hero_unit: Unit::InrPerGram,
            alternate: Some(AlternateValue {
                value: per_gram.map(|g| (g * GRAMS_PER_KG).round()),
                unit: Unit::InrPerKilogram,
            }),
            global_spot_value: spot,
            global_spot_unit: native_unit(kind),
            fx: Some(fx),
        },
        CommodityKind::Index | CommodityKind::Oil | CommodityKind::Fx => LocalizedMetric {
            kind,
            hero_value: quote.current,
            hero_unit: native_unit(kind),
            alternate: None,
            global_spot_value: quote.current,
            global_spot_unit: native_unit(kind),
            fx: None,
        },
    };
    Some(metric)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn glyph(&self) -> &'static str {
        match self {
            Direction::Up => "▲",
            Direction::Down => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeLabel {
    pub direction: Direction,
    /// Absolute size of the change, in the quote's own unit.
    pub magnitude: f64,
    /// Percentage as reported upstream.
    pub percent: f64,
}

impl ChangeLabel {
    pub fn is_positive(&self) -> bool {
        self.direction == Direction::Up
    }
}

impl Display for ChangeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {:.2} ({}%)",
            self.direction.glyph(),
            self.magnitude,
            self.percent
        )
    }
}

/// Direction and size of a quote's change. `None` when either `change` or
/// `change_percent` is missing, in which case the segment is not shown.
pub fn change_label(quote: &RawQuote) -> Option<ChangeLabel> {
    let change = quote.change?;
    let percent = quote.change_percent?;
    let direction = if change >= 0.0 {
        Direction::Up
    } else {
        Direction::Down
    };
    Some(ChangeLabel {
        direction,
        magnitude: change.abs(),
        percent,
    })
}

/// Historical returns exactly as reported, when the quote carries any.
pub fn historical_returns(quote: &RawQuote) -> Option<&HistoricalReturns> {
    quote.history.as_ref()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilityCategory {
    Stable,
    Moderate,
    Unstable,
    Unknown,
}

impl StabilityCategory {
    pub fn parse(category: Option<&str>) -> Self {
        match category.map(str::to_lowercase).as_deref() {
            Some("stable") => StabilityCategory::Stable,
            Some("moderate") => StabilityCategory::Moderate,
            Some("unstable") => StabilityCategory::Unstable,
            _ => StabilityCategory::Unknown,
        }
    }
}

impl Display for StabilityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                StabilityCategory::Stable => "Stable",
                StabilityCategory::Moderate => "Moderate",
                StabilityCategory::Unstable => "Unstable",
                StabilityCategory::Unknown => "Unknown",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outlook {
    Positive,
    Neutral,
    Negative,
}

impl Outlook {
    /// Classifies a compound sentiment score in `[-1, 1]`.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= 0.05 {
            Outlook::Positive
        } else if compound <= -0.05 {
            Outlook::Negative
        } else {
            Outlook::Neutral
        }
    }
}

impl Display for Outlook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Outlook::Positive => "Positive",
                Outlook::Neutral => "Neutral",
                Outlook::Negative => "Negative",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(current: f64) -> RawQuote {
        RawQuote {
            current: Some(current),
            ..Default::default()
        }
    }

    #[test]
    fn test_gold_is_localized_per_10_grams_and_sovereign() {
        let q = quote(2000.0);
        let metric = localize(CommodityKind::Gold, Some(&q), FxRate::Fallback).unwrap();

        let per_gram = per_gram_inr(2000.0, FxRate::Fallback);
        assert!((per_gram - 6997.54).abs() < 0.01);
        assert_eq!(metric.hero_value, Some(69975.0));
        assert_eq!(metric.hero_unit, Unit::InrPer10Grams);
        let alternate = metric.alternate.unwrap();
        assert_eq!(alternate.value, Some(55980.0));
        assert_eq!(alternate.unit, Unit::InrPerSovereign);
        assert_eq!(metric.global_spot_value, Some(2000.0));
        assert_eq!(metric.global_spot_unit, Unit::UsdPerOunce);
        assert_eq!(metric.fx, Some(FxRate::Fallback));
    }

    #[test]
    fn test_silver_is_localized_per_gram_and_kilogram() {
        let q = quote(25.0);
        let metric = localize(CommodityKind::Silver, Some(&q), FxRate::Live(89.20)).unwrap();

        assert_eq!(metric.hero_value, Some(87.5));
        assert_eq!(metric.hero_unit, Unit::InrPerGram);
        let alternate = metric.alternate.unwrap();
        assert_eq!(alternate.value, Some(87469.0));
        assert_eq!(alternate.unit, Unit::InrPerKilogram);
        assert_eq!(metric.global_spot_value, Some(25.0));
    }

    #[test]
    fn test_live_fx_rate_is_used() {
        let q = quote(2000.0);
        let metric = localize(CommodityKind::Gold, Some(&q), FxRate::Live(83.0)).unwrap();
        assert_eq!(metric.hero_value, Some(65112.0));
        assert_eq!(metric.alternate.unwrap().value, Some(52089.0));
        assert!(metric.fx.unwrap().is_live());
    }

    #[test]
    fn test_non_convertible_quotes_pass_through() {
        let q = quote(22000.5);
        for kind in [CommodityKind::Index, CommodityKind::Oil, CommodityKind::Fx] {
            let metric = localize(kind, Some(&q), FxRate::Live(83.0)).unwrap();
            assert_eq!(metric.hero_value, Some(22000.5));
            assert_eq!(metric.global_spot_value, Some(22000.5));
            assert!(metric.alternate.is_none());
            assert!(metric.fx.is_none());
        }
        let oil = localize(CommodityKind::Oil, Some(&q), FxRate::Fallback).unwrap();
        assert_eq!(oil.hero_unit.symbol(), "$");
    }

    #[test]
    fn test_absent_quote_is_unavailable() {
        for kind in [CommodityKind::Gold, CommodityKind::Silver, CommodityKind::Index] {
            assert!(localize(kind, None, FxRate::Fallback).is_none());
        }
    }

    #[test]
    fn test_missing_current_yields_placeholders() {
        let q = RawQuote::default();
        let metric = localize(CommodityKind::Gold, Some(&q), FxRate::Fallback).unwrap();
        assert!(metric.hero_value.is_none());
        assert!(metric.alternate.unwrap().value.is_none());
        assert!(metric.global_spot_value.is_none());
    }

    #[test]
    fn test_fx_rate_resolution() {
        assert_eq!(FxRate::from_market(None), FxRate::Fallback);
        assert_eq!(FxRate::Fallback.value(), DEFAULT_FX_RATE);

        let mut market = MarketData::default();
        assert_eq!(FxRate::from_market(Some(&market)), FxRate::Fallback);

        market.inr = Some(RawQuote::default());
        assert_eq!(FxRate::from_market(Some(&market)), FxRate::Fallback);

        market.inr = Some(quote(0.0));
        assert_eq!(FxRate::from_market(Some(&market)), FxRate::Fallback);

        market.inr = Some(quote(84.1));
        assert_eq!(FxRate::from_market(Some(&market)), FxRate::Live(84.1));
    }

    #[test]
    fn test_change_label() {
        let mut q = quote(100.0);
        q.change = Some(0.0);
        q.change_percent = Some(0.0);
        let label = change_label(&q).unwrap();
        assert!(label.is_positive());
        assert_eq!(label.to_string(), "▲ 0.00 (0%)");

        q.change = Some(-12.5);
        q.change_percent = Some(-0.23);
        let label = change_label(&q).unwrap();
        assert_eq!(label.direction, Direction::Down);
        assert_eq!(label.magnitude, 12.5);
        assert_eq!(label.to_string(), "▼ 12.50 (-0.23%)");

        q.change_percent = None;
        assert!(change_label(&q).is_none());
    }

    #[test]
    fn test_historical_returns_passthrough() {
        let mut q = quote(2000.0);
        assert!(historical_returns(&q).is_none());

        q.history = Some(HistoricalReturns {
            one_month: Some(2.5),
            one_year: Some(18.0),
            five_years: Some(92.4),
        });
        let history = historical_returns(&q).unwrap();
        assert_eq!(history.one_month, Some(2.5));
        assert_eq!(history.five_years, Some(92.4));
    }

    #[test]
    fn test_classifications() {
        assert_eq!(StabilityCategory::parse(Some("STABLE")), StabilityCategory::Stable);
        assert_eq!(StabilityCategory::parse(Some("moderate")), StabilityCategory::Moderate);
        assert_eq!(StabilityCategory::parse(Some("Unstable")), StabilityCategory::Unstable);
        assert_eq!(StabilityCategory::parse(Some("wobbly")), StabilityCategory::Unknown);
        assert_eq!(StabilityCategory::parse(None), StabilityCategory::Unknown);

        assert_eq!(Outlook::from_compound(0.05), Outlook::Positive);
        assert_eq!(Outlook::from_compound(0.0), Outlook::Neutral);
        assert_eq!(Outlook::from_compound(-0.05), Outlook::Negative);
    }
}
