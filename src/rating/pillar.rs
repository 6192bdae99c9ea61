//! Per-pillar ratings

use std::fmt;

use log::debug;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::scheme::{Pillar, RatingScheme, ThresholdTable};
use crate::ratios::EnrichedRecord;

/// Status label attached to a 1-5 rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingStatus {
    Strong,
    Satisfactory,
    Fair,
    Marginal,
    Unsatisfactory,
    #[serde(rename = "Insufficient data")]
    InsufficientData,
}

impl RatingStatus {
    /// Label for a rating; anything outside 1-5 counts as no data
    pub fn from_rating(rating: u8) -> Self {
        match rating {
            1 => RatingStatus::Strong,
            2 => RatingStatus::Satisfactory,
            3 => RatingStatus::Fair,
            4 => RatingStatus::Marginal,
            5 => RatingStatus::Unsatisfactory,
            _ => RatingStatus::InsufficientData,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RatingStatus::Strong => "Strong",
            RatingStatus::Satisfactory => "Satisfactory",
            RatingStatus::Fair => "Fair",
            RatingStatus::Marginal => "Marginal",
            RatingStatus::Unsatisfactory => "Unsatisfactory",
            RatingStatus::InsufficientData => "Insufficient data",
        }
    }
}

impl fmt::Display for RatingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rating of one CAMELS pillar from its driving ratio
///
/// Serializes as `{rating, status}` when the driving ratio was missing and as
/// `{rating, status, <metric>: value, benchmark}` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct PillarRating {
    pub pillar: Pillar,
    pub rating: Option<u8>,
    pub status: RatingStatus,
    /// Name of the driving ratio, used as the key of `value` when serialized
    pub metric: &'static str,
    pub value: Option<f64>,
    pub benchmark: Option<String>,
}

impl PillarRating {
    pub fn insufficient(pillar: Pillar, metric: &'static str) -> Self {
        Self {
            pillar,
            rating: None,
            status: RatingStatus::InsufficientData,
            metric,
            value: None,
            benchmark: None,
        }
    }

    pub fn is_rated(&self) -> bool {
        self.rating.is_some()
    }
}

impl Serialize for PillarRating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.value.is_some() { 4 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("rating", &self.rating)?;
        map.serialize_entry("status", &self.status)?;
        if let Some(value) = self.value {
            map.serialize_entry(self.metric, &value)?;
            map.serialize_entry("benchmark", &self.benchmark)?;
        }
        map.end()
    }
}

/// Rate `value` against `table`; a missing value yields "Insufficient data"
pub fn rate_metric(
    pillar: Pillar,
    metric: &'static str,
    value: Option<f64>,
    table: &ThresholdTable,
) -> PillarRating {
    let value = match value {
        Some(v) if v.is_finite() => v,
        _ => {
            debug!("{:?}: {} unavailable, pillar not rated", pillar, metric);
            return PillarRating::insufficient(pillar, metric);
        }
    };

    let rating = table.rate(value);
    PillarRating {
        pillar,
        rating: Some(rating),
        status: RatingStatus::from_rating(rating),
        metric,
        value: Some(value),
        benchmark: Some(table.benchmark()),
    }
}

/// Capital adequacy, driven by the regulatory CAR (percent)
pub fn rate_capital(bank: &EnrichedRecord, scheme: &RatingScheme) -> PillarRating {
    rate_metric(Pillar::Capital, "car", bank.record.car_regulatory, &scheme.capital)
}

/// Asset quality, driven by the NPL ratio
pub fn rate_asset_quality(bank: &EnrichedRecord, scheme: &RatingScheme) -> PillarRating {
    rate_metric(Pillar::AssetQuality, "npl_ratio", bank.ratios.npl_ratio, &scheme.asset_quality)
}

/// Earnings, driven by return on average equity
pub fn rate_earnings(bank: &EnrichedRecord, scheme: &RatingScheme) -> PillarRating {
    rate_metric(Pillar::Earnings, "roae", bank.ratios.roae, &scheme.earnings)
}

/// Liquidity, driven by gross loans to deposits
pub fn rate_liquidity(bank: &EnrichedRecord, scheme: &RatingScheme) -> PillarRating {
    rate_metric(Pillar::Liquidity, "ratio", bank.ratios.gross_loans_deposits, &scheme.liquidity)
}

/// The four rated pillars of one analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedRatings {
    pub capital: PillarRating,
    pub asset_quality: PillarRating,
    pub earnings: PillarRating,
    pub liquidity: PillarRating,
}

impl DetailedRatings {
    /// Rate every pillar of `bank`
    pub fn rate(bank: &EnrichedRecord, scheme: &RatingScheme) -> Self {
        Self {
            capital: rate_capital(bank, scheme),
            asset_quality: rate_asset_quality(bank, scheme),
            earnings: rate_earnings(bank, scheme),
            liquidity: rate_liquidity(bank, scheme),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PillarRating> {
        [&self.capital, &self.asset_quality, &self.earnings, &self.liquidity].into_iter()
    }
}
