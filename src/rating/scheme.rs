//! Rating scheme: threshold tables and composite weights
//!
//! Several threshold sets exist in practice for the same pillars. A scheme
//! bundles one full set under an explicit version string so that every
//! report can be traced back to the rules that produced it. The default is
//! the canonical `camels-v1` set.

use serde::{Deserialize, Serialize};

use crate::error::{CamelsError, Result};

/// Version tag of [`RatingScheme::default`]
pub const CANONICAL_SCHEME_VERSION: &str = "camels-v1";

/// CAMELS pillars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    Capital,
    AssetQuality,
    /// Carries a composite weight but is never rated
    Management,
    Earnings,
    Liquidity,
}

impl Pillar {
    /// The pillars the engine produces ratings for
    pub const RATED: [Pillar; 4] = [
        Pillar::Capital,
        Pillar::AssetQuality,
        Pillar::Earnings,
        Pillar::Liquidity,
    ];
}

/// Which side of the thresholds is the healthy side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Whether a value sitting exactly on a bound earns the better rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// `>=` or `<=`
    Inclusive,
    /// `>` or `<`
    Exclusive,
}

/// Unit the driving ratio is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricUnit {
    /// Already a percentage (14.0 = 14%)
    Percent,
    /// A fraction (0.14 = 14%)
    Fraction,
}

/// Ordered bounds for ratings 1 through 4; anything past the last bound is 5
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    pub direction: Direction,
    pub boundary: Boundary,
    pub unit: MetricUnit,
    pub bounds: [f64; 4],
}

impl ThresholdTable {
    pub fn higher_is_better(boundary: Boundary, unit: MetricUnit, bounds: [f64; 4]) -> Self {
        Self { direction: Direction::HigherIsBetter, boundary, unit, bounds }
    }

    pub fn lower_is_better(boundary: Boundary, unit: MetricUnit, bounds: [f64; 4]) -> Self {
        Self { direction: Direction::LowerIsBetter, boundary, unit, bounds }
    }

    /// Rating for `value`, evaluated top-down with the first match winning
    pub fn rate(&self, value: f64) -> u8 {
        for (idx, bound) in self.bounds.iter().enumerate() {
            let hit = match (self.direction, self.boundary) {
                (Direction::HigherIsBetter, Boundary::Inclusive) => value >= *bound,
                (Direction::HigherIsBetter, Boundary::Exclusive) => value > *bound,
                (Direction::LowerIsBetter, Boundary::Inclusive) => value <= *bound,
                (Direction::LowerIsBetter, Boundary::Exclusive) => value < *bound,
            };
            if hit {
                return idx as u8 + 1;
            }
        }
        5
    }

    /// Human-readable threshold for a rating of 1, e.g. `">= 15%"`
    pub fn benchmark(&self) -> String {
        let op = match (self.direction, self.boundary) {
            (Direction::HigherIsBetter, Boundary::Inclusive) => ">=",
            (Direction::HigherIsBetter, Boundary::Exclusive) => ">",
            (Direction::LowerIsBetter, Boundary::Inclusive) => "<=",
            (Direction::LowerIsBetter, Boundary::Exclusive) => "<",
        };
        let pct = match self.unit {
            MetricUnit::Percent => self.bounds[0],
            MetricUnit::Fraction => self.bounds[0] * 100.0,
        };
        format!("{} {}%", op, format_pct(pct))
    }

    fn validate(&self, pillar: Pillar) -> Result<()> {
        if self.bounds.iter().any(|b| !b.is_finite()) {
            return Err(CamelsError::InvalidScheme(format!(
                "{:?} thresholds must be finite",
                pillar
            )));
        }
        let ordered = self.bounds.windows(2).all(|w| match self.direction {
            Direction::HigherIsBetter => w[0] > w[1],
            Direction::LowerIsBetter => w[0] < w[1],
        });
        if !ordered {
            return Err(CamelsError::InvalidScheme(format!(
                "{:?} thresholds {:?} are not strictly ordered for {:?}",
                pillar, self.bounds, self.direction
            )));
        }
        Ok(())
    }
}

/// Trim a percentage to at most one decimal, dropping a trailing `.0`
fn format_pct(value: f64) -> String {
    let s = format!("{:.1}", value);
    match s.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => s,
    }
}

/// How pillar ratings are combined into the composite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    Equal,
    Weighted,
}

/// Composite weights, renormalised over the pillars that produced a rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarWeights {
    #[serde(default = "default_capital_weight")]
    pub capital: f64,
    #[serde(default = "default_asset_quality_weight")]
    pub asset_quality: f64,
    #[serde(default = "default_management_weight")]
    pub management: f64,
    #[serde(default = "default_earnings_weight")]
    pub earnings: f64,
    #[serde(default = "default_liquidity_weight")]
    pub liquidity: f64,
}

fn default_capital_weight() -> f64 { 0.25 }
fn default_asset_quality_weight() -> f64 { 0.25 }
fn default_management_weight() -> f64 { 0.15 }
fn default_earnings_weight() -> f64 { 0.20 }
fn default_liquidity_weight() -> f64 { 0.15 }

impl Default for PillarWeights {
    fn default() -> Self {
        Self {
            capital: 0.25,
            asset_quality: 0.25,
            management: 0.15,
            earnings: 0.20,
            liquidity: 0.15,
        }
    }
}

impl PillarWeights {
    pub fn weight(&self, pillar: Pillar) -> f64 {
        match pillar {
            Pillar::Capital => self.capital,
            Pillar::AssetQuality => self.asset_quality,
            Pillar::Management => self.management,
            Pillar::Earnings => self.earnings,
            Pillar::Liquidity => self.liquidity,
        }
    }
}

/// A complete, versioned set of rating rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingScheme {
    #[serde(default = "default_version")]
    pub version: String,

    /// Regulatory capital adequacy ratio, percent
    #[serde(default = "default_capital_table")]
    pub capital: ThresholdTable,

    /// NPL ratio, fraction
    #[serde(default = "default_asset_quality_table")]
    pub asset_quality: ThresholdTable,

    /// Return on average equity, fraction
    #[serde(default = "default_earnings_table")]
    pub earnings: ThresholdTable,

    /// Gross loans to deposits, fraction
    #[serde(default = "default_liquidity_table")]
    pub liquidity: ThresholdTable,

    #[serde(default = "default_weighting")]
    pub weighting: Weighting,

    #[serde(default)]
    pub weights: PillarWeights,
}

fn default_version() -> String { CANONICAL_SCHEME_VERSION.to_string() }

fn default_capital_table() -> ThresholdTable {
    ThresholdTable::higher_is_better(Boundary::Inclusive, MetricUnit::Percent, [15.0, 12.0, 10.0, 8.0])
}

// An NPL ratio sitting exactly on a bound keeps the better rating: 0.02 is 1,
// 0.05 is 2, 0.08 is 3 and 0.12 is 4. A strict `<` table rates each of these
// one notch worse.
fn default_asset_quality_table() -> ThresholdTable {
    ThresholdTable::lower_is_better(Boundary::Inclusive, MetricUnit::Fraction, [0.02, 0.05, 0.08, 0.12])
}

fn default_earnings_table() -> ThresholdTable {
    ThresholdTable::higher_is_better(Boundary::Inclusive, MetricUnit::Fraction, [0.15, 0.10, 0.05, 0.0])
}

fn default_liquidity_table() -> ThresholdTable {
    ThresholdTable::lower_is_better(Boundary::Exclusive, MetricUnit::Fraction, [0.70, 0.85, 0.95, 1.05])
}

fn default_weighting() -> Weighting { Weighting::Equal }

impl Default for RatingScheme {
    fn default() -> Self {
        Self {
            version: default_version(),
            capital: default_capital_table(),
            asset_quality: default_asset_quality_table(),
            earnings: default_earnings_table(),
            liquidity: default_liquidity_table(),
            weighting: Weighting::Equal,
            weights: PillarWeights::default(),
        }
    }
}

impl RatingScheme {
    /// Canonical thresholds with the weighted composite
    pub fn weighted() -> Self {
        Self {
            weighting: Weighting::Weighted,
            ..Default::default()
        }
    }

    /// Threshold table for a rated pillar
    pub fn table(&self, pillar: Pillar) -> Option<&ThresholdTable> {
        match pillar {
            Pillar::Capital => Some(&self.capital),
            Pillar::AssetQuality => Some(&self.asset_quality),
            Pillar::Earnings => Some(&self.earnings),
            Pillar::Liquidity => Some(&self.liquidity),
            Pillar::Management => None,
        }
    }

    /// Check threshold ordering and weights
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(CamelsError::InvalidScheme("version must not be empty".into()));
        }
        for pillar in Pillar::RATED {
            if let Some(table) = self.table(pillar) {
                table.validate(pillar)?;
            }
        }

        let all = [Pillar::Management].into_iter().chain(Pillar::RATED);
        for pillar in all {
            let w = self.weights.weight(pillar);
            if !w.is_finite() || w < 0.0 {
                return Err(CamelsError::InvalidScheme(format!(
                    "{:?} weight must be a non-negative number, got {}",
                    pillar, w
                )));
            }
        }
        if self.weighting == Weighting::Weighted {
            if let Some(pillar) = Pillar::RATED.into_iter().find(|p| self.weights.weight(*p) <= 0.0) {
                return Err(CamelsError::InvalidScheme(format!(
                    "{:?} weight must be positive for a weighted composite",
                    pillar
                )));
            }
        }
        Ok(())
    }
}
