//! End-to-end analysis of one bank-period
//!
//! raw record -> ratio engine -> enriched record -> pillar ratings -> composite

mod table;

pub use table::{write_ratings_csv, RatingRow};

use log::info;
use rayon::prelude::*;
use serde::Serialize;

use crate::loader::pair_with_prior_periods;
use crate::ratios::EnrichedRecord;
use crate::rating::{composite, CompositeRating, DetailedRatings, RatingScheme};
use crate::record::FinancialRecord;

/// Headline figures surfaced alongside the ratings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub total_assets: Option<f64>,
    pub car: Option<f64>,
    pub roae: Option<f64>,
    pub roaa: Option<f64>,
    pub npl_ratio: Option<f64>,
    pub loans_deposits: Option<f64>,
}

impl KeyMetrics {
    pub fn from_enriched(bank: &EnrichedRecord) -> Self {
        Self {
            total_assets: bank.record.total_assets,
            car: bank.record.car_regulatory,
            roae: bank.ratios.roae,
            roaa: bank.ratios.roaa,
            npl_ratio: bank.ratios.npl_ratio,
            loans_deposits: bank.ratios.gross_loans_deposits,
        }
    }
}

/// Ratings produced under one rating scheme
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingReport {
    /// Version of the scheme the ratings were computed with
    pub scheme_version: String,
    pub camels_rating: CompositeRating,
    pub detailed_ratings: DetailedRatings,
    pub key_metrics: KeyMetrics,
}

impl RatingReport {
    /// Rate an already enriched record
    pub fn build(bank: &EnrichedRecord, scheme: &RatingScheme) -> Self {
        let detailed_ratings = DetailedRatings::rate(bank, scheme);
        let camels_rating = composite(&detailed_ratings, scheme);
        Self {
            scheme_version: scheme.version.clone(),
            camels_rating,
            detailed_ratings,
            key_metrics: KeyMetrics::from_enriched(bank),
        }
    }
}

/// Complete output of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankAnalysis {
    pub bank: EnrichedRecord,
    #[serde(flatten)]
    pub report: RatingReport,
}

/// Compute ratios and ratings for `current`
pub fn analyze(
    current: FinancialRecord,
    previous: Option<&FinancialRecord>,
    scheme: &RatingScheme,
) -> BankAnalysis {
    let bank = EnrichedRecord::new(current, previous);
    let report = RatingReport::build(&bank, scheme);

    info!(
        "{} ({}): composite {} [{}]",
        bank.record.bank_name,
        bank.record.fiscal_year.map(|y| y.to_string()).unwrap_or_else(|| "n/a".into()),
        report
            .camels_rating
            .composite_rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".into()),
        report.camels_rating.status,
    );

    BankAnalysis { bank, report }
}

/// Analyze many statements in parallel, in input order
///
/// Each record is paired with the same bank's prior fiscal year when that
/// year is also in `records`.
pub fn analyze_batch(records: &[FinancialRecord], scheme: &RatingScheme) -> Vec<BankAnalysis> {
    pair_with_prior_periods(records)
        .into_par_iter()
        .map(|(current, previous)| analyze(current.clone(), previous, scheme))
        .collect()
}
