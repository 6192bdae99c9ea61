//! Flat, one-row-per-bank output for batch runs

use std::io::Write;

use serde::Serialize;

use super::BankAnalysis;
use crate::error::Result;

/// CSV row summarising one analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingRow {
    pub bank_name: String,
    pub country: String,
    pub fiscal_year: Option<i32>,
    pub currency: String,
    pub scheme_version: String,

    pub equity_assets: Option<f64>,
    pub liquid_assets_assets: Option<f64>,
    pub gross_loans_deposits: Option<f64>,
    pub npa_ratio: Option<f64>,
    pub npl_ratio: Option<f64>,
    pub coverage_ratio: Option<f64>,
    pub oler: Option<f64>,
    pub net_interest_margin: Option<f64>,
    pub net_interest_spread: Option<f64>,
    pub cost_of_funds: Option<f64>,
    pub cost_to_income: Option<f64>,
    pub assets_equity: Option<f64>,
    pub roaa: Option<f64>,
    pub roae: Option<f64>,

    pub capital_rating: Option<u8>,
    pub asset_quality_rating: Option<u8>,
    pub earnings_rating: Option<u8>,
    pub liquidity_rating: Option<u8>,
    pub composite_rating: Option<u8>,
    pub composite_status: String,
}

impl From<&BankAnalysis> for RatingRow {
    fn from(analysis: &BankAnalysis) -> Self {
        let record = &analysis.bank.record;
        let ratios = &analysis.bank.ratios;
        let report = &analysis.report;
        let detail = &report.detailed_ratings;

        Self {
            bank_name: record.bank_name.clone(),
            country: record.country.clone(),
            fiscal_year: record.fiscal_year,
            currency: record.currency.clone(),
            scheme_version: report.scheme_version.clone(),
            equity_assets: ratios.equity_assets,
            liquid_assets_assets: ratios.liquid_assets_assets,
            gross_loans_deposits: ratios.gross_loans_deposits,
            npa_ratio: ratios.npa_ratio,
            npl_ratio: ratios.npl_ratio,
            coverage_ratio: ratios.coverage_ratio,
            oler: ratios.oler,
            net_interest_margin: ratios.net_interest_margin,
            net_interest_spread: ratios.net_interest_spread,
            cost_of_funds: ratios.cost_of_funds,
            cost_to_income: ratios.cost_to_income,
            assets_equity: ratios.assets_equity,
            roaa: ratios.roaa,
            roae: ratios.roae,
            capital_rating: detail.capital.rating,
            asset_quality_rating: detail.asset_quality.rating,
            earnings_rating: detail.earnings.rating,
            liquidity_rating: detail.liquidity.rating,
            composite_rating: report.camels_rating.composite_rating,
            composite_status: report.camels_rating.status.to_string(),
        }
    }
}

/// Write one CSV row per analysis, with a header
pub fn write_ratings_csv<W: Write>(writer: W, analyses: &[BankAnalysis]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for analysis in analyses {
        wtr.serialize(RatingRow::from(analysis))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::RatingScheme;
    use crate::record::FinancialRecord;
    use crate::report::analyze;

    #[test]
    fn test_csv_output() {
        let analyses = vec![
            analyze(
                FinancialRecord {
                    car_regulatory: Some(15.0),
                    gross_loans: Some(600.0),
                    deposits: Some(1000.0),
                    ..FinancialRecord::new("Banque Alpha").with_fiscal_year(2023)
                },
                None,
                &RatingScheme::default(),
            ),
            analyze(FinancialRecord::new("Empty Bank"), None, &RatingScheme::default()),
        ];

        let mut out = Vec::new();
        write_ratings_csv(&mut out, &analyses).expect("writes csv");
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("bank_name,country,fiscal_year,currency,scheme_version,equity_assets"));
        assert!(lines[1].starts_with("Banque Alpha,Unknown,2023,XOF,camels-v1,"));
        assert!(lines[1].ends_with(",1,,4,1,2,Satisfactory"));
        assert!(lines[2].ends_with(",,,4,,4,Marginal"));
    }
}
