//! Output of the ratio engine

use serde::{Deserialize, Serialize};

/// Supervisory ratios derived from one [`FinancialRecord`](crate::record::FinancialRecord)
///
/// All ratios are fractions (0.15 = 15%) except `assets_equity`, which is a
/// leverage multiple. A ratio is `None` when one of its inputs was absent or
/// its denominator was zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivedRatios {
    // Averages used as denominators
    pub avg_assets: f64,
    pub avg_equity: f64,
    pub avg_gross_loans: f64,

    // Solvency
    pub equity_assets: Option<f64>,

    // Liquidity
    pub cash_reserves_assets: Option<f64>,
    pub liquid_assets_assets: Option<f64>,
    pub gross_loans_deposits: Option<f64>,

    // Asset quality
    pub problem_assets: Option<f64>,
    /// Loan loss reserve after the provisions fallback
    pub llr: Option<f64>,
    pub npa_ratio: Option<f64>,
    pub npl_ratio: Option<f64>,
    pub llr_avg_loan: Option<f64>,
    pub coverage_ratio: Option<f64>,
    pub oler: Option<f64>,

    // Profitability
    pub net_interest_margin: Option<f64>,
    pub net_interest_spread: Option<f64>,
    pub non_interest_income: f64,
    pub non_interest_income_assets: Option<f64>,
    pub interest_earning_assets_yield: Option<f64>,
    pub cost_of_funds: Option<f64>,
    pub opex_assets: Option<f64>,
    pub cost_to_income: Option<f64>,

    // DuPont decomposition over average assets
    pub net_interest_income_assets: Option<f64>,
    pub non_interest_income_assets_dupont: Option<f64>,
    pub opex_assets_dupont: Option<f64>,
    pub provision_expenses_assets: Option<f64>,
    pub non_op_assets: Option<f64>,
    pub tax_expenses_assets: Option<f64>,
    pub assets_equity: Option<f64>,
    pub roaa: Option<f64>,
    pub roae: Option<f64>,
}
